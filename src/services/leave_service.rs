//! Leave requests and their two-step approval chain.

use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{LeaveRequestEntity, LeaveStatus, Role, UserEntity},
    dto::leave::{CreateLeaveRequest, LeaveView},
    error::ServiceError,
    state::SharedState,
};

/// Whether `role` may move a request from `from` to `to`.
///
/// TLs forward or reject pending requests; admins settle forwarded ones.
/// Approved and rejected requests are terminal.
pub fn transition_allowed(role: Role, from: LeaveStatus, to: LeaveStatus) -> bool {
    match (role, from, to) {
        (Role::Tl, LeaveStatus::PendingTl, LeaveStatus::PendingAdmin)
        | (Role::Tl, LeaveStatus::PendingTl, LeaveStatus::Rejected)
        | (Role::Admin, LeaveStatus::PendingAdmin, LeaveStatus::Approved)
        | (Role::Admin, LeaveStatus::PendingAdmin, LeaveStatus::Rejected) => true,
        _ => false,
    }
}

/// Raise a new leave request for `actor`, starting at the TL review stage.
pub async fn create(
    state: &SharedState,
    actor: &UserEntity,
    request: CreateLeaveRequest,
) -> Result<LeaveView, ServiceError> {
    if request.start_date > request.end_date {
        return Err(ServiceError::InvalidInput(
            "start date is after end date".into(),
        ));
    }

    let store = state.require_sales_store().await?;
    let leave = LeaveRequestEntity {
        id: Uuid::new_v4(),
        user_id: actor.id,
        kind: request.kind,
        start_date: request.start_date,
        end_date: request.end_date,
        reason: request.reason,
        status: LeaveStatus::PendingTl,
        created_at: SystemTime::now(),
    };
    store.save_leave(leave.clone()).await?;

    info!(leave = %leave.id, user = %actor.id, "leave request raised");
    Ok(LeaveView::new(leave, Some(actor.name.clone())))
}

/// Apply a decision to a pending request.
///
/// The TL path additionally requires that the requester belongs to the
/// deciding TL's team.
pub async fn decide(
    state: &SharedState,
    actor: &UserEntity,
    leave_id: Uuid,
    status: LeaveStatus,
) -> Result<LeaveView, ServiceError> {
    let store = state.require_sales_store().await?;
    let mut leave = store
        .find_leave(leave_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("leave request `{leave_id}` not found")))?;

    if !transition_allowed(actor.role, leave.status, status) {
        return Err(ServiceError::InvalidState(format!(
            "cannot move a {:?} request to {:?} as {:?}",
            leave.status, status, actor.role
        )));
    }

    if actor.role == Role::Tl {
        let team = store
            .find_team_by_tl(actor.id)
            .await?
            .ok_or_else(|| ServiceError::Forbidden("you do not lead a team".into()))?;
        let requester = store
            .find_user(leave.user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("requesting user no longer exists".into()))?;
        if requester.team_id != Some(team.id) {
            return Err(ServiceError::Forbidden(
                "requester is not on your team".into(),
            ));
        }
    }

    leave.status = status;
    store.save_leave(leave.clone()).await?;

    info!(leave = %leave.id, status = ?status, actor = %actor.id, "leave request decided");
    let requester_name = store
        .find_user(leave.user_id)
        .await?
        .map(|user| user.name);
    Ok(LeaveView::new(leave, requester_name))
}

/// Leave requests visible to `actor`: their own for employees, their team's
/// for TLs, everything for admins.
pub async fn list_for(
    state: &SharedState,
    actor: &UserEntity,
) -> Result<Vec<LeaveView>, ServiceError> {
    let store = state.require_sales_store().await?;

    let leaves = match actor.role {
        Role::Employee => store.list_leaves_by_user(actor.id).await?,
        Role::Tl => {
            let Some(team) = store.find_team_by_tl(actor.id).await? else {
                return Ok(Vec::new());
            };
            let users = store.list_users().await?;
            let member_ids: Vec<Uuid> = users
                .iter()
                .filter(|user| user.team_id == Some(team.id))
                .map(|user| user.id)
                .collect();
            store
                .list_leaves()
                .await?
                .into_iter()
                .filter(|leave| member_ids.contains(&leave.user_id))
                .collect()
        }
        Role::Admin => store.list_leaves().await?,
    };

    let users = store.list_users().await?;
    Ok(leaves
        .into_iter()
        .map(|leave| {
            let name = users
                .iter()
                .find(|user| user.id == leave.user_id)
                .map(|user| user.name.clone());
            LeaveView::new(leave, name)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::{LeaveKind, TeamEntity},
            sales_store::{SalesStore, memory::MemorySalesStore},
        },
        state::AppState,
    };
    use std::sync::Arc;

    async fn state_with_store() -> (SharedState, MemorySalesStore) {
        let state = AppState::new(AppConfig::default());
        let store = MemorySalesStore::new();
        state.install_sales_store(Arc::new(store.clone())).await;
        (state, store)
    }

    fn user(role: Role, team_id: Option<Uuid>) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            name: "member".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: String::new(),
            role,
            team_id,
            avatar_url: None,
            contact_number: None,
            job_role: None,
        }
    }

    fn request() -> CreateLeaveRequest {
        CreateLeaveRequest {
            kind: LeaveKind::Leave,
            start_date: "2026-04-01".into(),
            end_date: "2026-04-03".into(),
            reason: "family visit".into(),
        }
    }

    async fn seeded_team(store: &MemorySalesStore) -> (UserEntity, UserEntity) {
        let tl = user(Role::Tl, None);
        let team = TeamEntity {
            id: Uuid::new_v4(),
            name: "Team".into(),
            tl_id: tl.id,
            agents: Vec::new(),
            avg_activation: 0,
            total_activations: 0,
            total_submissions: 0,
            total_points: 0,
            celebration_audio_url: None,
        };
        let employee = user(Role::Employee, Some(team.id));
        store.save_team(team).await.unwrap();
        store.save_user(tl.clone()).await.unwrap();
        store.save_user(employee.clone()).await.unwrap();
        (tl, employee)
    }

    #[test]
    fn transition_table_matches_the_approval_chain() {
        use LeaveStatus::*;

        assert!(transition_allowed(Role::Tl, PendingTl, PendingAdmin));
        assert!(transition_allowed(Role::Tl, PendingTl, Rejected));
        assert!(transition_allowed(Role::Admin, PendingAdmin, Approved));
        assert!(transition_allowed(Role::Admin, PendingAdmin, Rejected));

        // TLs cannot approve, admins cannot skip the TL stage.
        assert!(!transition_allowed(Role::Tl, PendingTl, Approved));
        assert!(!transition_allowed(Role::Admin, PendingTl, Approved));
        assert!(!transition_allowed(Role::Admin, PendingTl, PendingAdmin));
        // Terminal states stay terminal.
        assert!(!transition_allowed(Role::Admin, Approved, Rejected));
        assert!(!transition_allowed(Role::Tl, Rejected, PendingAdmin));
        // Employees decide nothing.
        assert!(!transition_allowed(Role::Employee, PendingTl, PendingAdmin));
    }

    #[tokio::test]
    async fn full_approval_flow() {
        let (state, store) = state_with_store().await;
        let (tl, employee) = seeded_team(&store).await;
        let admin = user(Role::Admin, None);
        store.save_user(admin.clone()).await.unwrap();

        let leave = create(&state, &employee, request()).await.unwrap();
        assert_eq!(leave.status, LeaveStatus::PendingTl);

        let forwarded = decide(&state, &tl, leave.id, LeaveStatus::PendingAdmin)
            .await
            .unwrap();
        assert_eq!(forwarded.status, LeaveStatus::PendingAdmin);

        let approved = decide(&state, &admin, leave.id, LeaveStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, LeaveStatus::Approved);

        // Terminal: a second decision is rejected.
        let stuck = decide(&state, &admin, leave.id, LeaveStatus::Rejected).await;
        assert!(matches!(stuck, Err(ServiceError::InvalidState(_))));
    }

    #[tokio::test]
    async fn tl_of_another_team_cannot_decide() {
        let (state, store) = state_with_store().await;
        let (_tl, employee) = seeded_team(&store).await;
        let (other_tl, _other_employee) = seeded_team(&store).await;

        let leave = create(&state, &employee, request()).await.unwrap();
        let denied = decide(&state, &other_tl, leave.id, LeaveStatus::PendingAdmin).await;
        assert!(matches!(denied, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn inverted_date_range_is_rejected() {
        let (state, store) = state_with_store().await;
        let (_tl, employee) = seeded_team(&store).await;

        let mut bad = request();
        bad.start_date = "2026-04-05".into();
        bad.end_date = "2026-04-01".into();
        let rejected = create(&state, &employee, bad).await;
        assert!(matches!(rejected, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn listings_are_scoped_by_role() {
        let (state, store) = state_with_store().await;
        let (tl, employee) = seeded_team(&store).await;
        let (_other_tl, other_employee) = seeded_team(&store).await;
        let admin = user(Role::Admin, None);
        store.save_user(admin.clone()).await.unwrap();

        create(&state, &employee, request()).await.unwrap();
        create(&state, &other_employee, request()).await.unwrap();

        assert_eq!(list_for(&state, &employee).await.unwrap().len(), 1);
        let tl_view = list_for(&state, &tl).await.unwrap();
        assert_eq!(tl_view.len(), 1);
        assert_eq!(tl_view[0].user_id, employee.id);
        assert_eq!(list_for(&state, &admin).await.unwrap().len(), 2);
    }
}

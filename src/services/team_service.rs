//! Team and agent management plus the employee performance read path.

use std::time::SystemTime;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::models::{AgentEntity, Role, UserEntity},
    dto::{
        admin::{SettingsView, TeamOverview, UpdateSettingsRequest},
        employee::{PerformanceQuery, PerformanceResponse},
        leave::LeaveView,
        tl::{AgentView, CreateAgentRequest, TeamView, UpdateTeamRequest},
    },
    error::ServiceError,
    services::{leaderboard_service, ws_events},
    state::SharedState,
};

/// Activation goal assigned to agents created without an explicit target.
pub(crate) const DEFAULT_ACTIVATION_TARGET: i64 = 10;

/// All teams, for the public team picker.
pub async fn list_teams(state: &SharedState) -> Result<Vec<TeamView>, ServiceError> {
    let store = state.require_sales_store().await?;
    let teams = store.list_teams().await?;
    Ok(teams.into_iter().map(TeamView::from).collect())
}

/// Admin listing with TL names and roster sizes.
pub async fn admin_overview(state: &SharedState) -> Result<Vec<TeamOverview>, ServiceError> {
    let store = state.require_sales_store().await?;
    let teams = store.list_teams().await?;
    let users = store.list_users().await?;

    Ok(teams
        .into_iter()
        .map(|team| {
            let tl_name = users
                .iter()
                .find(|user| user.id == team.tl_id)
                .map(|user| user.name.clone());
            TeamOverview::new(team, tl_name)
        })
        .collect())
}

/// Admin operation: remove a team, unlinking its members and agents and
/// dropping it from the featured filter.
pub async fn delete_team(state: &SharedState, team_id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_sales_store().await?;
    let team = store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{team_id}` not found")))?;

    for mut user in store.list_users().await? {
        if user.team_id == Some(team.id) {
            user.team_id = None;
            store.save_user(user).await?;
        }
    }
    for mut agent in store.list_agents_by_team(team.id).await? {
        agent.team_id = None;
        store.save_agent(agent).await?;
    }

    let mut settings = store.settings().await?;
    if settings.featured_team_ids.contains(&team.id) {
        settings.featured_team_ids.retain(|id| *id != team.id);
        store.save_settings(settings).await?;
    }

    store.delete_team(team.id).await?;
    info!(team = %team.id, "team deleted");
    leaderboard_service::recompute_and_broadcast(state).await;
    Ok(())
}

/// The calling TL's own team.
pub async fn my_team(state: &SharedState, actor: &UserEntity) -> Result<TeamView, ServiceError> {
    let store = state.require_sales_store().await?;
    let team = store
        .find_team_by_tl(actor.id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("you do not lead a team".into()))?;
    Ok(team.into())
}

/// Partial update of the calling TL's team.
pub async fn update_team(
    state: &SharedState,
    actor: &UserEntity,
    request: UpdateTeamRequest,
) -> Result<TeamView, ServiceError> {
    let store = state.require_sales_store().await?;
    let mut team = store
        .find_team_by_tl(actor.id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("you do not lead a team".into()))?;

    if let Some(name) = request.name {
        team.name = name;
    }
    if let Some(audio) = request.celebration_audio_url {
        team.celebration_audio_url = if audio.is_empty() { None } else { Some(audio) };
    }
    store.save_team(team.clone()).await?;

    info!(team = %team.id, "team updated");
    leaderboard_service::recompute_and_broadcast(state).await;
    Ok(team.into())
}

/// Agents on the calling TL's team.
pub async fn list_agents_for_tl(
    state: &SharedState,
    actor: &UserEntity,
) -> Result<Vec<AgentView>, ServiceError> {
    let store = state.require_sales_store().await?;
    let team = store
        .find_team_by_tl(actor.id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("you do not lead a team".into()))?;
    let agents = store.list_agents_by_team(team.id).await?;
    Ok(agents.into_iter().map(AgentView::from).collect())
}

/// Create a new agent on the calling TL's team.
pub async fn create_agent(
    state: &SharedState,
    actor: &UserEntity,
    request: CreateAgentRequest,
) -> Result<AgentView, ServiceError> {
    let store = state.require_sales_store().await?;
    let mut team = store
        .find_team_by_tl(actor.id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("you do not lead a team".into()))?;

    let agent = AgentEntity {
        id: Uuid::new_v4(),
        name: request.name,
        photo_url: request.photo_url,
        team_id: Some(team.id),
        activation_target: request.activation_target.unwrap_or(DEFAULT_ACTIVATION_TARGET),
        activations: 0,
        submissions: 0,
        today_submissions: 0,
        points: 0,
        last_submission_reset: SystemTime::now(),
        user_id: None,
        email: request.email.map(|email| email.to_lowercase()),
    };
    team.agents.push(agent.id);
    store.save_agent(agent.clone()).await?;
    store.save_team(team).await?;

    info!(agent = %agent.id, "agent created");
    leaderboard_service::recompute_and_broadcast(state).await;
    Ok(agent.into())
}

/// Remove an agent. Admins may remove any agent, TLs only their own.
pub async fn delete_agent(
    state: &SharedState,
    actor: &UserEntity,
    agent_id: Uuid,
) -> Result<(), ServiceError> {
    let store = state.require_sales_store().await?;
    let agent = store
        .find_agent(agent_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("agent `{agent_id}` not found")))?;

    match actor.role {
        Role::Admin => {}
        Role::Tl => {
            let team = store.find_team_by_tl(actor.id).await?;
            let owns = matches!((team, agent.team_id), (Some(team), Some(tid)) if team.id == tid);
            if !owns {
                return Err(ServiceError::Forbidden(
                    "agent does not belong to your team".into(),
                ));
            }
        }
        Role::Employee => {
            return Err(ServiceError::Forbidden(
                "employees cannot remove agents".into(),
            ));
        }
    }

    if let Some(team_id) = agent.team_id {
        if let Some(mut team) = store.find_team(team_id).await? {
            team.agents.retain(|id| *id != agent.id);
            store.save_team(team).await?;
        }
    }
    store.delete_agent(agent.id).await?;

    info!(agent = %agent.id, "agent removed");
    leaderboard_service::recompute_and_broadcast(state).await;
    Ok(())
}

/// Partial update of the global settings, pushed to clients immediately.
/// The featured filter affects the board, so it is recomputed too.
pub async fn update_settings(
    state: &SharedState,
    request: UpdateSettingsRequest,
) -> Result<SettingsView, ServiceError> {
    let store = state.require_sales_store().await?;
    let mut settings = store.settings().await?;

    if let Some(sound) = request.notification_sound_url {
        settings.notification_sound_url = if sound.is_empty() { None } else { Some(sound) };
    }
    if let Some(featured) = request.featured_team_ids {
        settings.featured_team_ids = featured;
    }
    store.save_settings(settings.clone()).await?;

    let view = SettingsView::from(settings);
    info!("settings updated");
    ws_events::broadcast_settings(state, view.clone());
    leaderboard_service::recompute_and_broadcast(state).await;
    Ok(view)
}

/// Current figures, archived months and leave requests for one agent.
///
/// Employees always see their own linked agent; TLs and admins may pass an
/// explicit `agentId`.
pub async fn performance(
    state: &SharedState,
    actor: &UserEntity,
    query: PerformanceQuery,
) -> Result<PerformanceResponse, ServiceError> {
    let store = state.require_sales_store().await?;

    let agent = match (actor.role, query.agent_id) {
        (Role::Employee, _) => {
            let agents = store.list_agents().await?;
            agents
                .into_iter()
                .find(|agent| agent.user_id == Some(actor.id))
                .ok_or_else(|| {
                    ServiceError::NotFound("no agent record linked to your account".into())
                })?
        }
        (_, Some(agent_id)) => store
            .find_agent(agent_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("agent `{agent_id}` not found")))?,
        (_, None) => {
            return Err(ServiceError::InvalidInput(
                "agentId is required for TL and admin callers".into(),
            ));
        }
    };

    if actor.role == Role::Tl {
        let team = store.find_team_by_tl(actor.id).await?;
        let owns = matches!((team, agent.team_id), (Some(team), Some(tid)) if team.id == tid);
        if !owns {
            return Err(ServiceError::Forbidden(
                "agent does not belong to your team".into(),
            ));
        }
    }

    let history = store.list_history_by_agent(agent.id).await?;
    let leaves = match agent.user_id {
        Some(user_id) => store.list_leaves_by_user(user_id).await?,
        None => Vec::new(),
    };
    if history.is_empty() {
        warn!(agent = %agent.id, "no archived months for agent yet");
    }

    Ok(PerformanceResponse {
        agent: agent.into(),
        history: history.into_iter().map(Into::into).collect(),
        leaves: leaves.into_iter().map(LeaveView::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::{SystemSettingsEntity, TeamEntity},
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
            name: "someone".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: String::new(),
            role,
            team_id,
            avatar_url: None,
            contact_number: None,
            job_role: None,
        }
    }

    async fn seeded_tl(store: &MemorySalesStore) -> (UserEntity, TeamEntity) {
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
        store.save_user(tl.clone()).await.unwrap();
        store.save_team(team.clone()).await.unwrap();
        (tl, team)
    }

    fn agent_request(name: &str) -> CreateAgentRequest {
        CreateAgentRequest {
            name: name.into(),
            photo_url: "https://cdn.example.com/pic.png".into(),
            activation_target: None,
            email: None,
        }
    }

    #[tokio::test]
    async fn created_agents_join_the_roster_with_the_default_target() {
        let (state, store) = state_with_store().await;
        let (tl, team) = seeded_tl(&store).await;

        let agent = create_agent(&state, &tl, agent_request("Sam")).await.unwrap();
        assert_eq!(agent.activation_target, DEFAULT_ACTIVATION_TARGET);

        let stored_team = store.find_team(team.id).await.unwrap().unwrap();
        assert!(stored_team.agents.contains(&agent.id));
        assert_eq!(list_agents_for_tl(&state, &tl).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_an_agent_clears_the_roster() {
        let (state, store) = state_with_store().await;
        let (tl, team) = seeded_tl(&store).await;
        let agent = create_agent(&state, &tl, agent_request("Sam")).await.unwrap();

        delete_agent(&state, &tl, agent.id).await.unwrap();
        assert!(store.find_agent(agent.id).await.unwrap().is_none());
        let stored_team = store.find_team(team.id).await.unwrap().unwrap();
        assert!(stored_team.agents.is_empty());
    }

    #[tokio::test]
    async fn tl_cannot_delete_foreign_agents() {
        let (state, store) = state_with_store().await;
        let (tl, _) = seeded_tl(&store).await;
        let (other_tl, _) = seeded_tl(&store).await;
        let agent = create_agent(&state, &tl, agent_request("Sam")).await.unwrap();

        let denied = delete_agent(&state, &other_tl, agent.id).await;
        assert!(matches!(denied, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn deleting_a_team_unlinks_everything() {
        let (state, store) = state_with_store().await;
        let (tl, team) = seeded_tl(&store).await;
        let member = user(Role::Employee, Some(team.id));
        store.save_user(member.clone()).await.unwrap();
        let agent = create_agent(&state, &tl, agent_request("Sam")).await.unwrap();

        let settings = SystemSettingsEntity {
            id: store.settings().await.unwrap().id,
            notification_sound_url: None,
            featured_team_ids: vec![team.id],
        };
        store.save_settings(settings).await.unwrap();

        delete_team(&state, team.id).await.unwrap();

        assert!(store.find_team(team.id).await.unwrap().is_none());
        let member = store.find_user(member.id).await.unwrap().unwrap();
        assert_eq!(member.team_id, None);
        let agent = store.find_agent(agent.id).await.unwrap().unwrap();
        assert_eq!(agent.team_id, None);
        assert!(store.settings().await.unwrap().featured_team_ids.is_empty());
    }

    #[tokio::test]
    async fn update_team_applies_only_present_fields() {
        let (state, store) = state_with_store().await;
        let (tl, team) = seeded_tl(&store).await;

        let updated = update_team(
            &state,
            &tl,
            UpdateTeamRequest {
                name: Some("Rockets".into()),
                celebration_audio_url: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Rockets");

        let stored = store.find_team(team.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Rockets");
        assert_eq!(stored.celebration_audio_url, None);
    }

    #[tokio::test]
    async fn settings_update_applies_only_present_fields() {
        let (state, store) = state_with_store().await;
        let featured = vec![Uuid::new_v4()];

        let view = update_settings(
            &state,
            UpdateSettingsRequest {
                notification_sound_url: Some("https://cdn.example.com/ding.mp3".into()),
                featured_team_ids: Some(featured.clone()),
            },
        )
        .await
        .unwrap();
        assert_eq!(view.featured_team_ids, featured);

        // Absent fields stay untouched; empty string clears the sound.
        let view = update_settings(
            &state,
            UpdateSettingsRequest {
                notification_sound_url: Some(String::new()),
                featured_team_ids: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(view.notification_sound_url, None);
        assert_eq!(view.featured_team_ids, featured);
        assert_eq!(store.settings().await.unwrap().featured_team_ids, featured);
    }

    #[tokio::test]
    async fn employee_performance_resolves_the_linked_agent() {
        let (state, store) = state_with_store().await;
        let (tl, team) = seeded_tl(&store).await;
        let employee = user(Role::Employee, Some(team.id));
        store.save_user(employee.clone()).await.unwrap();

        let agent_view = create_agent(&state, &tl, agent_request("Sam")).await.unwrap();
        let mut agent = store.find_agent(agent_view.id).await.unwrap().unwrap();
        agent.user_id = Some(employee.id);
        store.save_agent(agent).await.unwrap();

        let response = performance(&state, &employee, PerformanceQuery { agent_id: None })
            .await
            .unwrap();
        assert_eq!(response.agent.id, agent_view.id);
        assert!(response.history.is_empty());

        // An unlinked employee has nothing to show.
        let unlinked = user(Role::Employee, Some(team.id));
        store.save_user(unlinked.clone()).await.unwrap();
        let missing = performance(&state, &unlinked, PerformanceQuery { agent_id: None }).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }
}

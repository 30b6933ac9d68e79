use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware,
    routing::{delete, get, patch, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dao::models::UserEntity,
    dto::{
        admin::{
            ActionResponse, ActiveNotification, NotificationPush, SettingsView, TeamOverview,
            UpdateSettingsRequest,
        },
        auth::{CreateTlRequest, UserView},
        leave::{LeaveDecisionRequest, LeaveView},
    },
    error::AppError,
    services::{auth_service, leave_service, notification_service, team_service},
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/api/admin/notifications",
    tag = "admin",
    request_body = NotificationPush,
    responses((status = 200, description = "Notification activated", body = ActiveNotification))
)]
/// REST mirror of the `admin:pushNotification` socket frame.
pub async fn push_notification(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<NotificationPush>>,
) -> Result<Json<ActiveNotification>, AppError> {
    Ok(Json(notification_service::push(&state, payload).await?))
}

#[utoipa::path(
    patch,
    path = "/api/admin/notifications/clear",
    tag = "admin",
    responses((status = 200, description = "Active notification dismissed", body = ActionResponse))
)]
/// Dismiss the currently active notification on every client.
pub async fn clear_notification(
    State(state): State<SharedState>,
) -> Result<Json<ActionResponse>, AppError> {
    notification_service::clear(&state).await?;
    Ok(Json(ActionResponse::new("notifications cleared")))
}

#[utoipa::path(
    patch,
    path = "/api/admin/settings",
    tag = "admin",
    request_body = UpdateSettingsRequest,
    responses((status = 200, description = "Settings updated", body = SettingsView))
)]
/// Update the global settings and push them to connected clients.
pub async fn update_settings(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<UpdateSettingsRequest>>,
) -> Result<Json<SettingsView>, AppError> {
    Ok(Json(team_service::update_settings(&state, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/teams",
    tag = "admin",
    responses((status = 200, description = "All teams with TL names", body = [TeamOverview]))
)]
/// Team overview for the admin dashboard.
pub async fn list_teams(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TeamOverview>>, AppError> {
    Ok(Json(team_service::admin_overview(&state).await?))
}

#[utoipa::path(
    delete,
    path = "/api/admin/teams/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Team id")),
    responses((status = 200, description = "Team deleted", body = ActionResponse))
)]
/// Delete a team, unlinking its members and agents.
pub async fn delete_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    team_service::delete_team(&state, id).await?;
    Ok(Json(ActionResponse::new("team deleted")))
}

#[utoipa::path(
    post,
    path = "/api/admin/create-tl",
    tag = "admin",
    request_body = CreateTlRequest,
    responses(
        (status = 200, description = "Team leader and team created", body = UserView),
        (status = 409, description = "Email already registered"),
    )
)]
/// Create a team-leader account together with its team.
pub async fn create_tl(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateTlRequest>>,
) -> Result<Json<UserView>, AppError> {
    Ok(Json(auth_service::create_tl(&state, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/leaves",
    tag = "admin",
    responses((status = 200, description = "All leave requests", body = [LeaveView]))
)]
/// Every leave request in the system.
pub async fn list_leaves(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
) -> Result<Json<Vec<LeaveView>>, AppError> {
    Ok(Json(leave_service::list_for(&state, &actor).await?))
}

#[utoipa::path(
    patch,
    path = "/api/admin/leaves/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Leave request id")),
    request_body = LeaveDecisionRequest,
    responses(
        (status = 200, description = "Decision applied", body = LeaveView),
        (status = 409, description = "Transition not allowed from the current status"),
    )
)]
/// Approve or reject a TL-forwarded leave request.
pub async fn decide_leave(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeaveDecisionRequest>,
) -> Result<Json<LeaveView>, AppError> {
    Ok(Json(
        leave_service::decide(&state, &actor, id, payload.status).await?,
    ))
}

/// Configure the admin routes subtree. Every route requires an admin token.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/admin/notifications", post(push_notification))
        .route("/admin/notifications/clear", patch(clear_notification))
        .route("/admin/settings", patch(update_settings))
        .route("/admin/teams", get(list_teams))
        .route("/admin/teams/{id}", delete(delete_team))
        .route("/admin/create-tl", post(create_tl))
        .route("/admin/leaves", get(list_leaves))
        .route("/admin/leaves/{id}", patch(decide_leave))
        .route_layer(middleware::from_fn(super::require_admin))
        .route_layer(middleware::from_fn_with_state(state, super::require_user))
}

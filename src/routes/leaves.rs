use axum::{Extension, Json, Router, extract::State, middleware, routing::get};
use axum_valid::Valid;

use crate::{
    dao::models::UserEntity,
    dto::leave::{CreateLeaveRequest, LeaveView},
    error::AppError,
    services::leave_service,
    state::SharedState,
};

#[utoipa::path(
    post,
    path = "/api/leaves",
    tag = "leaves",
    request_body = CreateLeaveRequest,
    responses((status = 200, description = "Leave request raised", body = LeaveView))
)]
/// Raise a new leave request for the authenticated user.
pub async fn create_leave(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
    Valid(Json(payload)): Valid<Json<CreateLeaveRequest>>,
) -> Result<Json<LeaveView>, AppError> {
    Ok(Json(leave_service::create(&state, &actor, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/leaves",
    tag = "leaves",
    responses((status = 200, description = "Leave requests visible to the caller", body = [LeaveView]))
)]
/// The caller's leave requests (own, team, or all depending on role).
pub async fn list_leaves(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
) -> Result<Json<Vec<LeaveView>>, AppError> {
    Ok(Json(leave_service::list_for(&state, &actor).await?))
}

/// Configure the leave routes subtree.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/leaves", get(list_leaves).post(create_leave))
        .route_layer(middleware::from_fn_with_state(state, super::require_user))
}

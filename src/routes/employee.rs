use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    middleware,
    routing::get,
};

use crate::{
    dao::models::UserEntity,
    dto::employee::{PerformanceQuery, PerformanceResponse},
    error::AppError,
    services::team_service,
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/api/employee/performance",
    tag = "employee",
    params(("agentId" = Option<uuid::Uuid>, Query, description = "Agent id, for TL/admin callers")),
    responses(
        (status = 200, description = "Current figures plus archived months", body = PerformanceResponse),
        (status = 404, description = "No agent record linked to the caller"),
    )
)]
/// Performance view: live counters, monthly history and leave requests.
pub async fn performance(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
    Query(query): Query<PerformanceQuery>,
) -> Result<Json<PerformanceResponse>, AppError> {
    Ok(Json(team_service::performance(&state, &actor, query).await?))
}

/// Configure the employee routes subtree.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/employee/performance", get(performance))
        .route_layer(middleware::from_fn_with_state(state, super::require_user))
}

use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{leaderboard::LeaderboardSnapshot, tl::TeamView},
    error::AppError,
    services::{leaderboard_service, team_service},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/api/stats/leaderboard",
    tag = "stats",
    responses(
        (status = 200, description = "Current leaderboard snapshot", body = LeaderboardSnapshot),
        (status = 503, description = "Storage unavailable"),
    )
)]
/// Poll-recovery snapshot identical to the `leaderboard:update` frame.
pub async fn leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<LeaderboardSnapshot>, AppError> {
    Ok(Json(leaderboard_service::compute(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/teams/list",
    tag = "stats",
    responses((status = 200, description = "All teams", body = [TeamView]))
)]
/// Public team listing used by the registration form.
pub async fn list_teams(State(state): State<SharedState>) -> Result<Json<Vec<TeamView>>, AppError> {
    Ok(Json(team_service::list_teams(&state).await?))
}

/// Configure the public read-only routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/stats/leaderboard", get(leaderboard))
        .route("/teams/list", get(list_teams))
}

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware,
    routing::{get, patch},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dao::models::UserEntity,
    dto::{
        admin::ActionResponse,
        leave::{LeaveDecisionRequest, LeaveView},
        tl::{
            AgentView, CreateAgentRequest, IncrementRequest, IncrementResponse, TargetRequest,
            TeamView, UpdateTeamRequest,
        },
        ws::CounterMutation,
    },
    error::AppError,
    services::{counter_service, leave_service, team_service},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/api/tl/agents",
    tag = "tl",
    responses(
        (status = 200, description = "Agents on the caller's team", body = [AgentView]),
        (status = 404, description = "Caller does not lead a team"),
    )
)]
/// Agents on the calling TL's team.
pub async fn list_agents(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
) -> Result<Json<Vec<AgentView>>, AppError> {
    Ok(Json(team_service::list_agents_for_tl(&state, &actor).await?))
}

#[utoipa::path(
    post,
    path = "/api/tl/agents",
    tag = "tl",
    request_body = CreateAgentRequest,
    responses((status = 200, description = "Agent created", body = AgentView))
)]
/// Create an agent on the calling TL's team.
pub async fn create_agent(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
    Valid(Json(payload)): Valid<Json<CreateAgentRequest>>,
) -> Result<Json<AgentView>, AppError> {
    Ok(Json(team_service::create_agent(&state, &actor, payload).await?))
}

#[utoipa::path(
    patch,
    path = "/api/tl/agents/{id}/increment",
    tag = "tl",
    params(("id" = Uuid, Path, description = "Agent id")),
    request_body = IncrementRequest,
    responses(
        (status = 200, description = "Counters updated", body = IncrementResponse),
        (status = 403, description = "Agent is not on the caller's team"),
        (status = 429, description = "Mutation budget exceeded"),
    )
)]
/// REST mirror of the `tl:updateCounters` socket mutation.
pub async fn increment(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<IncrementRequest>>,
) -> Result<Json<IncrementResponse>, AppError> {
    let mutation = CounterMutation {
        agent_id: id,
        delta: payload.delta,
    };
    Ok(Json(
        counter_service::apply_delta_and_broadcast(&state, &actor, mutation).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/tl/agents/{id}/target",
    tag = "tl",
    params(("id" = Uuid, Path, description = "Agent id")),
    request_body = TargetRequest,
    responses((status = 200, description = "Target replaced", body = AgentView))
)]
/// Replace an agent's monthly activation goal.
pub async fn set_target(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<TargetRequest>>,
) -> Result<Json<AgentView>, AppError> {
    let agent = counter_service::set_target(&state, &actor, id, payload.activation_target).await?;
    Ok(Json(agent.into()))
}

#[utoipa::path(
    delete,
    path = "/api/tl/agents/{id}",
    tag = "tl",
    params(("id" = Uuid, Path, description = "Agent id")),
    responses((status = 200, description = "Agent removed", body = ActionResponse))
)]
/// Remove an agent from the caller's team. No celebration is emitted.
pub async fn delete_agent(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse>, AppError> {
    team_service::delete_agent(&state, &actor, id).await?;
    Ok(Json(ActionResponse::new("agent removed")))
}

#[utoipa::path(
    get,
    path = "/api/tl/team",
    tag = "tl",
    responses((status = 200, description = "The caller's team", body = TeamView))
)]
/// The calling TL's team.
pub async fn my_team(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
) -> Result<Json<TeamView>, AppError> {
    Ok(Json(team_service::my_team(&state, &actor).await?))
}

#[utoipa::path(
    patch,
    path = "/api/tl/team",
    tag = "tl",
    request_body = UpdateTeamRequest,
    responses((status = 200, description = "Team updated", body = TeamView))
)]
/// Update the caller's team name or celebration audio.
pub async fn update_team(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
    Valid(Json(payload)): Valid<Json<UpdateTeamRequest>>,
) -> Result<Json<TeamView>, AppError> {
    Ok(Json(team_service::update_team(&state, &actor, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/tl/leaves",
    tag = "tl",
    responses((status = 200, description = "Leave requests from the caller's team", body = [LeaveView]))
)]
/// Leave requests raised by the caller's team members.
pub async fn list_leaves(
    State(state): State<SharedState>,
    Extension(actor): Extension<UserEntity>,
) -> Result<Json<Vec<LeaveView>>, AppError> {
    Ok(Json(leave_service::list_for(&state, &actor).await?))
}

#[utoipa::path(
    patch,
    path = "/api/tl/leaves/{id}",
    tag = "tl",
    params(("id" = Uuid, Path, description = "Leave request id")),
    request_body = LeaveDecisionRequest,
    responses(
        (status = 200, description = "Decision applied", body = LeaveView),
        (status = 409, description = "Transition not allowed from the current status"),
    )
)]
/// Forward or reject a pending leave request.
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

/// Configure the team-leader routes subtree.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/tl/agents", get(list_agents).post(create_agent))
        .route("/tl/agents/{id}", axum::routing::delete(delete_agent))
        .route("/tl/agents/{id}/increment", patch(increment))
        .route("/tl/agents/{id}/target", patch(set_target))
        .route("/tl/team", get(my_team).patch(update_team))
        .route("/tl/leaves", get(list_leaves))
        .route("/tl/leaves/{id}", patch(decide_leave))
        .route_layer(middleware::from_fn_with_state(state, super::require_user))
}

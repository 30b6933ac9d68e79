//! DTOs for the team-leader surface: agent management and team updates.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{AgentDelta, AgentEntity, TeamEntity},
    dto::{format_system_time, leaderboard::CelebrationEvent, validation::validate_delta},
};

/// Full agent projection returned by TL endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentView {
    pub id: Uuid,
    pub name: String,
    pub photo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
    pub activation_target: i64,
    pub activations: i64,
    pub submissions: i64,
    pub today_submissions: i64,
    pub points: i64,
    pub last_submission_reset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<AgentEntity> for AgentView {
    fn from(agent: AgentEntity) -> Self {
        Self {
            id: agent.id,
            name: agent.name,
            photo_url: agent.photo_url,
            team_id: agent.team_id,
            activation_target: agent.activation_target,
            activations: agent.activations,
            submissions: agent.submissions,
            today_submissions: agent.today_submissions,
            points: agent.points,
            last_submission_reset: format_system_time(agent.last_submission_reset),
            email: agent.email,
        }
    }
}

/// Payload creating an agent on the caller's team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[validate(url)]
    pub photo_url: String,
    #[validate(range(min = 0, max = 10_000))]
    pub activation_target: Option<i64>,
    #[validate(email)]
    pub email: Option<String>,
}

/// REST mirror of the `tl:updateCounters` socket mutation.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct IncrementRequest {
    #[validate(custom(function = validate_delta))]
    pub delta: AgentDelta,
}

/// Result of a counter mutation: the updated agent, plus the celebration
/// event when the delta warranted one.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IncrementResponse {
    pub agent: AgentView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celebration: Option<CelebrationEvent>,
}

/// Payload replacing an agent's monthly activation goal.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TargetRequest {
    #[validate(range(min = 0, max = 10_000))]
    pub activation_target: i64,
}

/// Partial team update; absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: Option<String>,
    pub celebration_audio_url: Option<String>,
}

/// Team projection returned by `GET /api/tl/team` and the public list.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub id: Uuid,
    pub name: String,
    pub tl_id: Uuid,
    pub agents: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celebration_audio_url: Option<String>,
}

impl From<TeamEntity> for TeamView {
    fn from(team: TeamEntity) -> Self {
        Self {
            id: team.id,
            name: team.name,
            tl_id: team.tl_id,
            agents: team.agents,
            celebration_audio_url: team.celebration_audio_url,
        }
    }
}

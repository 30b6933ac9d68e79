//! Views produced by the leaderboard aggregator and pushed over the wire.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::AgentEntity;

/// Ranked view of a single agent inside a team standing.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentStanding {
    pub agent_id: Uuid,
    pub name: String,
    pub photo_url: String,
    pub activations: i64,
    pub activation_target: i64,
    /// Whole-number percentage of the activation target reached.
    pub activation_percent: i64,
    pub submissions: i64,
    pub today_submissions: i64,
    pub points: i64,
}

impl From<AgentEntity> for AgentStanding {
    fn from(agent: AgentEntity) -> Self {
        let activation_percent = if agent.activation_target > 0 {
            (agent.activations as f64 / agent.activation_target as f64 * 100.0).round() as i64
        } else {
            0
        };
        Self {
            agent_id: agent.id,
            name: agent.name,
            photo_url: agent.photo_url,
            activations: agent.activations,
            activation_target: agent.activation_target,
            activation_percent,
            submissions: agent.submissions,
            today_submissions: agent.today_submissions,
            points: agent.points,
        }
    }
}

/// One ranked team with its freshly computed aggregates.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub team_id: Uuid,
    pub name: String,
    /// 1-based position after sorting.
    pub rank: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tl_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tl_avatar_url: Option<String>,
    pub avg_activation: i64,
    pub total_activations: i64,
    pub total_submissions: i64,
    pub total_points: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celebration_audio_url: Option<String>,
    pub agents: Vec<AgentStanding>,
}

/// Single best-performer entry; `name` falls back to a placeholder when no
/// agents exist.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopStatEntry {
    pub name: String,
    pub photo_url: String,
    pub value: i64,
}

/// Best performers and grand totals across all agents, regardless of the
/// featured filter: best monthly activations, best of today's submissions,
/// and the counter sums over the whole floor.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopStats {
    pub top_agent_month: TopStatEntry,
    pub top_agent_today: TopStatEntry,
    pub total_activations: i64,
    pub total_submissions: i64,
    pub total_today_submissions: i64,
}

/// Everything a client needs to render the board from scratch.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSnapshot {
    pub teams: Vec<TeamStanding>,
    pub top_stats: TopStats,
}

/// Emitted when a positive submission delta lands, driving the celebration
/// overlay on connected boards.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CelebrationEvent {
    pub agent_id: Uuid,
    pub agent_name: String,
    pub photo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
    /// The agent's `today_submissions` after the delta was applied.
    pub new_activation_count: i64,
    /// RFC3339 timestamp of the mutation.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub celebration_audio_url: Option<String>,
}

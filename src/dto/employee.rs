//! Employee performance DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::AgentHistoryEntity,
    dto::{format_system_time, leave::LeaveView, tl::AgentView},
};

/// One archived month of an agent's figures.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub month: String,
    pub year: i32,
    pub activations: i64,
    pub submissions: i64,
    pub points: i64,
    pub archived_at: String,
}

impl From<AgentHistoryEntity> for HistoryView {
    fn from(entry: AgentHistoryEntity) -> Self {
        Self {
            month: entry.month,
            year: entry.year,
            activations: entry.activations,
            submissions: entry.submissions,
            points: entry.points,
            archived_at: format_system_time(entry.created_at),
        }
    }
}

/// Current figures plus archived months and recent leave requests.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceResponse {
    pub agent: AgentView,
    pub history: Vec<HistoryView>,
    pub leaves: Vec<LeaveView>,
}

/// Optional agent selector for TL/admin callers; employees always get their
/// own linked agent.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceQuery {
    pub agent_id: Option<Uuid>,
}

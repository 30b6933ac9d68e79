//! Leave request DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{LeaveKind, LeaveRequestEntity, LeaveStatus},
    dto::{format_system_time, validation::validate_calendar_date},
};

/// Payload raising a new leave request.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaveRequest {
    #[serde(rename = "type")]
    pub kind: LeaveKind,
    #[validate(custom(function = validate_calendar_date))]
    pub start_date: String,
    #[validate(custom(function = validate_calendar_date))]
    pub end_date: String,
    #[validate(length(min = 1, max = 1000))]
    pub reason: String,
}

/// Decision applied to a pending request. The service validates that the
/// caller's role is allowed to move the request into `status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveDecisionRequest {
    pub status: LeaveStatus,
}

/// Leave request as listed to requesters, TLs and admins.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveView {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Requester display name, resolved for TL/admin listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: LeaveKind,
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
    pub status: LeaveStatus,
    pub created_at: String,
}

impl LeaveView {
    pub fn new(leave: LeaveRequestEntity, user_name: Option<String>) -> Self {
        Self {
            id: leave.id,
            user_id: leave.user_id,
            user_name,
            kind: leave.kind,
            start_date: leave.start_date,
            end_date: leave.end_date,
            reason: leave.reason,
            status: leave.status,
            created_at: format_system_time(leave.created_at),
        }
    }
}

impl From<LeaveRequestEntity> for LeaveView {
    fn from(leave: LeaveRequestEntity) -> Self {
        Self::new(leave, None)
    }
}

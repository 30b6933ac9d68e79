use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Role attached to an authenticated user account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access, including notifications and settings.
    Admin,
    /// Team leader: manages the agents of exactly one team.
    Tl,
    /// Regular employee with read access to their own performance.
    Employee,
}

/// User account stored in persistence and shared across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Stable identifier for the user.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email, unique across users.
    pub email: String,
    /// Argon2 hash of the user's password.
    pub password_hash: String,
    /// Role controlling what the user may mutate.
    pub role: Role,
    /// Team this user belongs to, if any.
    pub team_id: Option<Uuid>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Contact phone number.
    pub contact_number: Option<String>,
    /// Free-form job title.
    pub job_role: Option<String>,
}

/// Sales team owned by a team leader.
///
/// The aggregate fields (`avg_activation`, `total_*`) are caches refreshed on
/// every leaderboard pass; the source of truth is the sum over member agents
/// at computation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Display name chosen for the team.
    pub name: String,
    /// User id of the team leader.
    pub tl_id: Uuid,
    /// Roster of agent ids belonging to this team.
    pub agents: Vec<Uuid>,
    /// Cached mean activation percentage across member agents.
    pub avg_activation: i64,
    /// Cached sum of member activations.
    pub total_activations: i64,
    /// Cached sum of member submissions.
    pub total_submissions: i64,
    /// Cached sum of member points.
    pub total_points: i64,
    /// Custom audio played on this team's celebration events.
    pub celebration_audio_url: Option<String>,
}

/// Individual salesperson tracked for activations and submissions.
///
/// Counters never go negative; every delta application clamps at zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentEntity {
    /// Stable identifier for the agent.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Photo shown on the leaderboard and in celebration popups.
    pub photo_url: String,
    /// Team this agent belongs to, if any.
    pub team_id: Option<Uuid>,
    /// Monthly activation goal used to compute the activation percentage.
    pub activation_target: i64,
    /// Monthly activation counter.
    pub activations: i64,
    /// Monthly submission counter.
    pub submissions: i64,
    /// Submissions recorded today; reset by the daily rollover.
    pub today_submissions: i64,
    /// Monthly points counter.
    pub points: i64,
    /// Timestamp of the last rollover applied to this agent.
    pub last_submission_reset: SystemTime,
    /// Linked user account, when the agent self-registered.
    pub user_id: Option<Uuid>,
    /// Email used to link a self-registered account to this agent.
    pub email: Option<String>,
}

/// Signed delta applied to an agent's counters.
///
/// Each field is optional; absent fields leave the counter untouched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct AgentDelta {
    /// Delta applied to both `submissions` and `today_submissions`.
    pub submissions: Option<i64>,
    /// Delta applied to `activations`.
    pub activations: Option<i64>,
    /// Delta applied to `points`.
    pub points: Option<i64>,
}

impl AgentDelta {
    /// Whether the delta changes nothing.
    pub fn is_empty(&self) -> bool {
        self.submissions.is_none() && self.activations.is_none() && self.points.is_none()
    }
}

/// Media type of a takeover notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Plain text message.
    Text,
    /// Image takeover.
    Image,
    /// Video takeover.
    Video,
    /// Audio-only takeover.
    Audio,
}

/// Full-screen takeover notification pushed by admins.
///
/// At most one notification is active system-wide at any time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationEntity {
    /// Stable identifier for the notification.
    pub id: Uuid,
    /// Media type of the takeover.
    pub kind: NotificationKind,
    /// Optional headline.
    pub title: Option<String>,
    /// Optional body text.
    pub message: Option<String>,
    /// Optional media asset URL for image/video/audio takeovers.
    pub media_url: Option<String>,
    /// Whether this notification is currently displayed.
    pub is_active: bool,
    /// How long the takeover stays on screen before auto-expiry.
    pub duration_ms: u64,
    /// Creation timestamp.
    pub created_at: SystemTime,
}

/// Conference room booking for one of the fixed daily slots.
///
/// The `(date, slot_time)` pair is unique; double-booking is a conflict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingEntity {
    /// Stable identifier for the booking.
    pub id: Uuid,
    /// Calendar date in `YYYY-MM-DD` form.
    pub date: String,
    /// One of the fixed slot labels (e.g. `10:30 AM - 11:30 AM`).
    pub slot_time: String,
    /// Owning user.
    pub user_id: Uuid,
    /// Owning user's display name, denormalized for the schedule view.
    pub user_name: String,
    /// Creation timestamp.
    pub created_at: SystemTime,
}

/// Category of a leave request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    /// Full-day absence.
    Leave,
    /// Arriving late.
    LateComing,
    /// Leaving early.
    EarlyGoing,
}

/// Approval state of a leave request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting the team leader's decision.
    PendingTl,
    /// Forwarded by the TL, awaiting the admin's decision.
    PendingAdmin,
    /// Approved by an admin.
    Approved,
    /// Rejected by either the TL or an admin.
    Rejected,
}

/// Leave request raised by an employee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaveRequestEntity {
    /// Stable identifier for the request.
    pub id: Uuid,
    /// Requesting user.
    pub user_id: Uuid,
    /// Category of the request.
    pub kind: LeaveKind,
    /// First day of the absence, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day of the absence, `YYYY-MM-DD`.
    pub end_date: String,
    /// Reason given by the requester.
    pub reason: String,
    /// Current approval state.
    pub status: LeaveStatus,
    /// Creation timestamp.
    pub created_at: SystemTime,
}

/// Singleton document holding global, admin-controlled settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemSettingsEntity {
    /// Stable identifier for the singleton document.
    pub id: Uuid,
    /// Sound played by clients when a takeover notification arrives.
    pub notification_sound_url: Option<String>,
    /// When non-empty, restricts the leaderboard to these teams.
    pub featured_team_ids: Vec<Uuid>,
}

/// Archived monthly figures for an agent, written before a monthly rollover
/// zeroes the live counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentHistoryEntity {
    /// Stable identifier for the history row.
    pub id: Uuid,
    /// Agent the figures belong to.
    pub agent_id: Uuid,
    /// Month name the figures cover (e.g. `January`).
    pub month: String,
    /// Year the figures cover.
    pub year: i32,
    /// Activations at the end of the covered month.
    pub activations: i64,
    /// Submissions at the end of the covered month.
    pub submissions: i64,
    /// Points at the end of the covered month.
    pub points: i64,
    /// Archival timestamp.
    pub created_at: SystemTime,
}

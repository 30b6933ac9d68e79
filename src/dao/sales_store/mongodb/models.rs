use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{
    AgentEntity, AgentHistoryEntity, BookingEntity, LeaveKind, LeaveRequestEntity, LeaveStatus,
    NotificationEntity, NotificationKind, Role, SystemSettingsEntity, TeamEntity, UserEntity,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUserDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: Role,
    team_id: Option<Uuid>,
    avatar_url: Option<String>,
    contact_number: Option<String>,
    job_role: Option<String>,
}

impl From<UserEntity> for MongoUserDocument {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            password_hash: value.password_hash,
            role: value.role,
            team_id: value.team_id,
            avatar_url: value.avatar_url,
            contact_number: value.contact_number,
            job_role: value.job_role,
        }
    }
}

impl From<MongoUserDocument> for UserEntity {
    fn from(value: MongoUserDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            password_hash: value.password_hash,
            role: value.role,
            team_id: value.team_id,
            avatar_url: value.avatar_url,
            contact_number: value.contact_number,
            job_role: value.job_role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTeamDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    tl_id: Uuid,
    agents: Vec<Uuid>,
    avg_activation: i64,
    total_activations: i64,
    total_submissions: i64,
    total_points: i64,
    celebration_audio_url: Option<String>,
}

impl From<TeamEntity> for MongoTeamDocument {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            tl_id: value.tl_id,
            agents: value.agents,
            avg_activation: value.avg_activation,
            total_activations: value.total_activations,
            total_submissions: value.total_submissions,
            total_points: value.total_points,
            celebration_audio_url: value.celebration_audio_url,
        }
    }
}

impl From<MongoTeamDocument> for TeamEntity {
    fn from(value: MongoTeamDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            tl_id: value.tl_id,
            agents: value.agents,
            avg_activation: value.avg_activation,
            total_activations: value.total_activations,
            total_submissions: value.total_submissions,
            total_points: value.total_points,
            celebration_audio_url: value.celebration_audio_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoAgentDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    photo_url: String,
    team_id: Option<Uuid>,
    activation_target: i64,
    activations: i64,
    submissions: i64,
    today_submissions: i64,
    points: i64,
    last_submission_reset: DateTime,
    user_id: Option<Uuid>,
    email: Option<String>,
}

impl From<AgentEntity> for MongoAgentDocument {
    fn from(value: AgentEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            photo_url: value.photo_url,
            team_id: value.team_id,
            activation_target: value.activation_target,
            activations: value.activations,
            submissions: value.submissions,
            today_submissions: value.today_submissions,
            points: value.points,
            last_submission_reset: DateTime::from_system_time(value.last_submission_reset),
            user_id: value.user_id,
            email: value.email,
        }
    }
}

impl From<MongoAgentDocument> for AgentEntity {
    fn from(value: MongoAgentDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            photo_url: value.photo_url,
            team_id: value.team_id,
            activation_target: value.activation_target,
            activations: value.activations,
            submissions: value.submissions,
            today_submissions: value.today_submissions,
            points: value.points,
            last_submission_reset: value.last_submission_reset.to_system_time(),
            user_id: value.user_id,
            email: value.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoNotificationDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    kind: NotificationKind,
    title: Option<String>,
    message: Option<String>,
    media_url: Option<String>,
    is_active: bool,
    duration_ms: u64,
    created_at: DateTime,
}

impl From<NotificationEntity> for MongoNotificationDocument {
    fn from(value: NotificationEntity) -> Self {
        Self {
            id: value.id,
            kind: value.kind,
            title: value.title,
            message: value.message,
            media_url: value.media_url,
            is_active: value.is_active,
            duration_ms: value.duration_ms,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoNotificationDocument> for NotificationEntity {
    fn from(value: MongoNotificationDocument) -> Self {
        Self {
            id: value.id,
            kind: value.kind,
            title: value.title,
            message: value.message,
            media_url: value.media_url,
            is_active: value.is_active,
            duration_ms: value.duration_ms,
            created_at: value.created_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoBookingDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    date: String,
    slot_time: String,
    user_id: Uuid,
    user_name: String,
    created_at: DateTime,
}

impl From<BookingEntity> for MongoBookingDocument {
    fn from(value: BookingEntity) -> Self {
        Self {
            id: value.id,
            date: value.date,
            slot_time: value.slot_time,
            user_id: value.user_id,
            user_name: value.user_name,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoBookingDocument> for BookingEntity {
    fn from(value: MongoBookingDocument) -> Self {
        Self {
            id: value.id,
            date: value.date,
            slot_time: value.slot_time,
            user_id: value.user_id,
            user_name: value.user_name,
            created_at: value.created_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoLeaveDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    user_id: Uuid,
    kind: LeaveKind,
    start_date: String,
    end_date: String,
    reason: String,
    status: LeaveStatus,
    created_at: DateTime,
}

impl From<LeaveRequestEntity> for MongoLeaveDocument {
    fn from(value: LeaveRequestEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            kind: value.kind,
            start_date: value.start_date,
            end_date: value.end_date,
            reason: value.reason,
            status: value.status,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoLeaveDocument> for LeaveRequestEntity {
    fn from(value: MongoLeaveDocument) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            kind: value.kind,
            start_date: value.start_date,
            end_date: value.end_date,
            reason: value.reason,
            status: value.status,
            created_at: value.created_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSettingsDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    notification_sound_url: Option<String>,
    #[serde(default)]
    featured_team_ids: Vec<Uuid>,
}

impl From<SystemSettingsEntity> for MongoSettingsDocument {
    fn from(value: SystemSettingsEntity) -> Self {
        Self {
            id: value.id,
            notification_sound_url: value.notification_sound_url,
            featured_team_ids: value.featured_team_ids,
        }
    }
}

impl From<MongoSettingsDocument> for SystemSettingsEntity {
    fn from(value: MongoSettingsDocument) -> Self {
        Self {
            id: value.id,
            notification_sound_url: value.notification_sound_url,
            featured_team_ids: value.featured_team_ids,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoHistoryDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    agent_id: Uuid,
    month: String,
    year: i32,
    activations: i64,
    submissions: i64,
    points: i64,
    created_at: DateTime,
}

impl From<AgentHistoryEntity> for MongoHistoryDocument {
    fn from(value: AgentHistoryEntity) -> Self {
        Self {
            id: value.id,
            agent_id: value.agent_id,
            month: value.month,
            year: value.year,
            activations: value.activations,
            submissions: value.submissions,
            points: value.points,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoHistoryDocument> for AgentHistoryEntity {
    fn from(value: MongoHistoryDocument) -> Self {
        Self {
            id: value.id,
            agent_id: value.agent_id,
            month: value.month,
            year: value.year,
            activations: value.activations,
            submissions: value.submissions,
            points: value.points,
            created_at: value.created_at.to_system_time(),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}

//! Conference-room booking DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::BookingEntity,
    dto::{
        format_system_time,
        validation::{validate_calendar_date, validate_slot_label},
    },
};

/// Payload claiming a slot for the authenticated user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(custom(function = validate_calendar_date))]
    pub date: String,
    #[validate(custom(function = validate_slot_label))]
    pub slot_time: String,
}

/// Booking as listed on the schedule view.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: Uuid,
    pub date: String,
    pub slot_time: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub created_at: String,
}

impl From<BookingEntity> for BookingView {
    fn from(booking: BookingEntity) -> Self {
        Self {
            id: booking.id,
            date: booking.date,
            slot_time: booking.slot_time,
            user_id: booking.user_id,
            user_name: booking.user_name,
            created_at: format_system_time(booking.created_at),
        }
    }
}

/// Query selecting the schedule day.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BookingsQuery {
    #[validate(custom(function = validate_calendar_date))]
    pub date: String,
}

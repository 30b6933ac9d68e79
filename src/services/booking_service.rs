//! Conference-slot bookings: fixed daily slots, one owner per slot.

use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{BookingEntity, Role, UserEntity},
    dto::booking::{BookingView, CreateBookingRequest},
    error::ServiceError,
    services::ws_events,
    state::SharedState,
};

/// Book a slot for `actor`. Fails with a conflict when the slot is already
/// taken for that date.
pub async fn create(
    state: &SharedState,
    actor: &UserEntity,
    request: CreateBookingRequest,
) -> Result<BookingView, ServiceError> {
    if !state.config().is_bookable_slot(&request.slot_time) {
        return Err(ServiceError::InvalidInput(format!(
            "`{}` is not a bookable slot",
            request.slot_time
        )));
    }

    let store = state.require_sales_store().await?;
    let booking = BookingEntity {
        id: Uuid::new_v4(),
        date: request.date,
        slot_time: request.slot_time,
        user_id: actor.id,
        user_name: actor.name.clone(),
        created_at: SystemTime::now(),
    };
    store.create_booking(booking.clone()).await?;

    info!(
        booking = %booking.id,
        date = %booking.date,
        slot = %booking.slot_time,
        "slot booked"
    );
    ws_events::broadcast_booking_update(state, Some(booking.date.clone()));
    Ok(booking.into())
}

/// All bookings for a calendar date.
pub async fn list_by_date(
    state: &SharedState,
    date: &str,
) -> Result<Vec<BookingView>, ServiceError> {
    let store = state.require_sales_store().await?;
    let bookings = store.list_bookings_by_date(date.to_owned()).await?;
    Ok(bookings.into_iter().map(BookingView::from).collect())
}

/// Cancel a booking. Only its owner or an admin may do so.
pub async fn delete(
    state: &SharedState,
    actor: &UserEntity,
    booking_id: Uuid,
) -> Result<(), ServiceError> {
    let store = state.require_sales_store().await?;
    let booking = store
        .find_booking(booking_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("booking `{booking_id}` not found")))?;

    if booking.user_id != actor.id && actor.role != Role::Admin {
        return Err(ServiceError::Forbidden(
            "only the booking owner or an admin can cancel it".into(),
        ));
    }

    store.delete_booking(booking_id).await?;
    info!(booking = %booking_id, "booking cancelled");
    ws_events::broadcast_booking_update(state, Some(booking.date));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig, dao::sales_store::memory::MemorySalesStore, state::AppState,
    };
    use std::sync::Arc;

    async fn state_with_store() -> (SharedState, MemorySalesStore) {
        let state = AppState::new(AppConfig::default());
        let store = MemorySalesStore::new();
        state.install_sales_store(Arc::new(store.clone())).await;
        (state, store)
    }

    fn user(role: Role, name: &str) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: String::new(),
            role,
            team_id: None,
            avatar_url: None,
            contact_number: None,
            job_role: None,
        }
    }

    fn request(date: &str, slot: &str) -> CreateBookingRequest {
        CreateBookingRequest {
            date: date.into(),
            slot_time: slot.into(),
        }
    }

    #[tokio::test]
    async fn booking_a_taken_slot_conflicts() {
        let (state, _store) = state_with_store().await;
        let first = user(Role::Employee, "First");
        let second = user(Role::Employee, "Second");

        create(&state, &first, request("2026-03-02", "10:30 AM - 11:30 AM"))
            .await
            .unwrap();
        let taken = create(&state, &second, request("2026-03-02", "10:30 AM - 11:30 AM")).await;
        assert!(matches!(taken, Err(ServiceError::Conflict(_))));

        // Same slot on another day is fine.
        create(&state, &second, request("2026-03-03", "10:30 AM - 11:30 AM"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_slot_labels_are_rejected() {
        let (state, _store) = state_with_store().await;
        let actor = user(Role::Employee, "Anyone");

        let bad = create(&state, &actor, request("2026-03-02", "09:00 AM - 10:00 AM")).await;
        assert!(matches!(bad, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn only_owner_or_admin_can_cancel() {
        let (state, _store) = state_with_store().await;
        let owner = user(Role::Employee, "Owner");
        let stranger = user(Role::Employee, "Stranger");
        let admin = user(Role::Admin, "Admin");

        let booking = create(&state, &owner, request("2026-03-02", "11:30 AM - 12:30 PM"))
            .await
            .unwrap();
        let denied = delete(&state, &stranger, booking.id).await;
        assert!(matches!(denied, Err(ServiceError::Forbidden(_))));

        delete(&state, &owner, booking.id).await.unwrap();

        // Cancelled slots can be rebooked, and admins can cancel anyone's.
        let rebooked = create(&state, &stranger, request("2026-03-02", "11:30 AM - 12:30 PM"))
            .await
            .unwrap();
        delete(&state, &admin, rebooked.id).await.unwrap();
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_date() {
        let (state, _store) = state_with_store().await;
        let actor = user(Role::Employee, "Anyone");

        create(&state, &actor, request("2026-03-02", "12:30 PM - 01:30 PM"))
            .await
            .unwrap();
        create(&state, &actor, request("2026-03-03", "12:30 PM - 01:30 PM"))
            .await
            .unwrap();

        let day = list_by_date(&state, "2026-03-02").await.unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].date, "2026-03-02");
    }

    #[tokio::test]
    async fn cancelling_a_missing_booking_is_not_found() {
        let (state, _store) = state_with_store().await;
        let actor = user(Role::Admin, "Admin");

        let missing = delete(&state, &actor, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }
}

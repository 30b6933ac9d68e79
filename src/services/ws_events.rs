//! Typed broadcast helpers over the connection hub.

use tracing::debug;

use crate::{
    dto::{
        admin::{ActiveNotification, SettingsView},
        leaderboard::{CelebrationEvent, LeaderboardSnapshot},
        ws::ServerMessage,
    },
    state::SharedState,
};

/// Push a freshly computed leaderboard to every connected client.
pub fn broadcast_leaderboard(state: &SharedState, snapshot: LeaderboardSnapshot) {
    let delivered = state
        .hub()
        .broadcast_all(&ServerMessage::LeaderboardUpdate(snapshot));
    debug!(delivered, "broadcast leaderboard:update");
}

/// Push a celebration event for a positive submission delta.
pub fn broadcast_celebration(state: &SharedState, event: CelebrationEvent) {
    let delivered = state
        .hub()
        .broadcast_all(&ServerMessage::SaleActivation(event));
    debug!(delivered, "broadcast sale:activation");
}

/// Announce a newly activated takeover notification.
pub fn broadcast_notification_active(state: &SharedState, notification: ActiveNotification) {
    let delivered = state
        .hub()
        .broadcast_all(&ServerMessage::NotificationActive(notification));
    debug!(delivered, "broadcast notification:active");
}

/// Tell every client to dismiss the takeover overlay.
pub fn broadcast_notification_clear(state: &SharedState) {
    let delivered = state
        .hub()
        .broadcast_all(&ServerMessage::NotificationClear {});
    debug!(delivered, "broadcast notification:clear");
}

/// Push updated global settings.
pub fn broadcast_settings(state: &SharedState, settings: SettingsView) {
    let delivered = state
        .hub()
        .broadcast_all(&ServerMessage::SettingsUpdate(settings));
    debug!(delivered, "broadcast settings:update");
}

/// Nudge clients to refetch the booking schedule for `date`.
pub fn broadcast_booking_update(state: &SharedState, date: Option<String>) {
    let delivered = state
        .hub()
        .broadcast_all(&ServerMessage::BookingUpdate { date });
    debug!(delivered, "broadcast booking:update");
}

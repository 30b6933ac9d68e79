//! Takeover notification lifecycle: push, auto-expiry and manual clear.

use std::time::{Duration, SystemTime};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::models::NotificationEntity,
    dto::admin::{ActiveNotification, NotificationPush},
    error::ServiceError,
    services::ws_events,
    state::SharedState,
};

/// Activate a new takeover notification, displacing any currently active one,
/// and schedule its auto-expiry.
pub async fn push(
    state: &SharedState,
    request: NotificationPush,
) -> Result<ActiveNotification, ServiceError> {
    let store = state.require_sales_store().await?;

    let duration_ms = request
        .duration_ms
        .unwrap_or_else(|| state.config().notification_duration_ms());
    let entity = NotificationEntity {
        id: Uuid::new_v4(),
        kind: request.kind,
        title: request.title,
        message: request.message,
        media_url: request.media_url,
        is_active: true,
        duration_ms,
        created_at: SystemTime::now(),
    };
    store.create_notification(entity.clone()).await?;

    let sound_url = store.settings().await?.notification_sound_url;
    let active = ActiveNotification::from_entity(entity.clone(), sound_url);
    ws_events::broadcast_notification_active(state, active.clone());
    info!(notification = %entity.id, duration_ms, "notification activated");

    schedule_expiry(state, entity.id, duration_ms).await;
    Ok(active)
}

/// Deactivate the current notification and tell clients to dismiss it.
pub async fn clear(state: &SharedState) -> Result<(), ServiceError> {
    state.cancel_notification_timer().await;

    let store = state.require_sales_store().await?;
    store.deactivate_notifications().await?;
    ws_events::broadcast_notification_clear(state);
    info!("notifications cleared");
    Ok(())
}

/// The notification still marked active, if any, ready for a late joiner.
pub async fn active(state: &SharedState) -> Result<Option<ActiveNotification>, ServiceError> {
    let store = state.require_sales_store().await?;
    let Some(entity) = store.active_notification().await? else {
        return Ok(None);
    };
    let sound_url = store.settings().await?.notification_sound_url;
    Ok(Some(ActiveNotification::from_entity(entity, sound_url)))
}

/// Arm the expiry timer for `notification_id`, replacing (and aborting) the
/// timer of any notification it displaced.
async fn schedule_expiry(state: &SharedState, notification_id: Uuid, duration_ms: u64) {
    let state_for_task = state.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(duration_ms)).await;

        let Some(store) = state_for_task.sales_store().await else {
            warn!(notification = %notification_id, "storage gone; expiry skipped");
            return;
        };
        if let Err(err) = store.deactivate_notifications().await {
            warn!(
                notification = %notification_id,
                error = %err,
                "failed to deactivate expired notification"
            );
            return;
        }
        ws_events::broadcast_notification_clear(&state_for_task);
        info!(notification = %notification_id, "notification expired");
    });
    state.replace_notification_timer(handle).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::NotificationKind,
            sales_store::{SalesStore, memory::MemorySalesStore},
        },
        state::AppState,
    };
    use std::sync::Arc;

    async fn state_with_store() -> (SharedState, MemorySalesStore) {
        let state = AppState::new(AppConfig::default());
        let store = MemorySalesStore::new();
        state.install_sales_store(Arc::new(store.clone())).await;
        (state, store)
    }

    fn request(duration_ms: Option<u64>) -> NotificationPush {
        NotificationPush {
            kind: NotificationKind::Text,
            title: Some("Team huddle".into()),
            message: Some("Conference room, five minutes.".into()),
            media_url: None,
            duration_ms,
        }
    }

    #[tokio::test]
    async fn push_activates_and_expiry_deactivates() {
        let (state, store) = state_with_store().await;

        let active = push(&state, request(Some(50))).await.unwrap();
        assert_eq!(active.duration_ms, 50);
        assert!(store.active_notification().await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(store.active_notification().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn a_new_push_displaces_the_previous_notification() {
        let (state, store) = state_with_store().await;

        let first = push(&state, request(Some(50))).await.unwrap();
        // Long duration so only the second timer is armed.
        let second = push(&state, request(Some(60_000))).await.unwrap();
        assert_ne!(first.id, second.id);

        // The first notification's timer was aborted; past its deadline the
        // second notification must still be the active one.
        tokio::time::sleep(Duration::from_millis(150)).await;
        let active = store.active_notification().await.unwrap().unwrap();
        assert_eq!(active.id, second.id);
    }

    #[tokio::test]
    async fn clear_deactivates_immediately() {
        let (state, store) = state_with_store().await;

        push(&state, request(Some(60_000))).await.unwrap();
        clear(&state).await.unwrap();
        assert!(store.active_notification().await.unwrap().is_none());
        assert!(active(&state).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_duration_falls_back_to_the_configured_default() {
        let (state, _store) = state_with_store().await;

        let active = push(&state, request(None)).await.unwrap();
        assert_eq!(active.duration_ms, 15_000);
        // Disarm so the test does not leave a long timer running.
        state.cancel_notification_timer().await;
    }

    #[tokio::test]
    async fn active_carries_the_configured_sound() {
        let (state, store) = state_with_store().await;

        let mut settings = store.settings().await.unwrap();
        settings.notification_sound_url = Some("https://cdn.example.com/ding.mp3".into());
        store.save_settings(settings).await.unwrap();

        push(&state, request(Some(60_000))).await.unwrap();
        let current = active(&state).await.unwrap().unwrap();
        assert_eq!(
            current.notification_sound_url.as_deref(),
            Some("https://cdn.example.com/ding.mp3")
        );
        state.cancel_notification_timer().await;
    }
}

use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dao::{
    models::{
        AgentDelta, AgentEntity, AgentHistoryEntity, BookingEntity, LeaveRequestEntity,
        NotificationEntity, SystemSettingsEntity, TeamEntity, UserEntity,
    },
    sales_store::SalesStore,
    storage::{StorageError, StorageResult},
};

/// In-memory store used by tests and as a fallback for local development.
///
/// Collections keep insertion order, so listings are stable across calls the
/// same way an unsorted database scan over an append-only collection is.
#[derive(Clone, Default)]
pub struct MemorySalesStore {
    inner: Arc<RwLock<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    users: IndexMap<Uuid, UserEntity>,
    teams: IndexMap<Uuid, TeamEntity>,
    agents: IndexMap<Uuid, AgentEntity>,
    notifications: IndexMap<Uuid, NotificationEntity>,
    bookings: IndexMap<Uuid, BookingEntity>,
    leaves: IndexMap<Uuid, LeaveRequestEntity>,
    settings: Option<SystemSettingsEntity>,
    history: Vec<AgentHistoryEntity>,
}

fn clamped(value: i64, delta: Option<i64>) -> i64 {
    (value + delta.unwrap_or(0)).max(0)
}

impl MemorySalesStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SalesStore for MemorySalesStore {
    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.write().await.users.insert(user.id, user);
            Ok(())
        })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.users.get(&id).cloned()) })
    }

    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let guard = inner.read().await;
            Ok(guard
                .users
                .values()
                .find(|user| user.email.eq_ignore_ascii_case(&email))
                .cloned())
        })
    }

    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.users.values().cloned().collect()) })
    }

    fn delete_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.write().await.users.shift_remove(&id);
            Ok(())
        })
    }

    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.write().await.teams.insert(team.id, team);
            Ok(())
        })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.teams.get(&id).cloned()) })
    }

    fn find_team_by_tl(
        &self,
        tl_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let guard = inner.read().await;
            Ok(guard.teams.values().find(|team| team.tl_id == tl_id).cloned())
        })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.teams.values().cloned().collect()) })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.write().await.teams.shift_remove(&id);
            Ok(())
        })
    }

    fn save_agent(&self, agent: AgentEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.write().await.agents.insert(agent.id, agent);
            Ok(())
        })
    }

    fn find_agent(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<AgentEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.agents.get(&id).cloned()) })
    }

    fn list_agents(&self) -> BoxFuture<'static, StorageResult<Vec<AgentEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.agents.values().cloned().collect()) })
    }

    fn list_agents_by_team(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AgentEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let guard = inner.read().await;
            Ok(guard
                .agents
                .values()
                .filter(|agent| agent.team_id == Some(team_id))
                .cloned()
                .collect())
        })
    }

    fn apply_agent_delta(
        &self,
        id: Uuid,
        delta: AgentDelta,
    ) -> BoxFuture<'static, StorageResult<Option<AgentEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut guard = inner.write().await;
            let Some(agent) = guard.agents.get_mut(&id) else {
                return Ok(None);
            };
            agent.submissions = clamped(agent.submissions, delta.submissions);
            agent.today_submissions = clamped(agent.today_submissions, delta.submissions);
            agent.activations = clamped(agent.activations, delta.activations);
            agent.points = clamped(agent.points, delta.points);
            Ok(Some(agent.clone()))
        })
    }

    fn delete_agent(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.write().await.agents.shift_remove(&id);
            Ok(())
        })
    }

    fn create_notification(
        &self,
        notification: NotificationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut guard = inner.write().await;
            for stored in guard.notifications.values_mut() {
                stored.is_active = false;
            }
            guard.notifications.insert(notification.id, notification);
            Ok(())
        })
    }

    fn active_notification(
        &self,
    ) -> BoxFuture<'static, StorageResult<Option<NotificationEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let guard = inner.read().await;
            Ok(guard
                .notifications
                .values()
                .find(|notification| notification.is_active)
                .cloned())
        })
    }

    fn deactivate_notifications(&self) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut guard = inner.write().await;
            for stored in guard.notifications.values_mut() {
                stored.is_active = false;
            }
            Ok(())
        })
    }

    fn create_booking(&self, booking: BookingEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut guard = inner.write().await;
            let taken = guard
                .bookings
                .values()
                .any(|stored| stored.date == booking.date && stored.slot_time == booking.slot_time);
            if taken {
                return Err(StorageError::conflict(format!(
                    "slot {} on {} already booked",
                    booking.slot_time, booking.date
                )));
            }
            guard.bookings.insert(booking.id, booking);
            Ok(())
        })
    }

    fn find_booking(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<BookingEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.bookings.get(&id).cloned()) })
    }

    fn list_bookings_by_date(
        &self,
        date: String,
    ) -> BoxFuture<'static, StorageResult<Vec<BookingEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let guard = inner.read().await;
            Ok(guard
                .bookings
                .values()
                .filter(|booking| booking.date == date)
                .cloned()
                .collect())
        })
    }

    fn delete_booking(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.write().await.bookings.shift_remove(&id);
            Ok(())
        })
    }

    fn save_leave(&self, leave: LeaveRequestEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.write().await.leaves.insert(leave.id, leave);
            Ok(())
        })
    }

    fn find_leave(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<LeaveRequestEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.leaves.get(&id).cloned()) })
    }

    fn list_leaves(&self) -> BoxFuture<'static, StorageResult<Vec<LeaveRequestEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.read().await.leaves.values().cloned().collect()) })
    }

    fn list_leaves_by_user(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<LeaveRequestEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let guard = inner.read().await;
            Ok(guard
                .leaves
                .values()
                .filter(|leave| leave.user_id == user_id)
                .cloned()
                .collect())
        })
    }

    fn settings(&self) -> BoxFuture<'static, StorageResult<SystemSettingsEntity>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut guard = inner.write().await;
            let settings = guard.settings.get_or_insert_with(|| SystemSettingsEntity {
                id: Uuid::new_v4(),
                notification_sound_url: None,
                featured_team_ids: Vec::new(),
            });
            Ok(settings.clone())
        })
    }

    fn save_settings(
        &self,
        settings: SystemSettingsEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.write().await.settings = Some(settings);
            Ok(())
        })
    }

    fn save_history(&self, entry: AgentHistoryEntity) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.write().await.history.push(entry);
            Ok(())
        })
    }

    fn list_history_by_agent(
        &self,
        agent_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AgentHistoryEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let guard = inner.read().await;
            Ok(guard
                .history
                .iter()
                .filter(|entry| entry.agent_id == agent_id)
                .cloned()
                .collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn agent(activations: i64, submissions: i64, today: i64) -> AgentEntity {
        AgentEntity {
            id: Uuid::new_v4(),
            name: "Agent".to_owned(),
            photo_url: "https://example.com/p.png".to_owned(),
            team_id: None,
            activation_target: 10,
            activations,
            submissions,
            today_submissions: today,
            points: 0,
            last_submission_reset: SystemTime::UNIX_EPOCH,
            user_id: None,
            email: None,
        }
    }

    #[tokio::test]
    async fn delta_applies_to_both_submission_counters() {
        let store = MemorySalesStore::new();
        let subject = agent(8, 3, 1);
        let id = subject.id;
        store.save_agent(subject).await.unwrap();

        let updated = store
            .apply_agent_delta(
                id,
                AgentDelta {
                    submissions: Some(2),
                    ..AgentDelta::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.submissions, 5);
        assert_eq!(updated.today_submissions, 3);
        assert_eq!(updated.activations, 8);
    }

    #[tokio::test]
    async fn delta_clamps_each_counter_at_zero() {
        let store = MemorySalesStore::new();
        let subject = agent(1, 2, 0);
        let id = subject.id;
        store.save_agent(subject).await.unwrap();

        let updated = store
            .apply_agent_delta(
                id,
                AgentDelta {
                    submissions: Some(-5),
                    activations: Some(-5),
                    points: Some(-1),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.submissions, 0);
        assert_eq!(updated.today_submissions, 0);
        assert_eq!(updated.activations, 0);
        assert_eq!(updated.points, 0);
    }

    #[tokio::test]
    async fn create_notification_keeps_a_single_active_entry() {
        let store = MemorySalesStore::new();
        let first = NotificationEntity {
            id: Uuid::new_v4(),
            kind: crate::dao::models::NotificationKind::Text,
            title: Some("First".to_owned()),
            message: None,
            media_url: None,
            is_active: true,
            duration_ms: 10_000,
            created_at: SystemTime::now(),
        };
        let second = NotificationEntity {
            id: Uuid::new_v4(),
            title: Some("Second".to_owned()),
            ..first.clone()
        };

        store.create_notification(first).await.unwrap();
        store.create_notification(second.clone()).await.unwrap();

        let active = store.active_notification().await.unwrap().unwrap();
        assert_eq!(active.id, second.id);

        store.deactivate_notifications().await.unwrap();
        assert!(store.active_notification().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn booking_slot_cannot_be_double_booked() {
        let store = MemorySalesStore::new();
        let booking = BookingEntity {
            id: Uuid::new_v4(),
            date: "2026-03-02".to_owned(),
            slot_time: "10:30 AM".to_owned(),
            user_id: Uuid::new_v4(),
            user_name: "Dana".to_owned(),
            created_at: SystemTime::now(),
        };
        store.create_booking(booking.clone()).await.unwrap();

        let rival = BookingEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_name: "Sam".to_owned(),
            ..booking.clone()
        };
        assert!(matches!(
            store.create_booking(rival).await,
            Err(StorageError::Conflict { .. })
        ));

        // Freeing the slot makes it bookable again.
        store.delete_booking(booking.id).await.unwrap();
        let rebook = BookingEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_name: "Sam".to_owned(),
            ..booking
        };
        store.create_booking(rebook).await.unwrap();
    }

    #[tokio::test]
    async fn settings_singleton_is_created_on_first_read_and_stable_after() {
        let store = MemorySalesStore::new();
        let first = store.settings().await.unwrap();
        assert!(first.featured_team_ids.is_empty());

        let mut updated = first.clone();
        updated.featured_team_ids.push(Uuid::new_v4());
        store.save_settings(updated.clone()).await.unwrap();

        let second = store.settings().await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.featured_team_ids, updated.featured_team_ids);
    }
}

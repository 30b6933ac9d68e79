pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{
    AgentDelta, AgentEntity, AgentHistoryEntity, BookingEntity, LeaveRequestEntity,
    NotificationEntity, SystemSettingsEntity, TeamEntity, UserEntity,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for users, teams, agents and the
/// satellite collections (notifications, bookings, leaves, settings,
/// history).
pub trait SalesStore: Send + Sync {
    // Users
    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>>;
    fn delete_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>>;

    // Teams
    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    fn find_team_by_tl(
        &self,
        tl_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>>;

    // Agents
    fn save_agent(&self, agent: AgentEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_agent(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<AgentEntity>>>;
    fn list_agents(&self) -> BoxFuture<'static, StorageResult<Vec<AgentEntity>>>;
    fn list_agents_by_team(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AgentEntity>>>;
    /// Atomically add `delta` to the agent's counters, clamping every
    /// counter at zero, and return the post-update agent. Concurrent deltas
    /// against the same agent must both land.
    fn apply_agent_delta(
        &self,
        id: Uuid,
        delta: AgentDelta,
    ) -> BoxFuture<'static, StorageResult<Option<AgentEntity>>>;
    fn delete_agent(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>>;

    // Notifications
    /// Deactivate every stored notification, then insert `notification`.
    /// Preserves the single-active invariant at the storage layer.
    fn create_notification(
        &self,
        notification: NotificationEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn active_notification(
        &self,
    ) -> BoxFuture<'static, StorageResult<Option<NotificationEntity>>>;
    fn deactivate_notifications(&self) -> BoxFuture<'static, StorageResult<()>>;

    // Bookings
    /// Insert a booking; fails with [`StorageError::Conflict`] when the
    /// `(date, slot_time)` pair is already taken.
    ///
    /// [`StorageError::Conflict`]: crate::dao::storage::StorageError::Conflict
    fn create_booking(&self, booking: BookingEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_booking(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<BookingEntity>>>;
    fn list_bookings_by_date(
        &self,
        date: String,
    ) -> BoxFuture<'static, StorageResult<Vec<BookingEntity>>>;
    fn delete_booking(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>>;

    // Leave requests
    fn save_leave(&self, leave: LeaveRequestEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_leave(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<LeaveRequestEntity>>>;
    fn list_leaves(&self) -> BoxFuture<'static, StorageResult<Vec<LeaveRequestEntity>>>;
    fn list_leaves_by_user(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<LeaveRequestEntity>>>;

    // Settings
    /// Fetch the singleton settings document, creating the default one when
    /// none exists yet.
    fn settings(&self) -> BoxFuture<'static, StorageResult<SystemSettingsEntity>>;
    fn save_settings(
        &self,
        settings: SystemSettingsEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;

    // Monthly history
    fn save_history(
        &self,
        entry: AgentHistoryEntity,
    ) -> BoxFuture<'static, StorageResult<()>>;
    fn list_history_by_agent(
        &self,
        agent_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AgentHistoryEntity>>>;

    // Connectivity
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::doc,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        MongoAgentDocument, MongoBookingDocument, MongoHistoryDocument, MongoLeaveDocument,
        MongoNotificationDocument, MongoSettingsDocument, MongoTeamDocument, MongoUserDocument,
        doc_id, uuid_as_binary,
    },
};
use crate::dao::{
    models::{
        AgentDelta, AgentEntity, AgentHistoryEntity, BookingEntity, LeaveRequestEntity,
        NotificationEntity, SystemSettingsEntity, TeamEntity, UserEntity,
    },
    sales_store::SalesStore,
    storage::StorageResult,
};

const USERS: &str = "users";
const TEAMS: &str = "teams";
const AGENTS: &str = "agents";
const NOTIFICATIONS: &str = "notifications";
const BOOKINGS: &str = "bookings";
const LEAVES: &str = "leave_requests";
const SETTINGS: &str = "system_settings";
const HISTORY: &str = "agent_history";

#[derive(Clone)]
pub struct MongoSalesStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

impl MongoSalesStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        let users = database.collection::<MongoUserDocument>(USERS);
        let email_index = mongodb::IndexModel::builder()
            .keys(doc! {"email": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("user_email_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        users
            .create_index(email_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: USERS,
                index: "email",
                source,
            })?;

        let agents = database.collection::<MongoAgentDocument>(AGENTS);
        let team_index = mongodb::IndexModel::builder()
            .keys(doc! {"team_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("agent_team_idx".to_owned()))
                    .build(),
            )
            .build();
        agents
            .create_index(team_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: AGENTS,
                index: "team_id",
                source,
            })?;

        // The unique slot index is what turns a double-booking race into a
        // duplicate-key error instead of two stored bookings.
        let bookings = database.collection::<MongoBookingDocument>(BOOKINGS);
        let slot_index = mongodb::IndexModel::builder()
            .keys(doc! {"date": 1, "slot_time": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("booking_slot_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        bookings
            .create_index(slot_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: BOOKINGS,
                index: "date,slot_time",
                source,
            })?;

        let leaves = database.collection::<MongoLeaveDocument>(LEAVES);
        let leave_user_index = mongodb::IndexModel::builder()
            .keys(doc! {"user_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("leave_user_idx".to_owned()))
                    .build(),
            )
            .build();
        leaves
            .create_index(leave_user_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: LEAVES,
                index: "user_id",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        let guard = self.inner.state.read().await;
        guard.database.collection::<T>(name)
    }

    async fn save_user(&self, user: UserEntity) -> MongoResult<()> {
        let id = user.id;
        let document: MongoUserDocument = user.into();
        self.collection::<MongoUserDocument>(USERS)
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveDocument {
                collection: USERS,
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> MongoResult<Option<UserEntity>> {
        let document = self
            .collection::<MongoUserDocument>(USERS)
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: USERS,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn find_user_by_email(&self, email: String) -> MongoResult<Option<UserEntity>> {
        let document = self
            .collection::<MongoUserDocument>(USERS)
            .await
            .find_one(doc! {"email": email})
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: USERS,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_users(&self) -> MongoResult<Vec<UserEntity>> {
        let documents: Vec<MongoUserDocument> = self
            .collection::<MongoUserDocument>(USERS)
            .await
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: USERS,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: USERS,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_user(&self, id: Uuid) -> MongoResult<()> {
        self.collection::<MongoUserDocument>(USERS)
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteDocument {
                collection: USERS,
                id,
                source,
            })?;
        Ok(())
    }

    async fn save_team(&self, team: TeamEntity) -> MongoResult<()> {
        let id = team.id;
        let document: MongoTeamDocument = team.into();
        self.collection::<MongoTeamDocument>(TEAMS)
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveDocument {
                collection: TEAMS,
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_team(&self, id: Uuid) -> MongoResult<Option<TeamEntity>> {
        let document = self
            .collection::<MongoTeamDocument>(TEAMS)
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: TEAMS,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn find_team_by_tl(&self, tl_id: Uuid) -> MongoResult<Option<TeamEntity>> {
        let document = self
            .collection::<MongoTeamDocument>(TEAMS)
            .await
            .find_one(doc! {"tl_id": uuid_as_binary(tl_id)})
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: TEAMS,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_teams(&self) -> MongoResult<Vec<TeamEntity>> {
        let documents: Vec<MongoTeamDocument> = self
            .collection::<MongoTeamDocument>(TEAMS)
            .await
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: TEAMS,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: TEAMS,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_team(&self, id: Uuid) -> MongoResult<()> {
        self.collection::<MongoTeamDocument>(TEAMS)
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteDocument {
                collection: TEAMS,
                id,
                source,
            })?;
        Ok(())
    }

    async fn save_agent(&self, agent: AgentEntity) -> MongoResult<()> {
        let id = agent.id;
        let document: MongoAgentDocument = agent.into();
        self.collection::<MongoAgentDocument>(AGENTS)
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveDocument {
                collection: AGENTS,
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_agent(&self, id: Uuid) -> MongoResult<Option<AgentEntity>> {
        let document = self
            .collection::<MongoAgentDocument>(AGENTS)
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: AGENTS,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_agents(&self) -> MongoResult<Vec<AgentEntity>> {
        let documents: Vec<MongoAgentDocument> = self
            .collection::<MongoAgentDocument>(AGENTS)
            .await
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: AGENTS,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: AGENTS,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn list_agents_by_team(&self, team_id: Uuid) -> MongoResult<Vec<AgentEntity>> {
        let documents: Vec<MongoAgentDocument> = self
            .collection::<MongoAgentDocument>(AGENTS)
            .await
            .find(doc! {"team_id": uuid_as_binary(team_id)})
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: AGENTS,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: AGENTS,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn apply_agent_delta(
        &self,
        id: Uuid,
        delta: AgentDelta,
    ) -> MongoResult<Option<AgentEntity>> {
        let submissions = delta.submissions.unwrap_or(0);
        let activations = delta.activations.unwrap_or(0);
        let points = delta.points.unwrap_or(0);

        // Aggregation-pipeline update: increment and clamp in one atomic
        // server-side operation so concurrent deltas cannot lose writes.
        let update = vec![doc! {
            "$set": {
                "submissions": {"$max": [0, {"$add": ["$submissions", submissions]}]},
                "today_submissions": {"$max": [0, {"$add": ["$today_submissions", submissions]}]},
                "activations": {"$max": [0, {"$add": ["$activations", activations]}]},
                "points": {"$max": [0, {"$add": ["$points", points]}]},
            }
        }];

        let document = self
            .collection::<MongoAgentDocument>(AGENTS)
            .await
            .find_one_and_update(doc_id(id), update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::UpdateCollection {
                collection: AGENTS,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn delete_agent(&self, id: Uuid) -> MongoResult<()> {
        self.collection::<MongoAgentDocument>(AGENTS)
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteDocument {
                collection: AGENTS,
                id,
                source,
            })?;
        Ok(())
    }

    async fn create_notification(&self, notification: NotificationEntity) -> MongoResult<()> {
        let collection = self
            .collection::<MongoNotificationDocument>(NOTIFICATIONS)
            .await;

        collection
            .update_many(doc! {}, doc! {"$set": {"is_active": false}})
            .await
            .map_err(|source| MongoDaoError::UpdateCollection {
                collection: NOTIFICATIONS,
                source,
            })?;

        let id = notification.id;
        let document: MongoNotificationDocument = notification.into();
        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveDocument {
                collection: NOTIFICATIONS,
                id,
                source,
            })?;
        Ok(())
    }

    async fn active_notification(&self) -> MongoResult<Option<NotificationEntity>> {
        let document = self
            .collection::<MongoNotificationDocument>(NOTIFICATIONS)
            .await
            .find_one(doc! {"is_active": true})
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: NOTIFICATIONS,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn deactivate_notifications(&self) -> MongoResult<()> {
        self.collection::<MongoNotificationDocument>(NOTIFICATIONS)
            .await
            .update_many(doc! {}, doc! {"$set": {"is_active": false}})
            .await
            .map_err(|source| MongoDaoError::UpdateCollection {
                collection: NOTIFICATIONS,
                source,
            })?;
        Ok(())
    }

    async fn create_booking(&self, booking: BookingEntity) -> MongoResult<()> {
        let id = booking.id;
        let date = booking.date.clone();
        let slot = booking.slot_time.clone();
        let document: MongoBookingDocument = booking.into();

        match self
            .collection::<MongoBookingDocument>(BOOKINGS)
            .await
            .insert_one(&document)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(MongoDaoError::SlotTaken { date, slot }),
            Err(source) => Err(MongoDaoError::SaveDocument {
                collection: BOOKINGS,
                id,
                source,
            }),
        }
    }

    async fn find_booking(&self, id: Uuid) -> MongoResult<Option<BookingEntity>> {
        let document = self
            .collection::<MongoBookingDocument>(BOOKINGS)
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: BOOKINGS,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_bookings_by_date(&self, date: String) -> MongoResult<Vec<BookingEntity>> {
        let documents: Vec<MongoBookingDocument> = self
            .collection::<MongoBookingDocument>(BOOKINGS)
            .await
            .find(doc! {"date": date})
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: BOOKINGS,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: BOOKINGS,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_booking(&self, id: Uuid) -> MongoResult<()> {
        self.collection::<MongoBookingDocument>(BOOKINGS)
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteDocument {
                collection: BOOKINGS,
                id,
                source,
            })?;
        Ok(())
    }

    async fn save_leave(&self, leave: LeaveRequestEntity) -> MongoResult<()> {
        let id = leave.id;
        let document: MongoLeaveDocument = leave.into();
        self.collection::<MongoLeaveDocument>(LEAVES)
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveDocument {
                collection: LEAVES,
                id,
                source,
            })?;
        Ok(())
    }

    async fn find_leave(&self, id: Uuid) -> MongoResult<Option<LeaveRequestEntity>> {
        let document = self
            .collection::<MongoLeaveDocument>(LEAVES)
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: LEAVES,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn list_leaves(&self) -> MongoResult<Vec<LeaveRequestEntity>> {
        let documents: Vec<MongoLeaveDocument> = self
            .collection::<MongoLeaveDocument>(LEAVES)
            .await
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: LEAVES,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: LEAVES,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn list_leaves_by_user(&self, user_id: Uuid) -> MongoResult<Vec<LeaveRequestEntity>> {
        let documents: Vec<MongoLeaveDocument> = self
            .collection::<MongoLeaveDocument>(LEAVES)
            .await
            .find(doc! {"user_id": uuid_as_binary(user_id)})
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: LEAVES,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: LEAVES,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn settings(&self) -> MongoResult<SystemSettingsEntity> {
        let collection = self.collection::<MongoSettingsDocument>(SETTINGS).await;
        let existing = collection
            .find_one(doc! {})
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: SETTINGS,
                source,
            })?;

        if let Some(document) = existing {
            return Ok(document.into());
        }

        let defaults = SystemSettingsEntity {
            id: Uuid::new_v4(),
            notification_sound_url: None,
            featured_team_ids: Vec::new(),
        };
        let id = defaults.id;
        let document: MongoSettingsDocument = defaults.clone().into();
        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveDocument {
                collection: SETTINGS,
                id,
                source,
            })?;
        Ok(defaults)
    }

    async fn save_settings(&self, settings: SystemSettingsEntity) -> MongoResult<()> {
        let id = settings.id;
        let document: MongoSettingsDocument = settings.into();
        self.collection::<MongoSettingsDocument>(SETTINGS)
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveDocument {
                collection: SETTINGS,
                id,
                source,
            })?;
        Ok(())
    }

    async fn save_history(&self, entry: AgentHistoryEntity) -> MongoResult<()> {
        let id = entry.id;
        let document: MongoHistoryDocument = entry.into();
        self.collection::<MongoHistoryDocument>(HISTORY)
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveDocument {
                collection: HISTORY,
                id,
                source,
            })?;
        Ok(())
    }

    async fn list_history_by_agent(&self, agent_id: Uuid) -> MongoResult<Vec<AgentHistoryEntity>> {
        let documents: Vec<MongoHistoryDocument> = self
            .collection::<MongoHistoryDocument>(HISTORY)
            .await
            .find(doc! {"agent_id": uuid_as_binary(agent_id)})
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: HISTORY,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadDocument {
                collection: HISTORY,
                source,
            })?;
        Ok(documents.into_iter().map(Into::into).collect())
    }
}

impl SalesStore for MongoSalesStore {
    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_user(user).await.map_err(Into::into) })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_user(id).await.map_err(Into::into) })
    }

    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_user_by_email(email).await.map_err(Into::into) })
    }

    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_users().await.map_err(Into::into) })
    }

    fn delete_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.delete_user(id).await.map_err(Into::into) })
    }

    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_team(team).await.map_err(Into::into) })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_team(id).await.map_err(Into::into) })
    }

    fn find_team_by_tl(
        &self,
        tl_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_team_by_tl(tl_id).await.map_err(Into::into) })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_teams().await.map_err(Into::into) })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.delete_team(id).await.map_err(Into::into) })
    }

    fn save_agent(&self, agent: AgentEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_agent(agent).await.map_err(Into::into) })
    }

    fn find_agent(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<AgentEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_agent(id).await.map_err(Into::into) })
    }

    fn list_agents(&self) -> BoxFuture<'static, StorageResult<Vec<AgentEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_agents().await.map_err(Into::into) })
    }

    fn list_agents_by_team(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AgentEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_agents_by_team(team_id).await.map_err(Into::into) })
    }

    fn apply_agent_delta(
        &self,
        id: Uuid,
        delta: AgentDelta,
    ) -> BoxFuture<'static, StorageResult<Option<AgentEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.apply_agent_delta(id, delta).await.map_err(Into::into) })
    }

    fn delete_agent(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.delete_agent(id).await.map_err(Into::into) })
    }

    fn create_notification(
        &self,
        notification: NotificationEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .create_notification(notification)
                .await
                .map_err(Into::into)
        })
    }

    fn active_notification(
        &self,
    ) -> BoxFuture<'static, StorageResult<Option<NotificationEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.active_notification().await.map_err(Into::into) })
    }

    fn deactivate_notifications(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.deactivate_notifications().await.map_err(Into::into) })
    }

    fn create_booking(&self, booking: BookingEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.create_booking(booking).await.map_err(Into::into) })
    }

    fn find_booking(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<BookingEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_booking(id).await.map_err(Into::into) })
    }

    fn list_bookings_by_date(
        &self,
        date: String,
    ) -> BoxFuture<'static, StorageResult<Vec<BookingEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_bookings_by_date(date).await.map_err(Into::into) })
    }

    fn delete_booking(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.delete_booking(id).await.map_err(Into::into) })
    }

    fn save_leave(&self, leave: LeaveRequestEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_leave(leave).await.map_err(Into::into) })
    }

    fn find_leave(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<LeaveRequestEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_leave(id).await.map_err(Into::into) })
    }

    fn list_leaves(&self) -> BoxFuture<'static, StorageResult<Vec<LeaveRequestEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_leaves().await.map_err(Into::into) })
    }

    fn list_leaves_by_user(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<LeaveRequestEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_leaves_by_user(user_id).await.map_err(Into::into) })
    }

    fn settings(&self) -> BoxFuture<'static, StorageResult<SystemSettingsEntity>> {
        let store = self.clone();
        Box::pin(async move { store.settings().await.map_err(Into::into) })
    }

    fn save_settings(
        &self,
        settings: SystemSettingsEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_settings(settings).await.map_err(Into::into) })
    }

    fn save_history(&self, entry: AgentHistoryEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_history(entry).await.map_err(Into::into) })
    }

    fn list_history_by_agent(
        &self,
        agent_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AgentHistoryEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_history_by_agent(agent_id)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}

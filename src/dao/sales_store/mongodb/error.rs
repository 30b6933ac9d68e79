use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save document `{id}` in collection `{collection}`")]
    SaveDocument {
        collection: &'static str,
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load from collection `{collection}`")]
    LoadDocument {
        collection: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete document `{id}` from collection `{collection}`")]
    DeleteDocument {
        collection: &'static str,
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to update collection `{collection}`")]
    UpdateCollection {
        collection: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("booking slot `{slot}` on `{date}` is already taken")]
    SlotTaken { date: String, slot: String },
    #[error("missing required environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
}

mod connection;
mod error;
mod models;
pub mod store;

pub use error::MongoDaoError;
pub use store::MongoSalesStore;

pub mod config;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::SlotTaken { ref date, ref slot } => {
                StorageError::conflict(format!("slot {slot} on {date} already booked"))
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}

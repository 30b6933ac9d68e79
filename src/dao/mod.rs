/// Database model definitions.
pub mod models;
/// Leaderboard data storage and retrieval operations.
pub mod sales_store;
/// Storage abstraction layer for database operations.
pub mod storage;

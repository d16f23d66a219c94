/// Match and user storage and retrieval operations.
pub mod match_store;
/// Database model definitions.
pub(crate) mod models;
/// Storage abstraction layer for database operations.
pub mod storage;

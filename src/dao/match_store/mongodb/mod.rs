mod config;
mod connection;
mod error;
mod models;
mod store;

pub use config::MongoConfig;
pub use store::MongoMatchStore;

use crate::dao::storage::StorageError;
use error::MongoDaoError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::DuplicateUsername { username } => {
                StorageError::Conflict(format!("username `{username}` already exists"))
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}

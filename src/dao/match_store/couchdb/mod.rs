mod config;
mod error;
mod models;
mod store;

pub use config::CouchConfig;
pub use store::CouchMatchStore;

use crate::dao::storage::StorageError;
use error::CouchDaoError;

impl From<CouchDaoError> for StorageError {
    fn from(err: CouchDaoError) -> Self {
        match err {
            CouchDaoError::DocumentConflict { doc_id } => {
                StorageError::Conflict(format!("document `{doc_id}` already exists"))
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}

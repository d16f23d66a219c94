/// CouchDB backend over its HTTP API.
#[cfg(feature = "couch-store")]
pub mod couchdb;
/// Process-local backend, also used by the tests.
pub mod memory;
/// MongoDB backend.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{MatchEntity, UserEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for the live match and scorer accounts.
pub trait MatchStore: Send + Sync {
    /// Load the singleton match record, if any has been written.
    fn load_current_match(&self) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>>;
    /// Overwrite the singleton match record.
    fn save_current_match(&self, game: MatchEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up an account by its normalized username.
    fn find_user(&self, username: String) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    /// Create an account, failing with [`StorageError::Conflict`](crate::dao::storage::StorageError::Conflict)
    /// when the username is taken.
    fn insert_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap round trip proving the backend still answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

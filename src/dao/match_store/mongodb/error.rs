use mongodb::error::Error as MongoError;
use thiserror::Error;

pub type MongoResult<T> = Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("MongoDB URI `{uri}` is not valid")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB client options were rejected")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB did not answer {attempts} ping(s) at startup")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB stopped answering pings")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("could not create index `{index}` on `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("could not write match `{id}`")]
    SaveMatch {
        id: uuid::Uuid,
        #[source]
        source: MongoError,
    },
    #[error("could not read the current match")]
    LoadMatch {
        #[source]
        source: MongoError,
    },
    #[error("could not create user `{username}`")]
    SaveUser {
        username: String,
        #[source]
        source: MongoError,
    },
    #[error("could not look up user `{username}`")]
    LoadUser {
        username: String,
        #[source]
        source: MongoError,
    },
    /// Rejected by the unique username index.
    #[error("username `{username}` is taken")]
    DuplicateUsername { username: String },
}

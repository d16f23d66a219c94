use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

const DEFAULT_DB: &str = "cricket";
const DEFAULT_URI: &str = "mongodb://localhost:27017";

/// Parsed client options and the database holding the collections.
#[derive(Clone)]
pub struct MongoConfig {
    pub(crate) options: ClientOptions,
    pub(crate) database_name: String,
}

impl MongoConfig {
    /// Parse a connection string. The database defaults to `cricket`.
    pub async fn from_uri(uri: &str, db_name: Option<&str>) -> MongoResult<Self> {
        let database_name = db_name.unwrap_or(DEFAULT_DB).to_owned();
        let options =
            ClientOptions::parse(uri)
                .await
                .map_err(|source| MongoDaoError::InvalidUri {
                    uri: uri.to_owned(),
                    source,
                })?;

        Ok(Self {
            options,
            database_name,
        })
    }

    /// Read `MONGO_URI` (or `MONGODB_CONNECTION_STRING`) and the optional `MONGO_DB`.
    ///
    /// Falls back to a local server when no URI is set.
    pub async fn from_env() -> MongoResult<Self> {
        let uri = std::env::var("MONGO_URI")
            .or_else(|_| std::env::var("MONGODB_CONNECTION_STRING"))
            .unwrap_or_else(|_| DEFAULT_URI.to_owned());
        let db = std::env::var("MONGO_DB").ok();
        Self::from_uri(&uri, db.as_deref()).await
    }
}

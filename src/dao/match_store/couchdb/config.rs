use std::env;

use super::error::{CouchDaoError, CouchResult};

const DEFAULT_DB: &str = "cricket";

/// Basic-auth credentials for the CouchDB server.
#[derive(Debug, Clone)]
pub(crate) struct CouchCredentials {
    pub(crate) username: String,
    pub(crate) password: String,
}

/// Where the match and user documents live.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    pub(crate) base_url: String,
    pub(crate) database: String,
    pub(crate) credentials: Option<CouchCredentials>,
}

impl CouchConfig {
    /// Read `COUCH_BASE_URL`, `COUCH_DB` and the optional `COUCH_USERNAME`/`COUCH_PASSWORD` pair.
    pub fn from_env() -> CouchResult<Self> {
        let base_url = env::var("COUCH_BASE_URL").map_err(|_| CouchDaoError::MissingEnvVar {
            var: "COUCH_BASE_URL",
        })?;
        let database = env::var("COUCH_DB")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB.to_owned());
        let credentials = env::var("COUCH_USERNAME")
            .ok()
            .zip(env::var("COUCH_PASSWORD").ok())
            .map(|(username, password)| CouchCredentials { username, password });

        Ok(Self {
            base_url,
            database,
            credentials,
        })
    }
}

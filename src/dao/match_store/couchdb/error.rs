use reqwest::StatusCode;
use thiserror::Error;

pub type CouchResult<T> = Result<T, CouchDaoError>;

/// Failures of the CouchDB backend, keyed by the database or document they concern.
#[derive(Debug, Error)]
pub enum CouchDaoError {
    #[error("missing CouchDB environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    #[error("invalid CouchDB base URL `{url}`")]
    InvalidBaseUrl { url: String },
    #[error("failed to build CouchDB HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request never got an answer.
    #[error("CouchDB {action} `{target}` failed")]
    Transport {
        action: &'static str,
        target: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("CouchDB answered {status} to {action} `{target}`")]
    UnexpectedStatus {
        action: &'static str,
        target: String,
        status: StatusCode,
    },
    #[error("CouchDB document `{target}` could not be decoded")]
    Decode {
        target: String,
        #[source]
        source: reqwest::Error,
    },
    /// A create-only write hit an existing document.
    #[error("CouchDB document `{doc_id}` already exists")]
    DocumentConflict { doc_id: String },
}

use serde::{Deserialize, Serialize};

use crate::dao::models::{MatchEntity, UserEntity};

pub const CURRENT_MATCH_DOC_ID: &str = "match::current";
pub const USER_PREFIX: &str = "user::";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchMatchDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub game: MatchEntity,
}

impl CouchMatchDocument {
    pub fn from_entity(game: MatchEntity, rev: Option<String>) -> Self {
        Self {
            id: CURRENT_MATCH_DOC_ID.to_owned(),
            rev,
            game,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchUserDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub user: UserEntity,
}

impl CouchUserDocument {
    pub fn from_entity(user: UserEntity) -> Self {
        Self {
            id: user_doc_id(&user.username),
            rev: None,
            user,
        }
    }
}

/// Usernames are unique, so they key the user documents directly.
pub fn user_doc_id(username: &str) -> String {
    format!("{USER_PREFIX}{username}")
}

/// Minimal projection used to fetch the current revision of a document.
#[derive(Debug, Deserialize)]
pub struct RevisionOnly {
    #[serde(rename = "_rev")]
    pub rev: String,
}

use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{
    BattingSideEntity, CommentaryEntity, MatchEntity, MatchResultEntity, OverEntity, TeamEntity,
    UserEntity,
};

/// `_id` of the singleton match document.
pub const CURRENT_MATCH_ID: &str = "current";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMatchDocument {
    #[serde(rename = "_id")]
    key: String,
    match_id: Uuid,
    team_a: TeamEntity,
    team_b: TeamEntity,
    current_batting_team: BattingSideEntity,
    current_over: OverEntity,
    innings: u8,
    is_over: bool,
    #[serde(default)]
    commentary: Vec<CommentaryEntity>,
    #[serde(default)]
    result: Option<MatchResultEntity>,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<MatchEntity> for MongoMatchDocument {
    fn from(value: MatchEntity) -> Self {
        Self {
            key: CURRENT_MATCH_ID.to_owned(),
            match_id: value.id,
            team_a: value.team_a,
            team_b: value.team_b,
            current_batting_team: value.current_batting_team,
            current_over: value.current_over,
            innings: value.innings,
            is_over: value.is_over,
            commentary: value.commentary,
            result: value.result,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoMatchDocument> for MatchEntity {
    fn from(value: MongoMatchDocument) -> Self {
        Self {
            id: value.match_id,
            team_a: value.team_a,
            team_b: value.team_b,
            current_batting_team: value.current_batting_team,
            current_over: value.current_over,
            innings: value.innings,
            is_over: value.is_over,
            commentary: value.commentary,
            result: value.result,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUserDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    first_name: String,
    last_name: String,
    username: String,
    password_hash: String,
    created_at: DateTime,
}

impl From<UserEntity> for MongoUserDocument {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            username: value.username,
            password_hash: value.password_hash,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoUserDocument> for UserEntity {
    fn from(value: MongoUserDocument) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            username: value.username,
            password_hash: value.password_hash,
            created_at: value.created_at.to_system_time(),
        }
    }
}

pub fn current_match_filter() -> Document {
    doc! {"_id": CURRENT_MATCH_ID}
}

pub fn username_filter(username: &str) -> Document {
    doc! {"username": username}
}

use std::sync::Arc;

use futures::future::BoxFuture;
use mongodb::{
    Collection, Database, IndexModel,
    bson::doc,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::IndexOptions,
};
use tokio::sync::RwLock;
use tracing::info;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoMatchDocument, MongoUserDocument, current_match_filter, username_filter},
};
use crate::dao::{
    match_store::MatchStore,
    models::{MatchEntity, UserEntity},
    storage::StorageResult,
};

const MATCHES: &str = "matches";
const USERS: &str = "users";
const USERNAME_INDEX: &str = "user_username_idx";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Match and user documents in MongoDB.
///
/// The database handle is swapped on reconnect; clones share it.
#[derive(Clone)]
pub struct MongoMatchStore {
    database: Arc<RwLock<Database>>,
    config: Arc<MongoConfig>,
}

impl MongoMatchStore {
    /// Connect and make sure the unique username index exists.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let database = establish_connection(&config.options, &config.database_name).await?;
        ensure_username_index(&database).await?;

        Ok(Self {
            database: Arc::new(RwLock::new(database)),
            config: Arc::new(config),
        })
    }

    async fn matches(&self) -> Collection<MongoMatchDocument> {
        self.database.read().await.collection(MATCHES)
    }

    async fn users(&self) -> Collection<MongoUserDocument> {
        self.database.read().await.collection(USERS)
    }

    async fn load(&self) -> MongoResult<Option<MatchEntity>> {
        let document = self
            .matches()
            .await
            .find_one(current_match_filter())
            .await
            .map_err(|source| MongoDaoError::LoadMatch { source })?;
        Ok(document.map(MatchEntity::from))
    }

    async fn save(&self, game: MatchEntity) -> MongoResult<()> {
        let id = game.id;
        let document = MongoMatchDocument::from(game);
        self.matches()
            .await
            .replace_one(current_match_filter(), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveMatch { id, source })?;
        Ok(())
    }

    async fn user(&self, username: String) -> MongoResult<Option<UserEntity>> {
        let found = self.users().await.find_one(username_filter(&username)).await;
        match found {
            Ok(document) => Ok(document.map(UserEntity::from)),
            Err(source) => Err(MongoDaoError::LoadUser { username, source }),
        }
    }

    async fn add_user(&self, user: UserEntity) -> MongoResult<()> {
        let username = user.username.clone();
        let document = MongoUserDocument::from(user);
        match self.users().await.insert_one(&document).await {
            Ok(_) => Ok(()),
            Err(source) if is_duplicate_key(&source) => {
                Err(MongoDaoError::DuplicateUsername { username })
            }
            Err(source) => Err(MongoDaoError::SaveUser { username, source }),
        }
    }

    async fn ping(&self) -> MongoResult<()> {
        let database = self.database.read().await.clone();
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map(drop)
            .map_err(|source| MongoDaoError::HealthPing { source })
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let database =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        *self.database.write().await = database;
        info!(database = %self.config.database_name, "MongoDB handle replaced");
        Ok(())
    }
}

/// Usernames are unique; the index turns a second signup into a duplicate-key error.
async fn ensure_username_index(database: &Database) -> MongoResult<()> {
    let index = IndexModel::builder()
        .keys(doc! { "username": 1 })
        .options(
            IndexOptions::builder()
                .name(Some(USERNAME_INDEX.to_owned()))
                .unique(Some(true))
                .build(),
        )
        .build();

    database
        .collection::<MongoUserDocument>(USERS)
        .create_index(index)
        .await
        .map_err(|source| MongoDaoError::EnsureIndex {
            collection: USERS,
            index: USERNAME_INDEX,
            source,
        })?;
    Ok(())
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

impl MatchStore for MongoMatchStore {
    fn load_current_match(&self) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.load().await?) })
    }

    fn save_current_match(&self, game: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.save(game).await?) })
    }

    fn find_user(&self, username: String) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.user(username).await?) })
    }

    fn insert_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.add_user(user).await?) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.ping().await?) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.reconnect().await?) })
    }
}

use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::dao::{
    match_store::MatchStore,
    models::{MatchEntity, UserEntity},
    storage::StorageResult,
};

use super::{
    config::{CouchConfig, CouchCredentials},
    error::{CouchDaoError, CouchResult},
    models::{
        CURRENT_MATCH_DOC_ID, CouchMatchDocument, CouchUserDocument, RevisionOnly, user_doc_id,
    },
};

/// Match and user documents in one CouchDB database.
#[derive(Clone)]
pub struct CouchMatchStore {
    client: Client,
    database_url: Arc<Url>,
    credentials: Option<Arc<CouchCredentials>>,
}

impl CouchMatchStore {
    /// Connect to CouchDB, creating the database on first use.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let store = Self {
            client,
            database_url: Arc::new(database_url(&config.base_url, &config.database)?),
            credentials: config.credentials.map(Arc::new),
        };
        store.ensure_database().await?;
        Ok(store)
    }

    /// URL of a document of the database. Ids are percent-encoded as one path segment.
    fn document_url(&self, doc_id: &str) -> Url {
        let mut url = (*self.database_url).clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(doc_id);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.credentials.as_deref() {
            Some(credentials) => {
                builder.basic_auth(&credentials.username, Some(&credentials.password))
            }
            None => builder,
        }
    }

    async fn send(
        &self,
        action: &'static str,
        target: &str,
        builder: RequestBuilder,
    ) -> CouchResult<Response> {
        builder
            .send()
            .await
            .map_err(|source| CouchDaoError::Transport {
                action,
                target: target.to_owned(),
                source,
            })
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let target = self.database_url.as_str().to_owned();
        let probe = self
            .send(
                "probe database",
                &target,
                self.request(Method::GET, (*self.database_url).clone()),
            )
            .await?;

        let status = match probe.status() {
            StatusCode::OK => return Ok(()),
            StatusCode::NOT_FOUND => {
                self.send(
                    "create database",
                    &target,
                    self.request(Method::PUT, (*self.database_url).clone()),
                )
                .await?
                .status()
            }
            other => other,
        };

        // 412 means another instance created it in the meantime.
        if status.is_success() || status == StatusCode::PRECONDITION_FAILED {
            Ok(())
        } else {
            Err(CouchDaoError::UnexpectedStatus {
                action: "create database",
                target,
                status,
            })
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> CouchResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .send(
                "read document",
                doc_id,
                self.request(Method::GET, self.document_url(doc_id)),
            )
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                response
                    .json::<T>()
                    .await
                    .map(Some)
                    .map_err(|source| CouchDaoError::Decode {
                        target: doc_id.to_owned(),
                        source,
                    })
            }
            status => Err(CouchDaoError::UnexpectedStatus {
                action: "read document",
                target: doc_id.to_owned(),
                status,
            }),
        }
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> CouchResult<()>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .send(
                "write document",
                doc_id,
                self.request(Method::PUT, self.document_url(doc_id))
                    .json(document),
            )
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(CouchDaoError::DocumentConflict {
                doc_id: doc_id.to_owned(),
            }),
            status => Err(CouchDaoError::UnexpectedStatus {
                action: "write document",
                target: doc_id.to_owned(),
                status,
            }),
        }
    }
}

fn database_url(base_url: &str, database: &str) -> CouchResult<Url> {
    let invalid = || CouchDaoError::InvalidBaseUrl {
        url: base_url.to_owned(),
    };
    let mut url = Url::parse(base_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .push(database);
    Ok(url)
}

impl MatchStore for CouchMatchStore {
    fn load_current_match(&self) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let document = store
                .get_document::<CouchMatchDocument>(CURRENT_MATCH_DOC_ID)
                .await?;
            Ok(document.map(|doc| doc.game))
        })
    }

    fn save_current_match(&self, game: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let rev = store
                .get_document::<RevisionOnly>(CURRENT_MATCH_DOC_ID)
                .await?
                .map(|existing| existing.rev);
            let document = CouchMatchDocument::from_entity(game, rev);
            Ok(store.put_document(CURRENT_MATCH_DOC_ID, &document).await?)
        })
    }

    fn find_user(&self, username: String) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let document = store
                .get_document::<CouchUserDocument>(&user_doc_id(&username))
                .await?;
            Ok(document.map(|doc| doc.user))
        })
    }

    fn insert_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            // No revision: CouchDB answers 409 when the username document already exists.
            let document = CouchUserDocument::from_entity(user);
            Ok(store.put_document(&document.id, &document).await?)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let target = store.database_url.as_str().to_owned();
            let response = store
                .send(
                    "probe database",
                    &target,
                    store.request(Method::HEAD, (*store.database_url).clone()),
                )
                .await?;
            if response.status().is_success() {
                Ok(())
            } else {
                Err(CouchDaoError::UnexpectedStatus {
                    action: "probe database",
                    target,
                    status: response.status(),
                }
                .into())
            }
        })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.ensure_database().await?) })
    }
}

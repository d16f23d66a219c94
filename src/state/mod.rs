pub(crate) mod commentary;
pub(crate) mod cricket;
pub(crate) mod scoring;
mod viewers;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::{Mutex, RwLock};

use crate::{
    config::AppConfig, dao::match_store::MatchStore, error::ServiceError,
    services::auth::TokenKeys, state::scoring::MatchRules,
};

pub(crate) use self::viewers::ViewerHub;

/// Handle shared by every request, socket and background task.
pub type SharedState = Arc<AppState>;

/// Central application state storing viewer connections, configuration and the storage handle.
pub struct AppState {
    match_store: RwLock<Option<Arc<dyn MatchStore>>>,
    viewers: ViewerHub,
    degraded: AtomicBool,
    transition_gate: Mutex<()>,
    config: Arc<AppConfig>,
    tokens: TokenKeys,
}

impl AppState {
    /// Shared state with no store installed yet.
    ///
    /// Scoring stays in degraded mode until the supervisor installs a backend.
    pub fn new(config: AppConfig, tokens: TokenKeys) -> SharedState {
        Arc::new(Self {
            match_store: RwLock::new(None),
            viewers: ViewerHub::new(),
            degraded: AtomicBool::new(true),
            transition_gate: Mutex::new(()),
            config: Arc::new(config),
            tokens,
        })
    }

    /// Obtain a handle to the current match store, if one is installed.
    pub async fn match_store(&self) -> Option<Arc<dyn MatchStore>> {
        let guard = self.match_store.read().await;
        guard.as_ref().cloned()
    }

    /// Current store, or [`ServiceError::Degraded`] while running without storage.
    pub(crate) async fn require_match_store(&self) -> Result<Arc<dyn MatchStore>, ServiceError> {
        if self.is_degraded() {
            return Err(ServiceError::Degraded);
        }
        self.match_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new match store implementation and leave degraded mode.
    pub async fn set_match_store(&self, store: Arc<dyn MatchStore>) {
        {
            let mut guard = self.match_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current match store and enter degraded mode.
    pub async fn clear_match_store(&self) {
        {
            let mut guard = self.match_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    /// Set the degraded flag.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.store(value, Ordering::SeqCst);
    }

    /// Registry of active viewer sockets.
    pub(crate) fn viewers(&self) -> &ViewerHub {
        &self.viewers
    }

    pub(crate) fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    pub(crate) fn tokens(&self) -> &TokenKeys {
        &self.tokens
    }

    /// Rules every ball of the live match is scored with.
    pub(crate) fn match_rules(&self) -> MatchRules {
        self.config.match_rules()
    }

    /// Run `work` while holding the transition gate so updates of the live match are serialized.
    pub(crate) async fn run_transition<F, Fut, T>(&self, work: F) -> Result<T, ServiceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let _gate = self.transition_gate.lock().await;
        work().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::dao::match_store::memory::InMemoryStore;

    fn state() -> SharedState {
        AppState::new(
            AppConfig::default(),
            TokenKeys::from_secret(b"test", Duration::from_secs(60)),
        )
    }

    #[tokio::test]
    async fn starts_degraded_until_a_store_is_installed() {
        let state = state();
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_match_store().await,
            Err(ServiceError::Degraded)
        ));

        state.set_match_store(Arc::new(InMemoryStore::new())).await;
        assert!(!state.is_degraded());
        assert!(state.require_match_store().await.is_ok());

        state.clear_match_store().await;
        assert!(state.is_degraded());
    }

    #[tokio::test]
    async fn degraded_flag_blocks_an_installed_store() {
        let state = state();
        state.set_match_store(Arc::new(InMemoryStore::new())).await;

        state.update_degraded(true);
        assert!(state.match_store().await.is_some());
        assert!(matches!(
            state.require_match_store().await,
            Err(ServiceError::Degraded)
        ));

        state.update_degraded(false);
        assert!(state.require_match_store().await.is_ok());
    }
}

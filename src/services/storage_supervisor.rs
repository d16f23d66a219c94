use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{match_store::MatchStore, storage::StorageError},
    state::SharedState,
};

const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const RECONNECT_ATTEMPTS: u32 = 3;

/// Doubling delay between 1s and 10s.
struct Backoff {
    current: Duration,
}

impl Backoff {
    const FLOOR: Duration = Duration::from_secs(1);
    const CEILING: Duration = Duration::from_secs(10);

    fn new() -> Self {
        Self {
            current: Self::FLOOR,
        }
    }

    /// Delay to wait now; the following call returns twice as much.
    fn step(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(Self::CEILING);
        delay
    }
}

/// Keep a storage backend installed for as long as the process runs.
///
/// `connect` is retried with backoff until it yields a store. The store is
/// then polled; when it fails and cannot be revived in place it is uninstalled
/// and `connect` starts over. Degraded mode is on whenever no healthy store is
/// serving requests.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn MatchStore>, StorageError>> + Send,
{
    let mut backoff = Backoff::new();

    loop {
        let store = match connect().await {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "could not reach storage");
                sleep(backoff.step()).await;
                continue;
            }
        };

        state.set_match_store(store.clone()).await;
        info!("storage connected; match updates enabled");
        backoff = Backoff::new();

        supervise(&state, store.as_ref()).await;

        state.clear_match_store().await;
        sleep(backoff.step()).await;
    }
}

/// Returns once `store` has failed and every in-place reconnect was refused.
async fn supervise(state: &SharedState, store: &dyn MatchStore) {
    loop {
        match store.health_check().await {
            Ok(()) => {
                if state.is_degraded() {
                    info!("storage answered again; match updates enabled");
                    state.update_degraded(false);
                }
            }
            Err(err) => {
                warn!(error = %err, "storage health check failed; match updates suspended");
                state.update_degraded(true);
                if !revive(store).await {
                    warn!("storage did not come back; dropping the connection");
                    return;
                }
                state.update_degraded(false);
            }
        }
        sleep(HEALTH_POLL_INTERVAL).await;
    }
}

async fn revive(store: &dyn MatchStore) -> bool {
    let mut backoff = Backoff::new();
    for attempt in 1..=RECONNECT_ATTEMPTS {
        match store.try_reconnect().await {
            Ok(()) => {
                info!(attempt, "storage reconnected");
                return true;
            }
            Err(err) => {
                warn!(attempt, error = %err, "storage reconnect failed");
                sleep(backoff.step()).await;
            }
        }
    }
    false
}

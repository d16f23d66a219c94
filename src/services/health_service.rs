use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report degraded mode and the viewer count, pinging storage on the way.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_match_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
            }
        }
        Err(_) => warn!("storage unavailable (degraded mode)"),
    }

    HealthResponse::new(state.is_degraded(), state.viewers().len())
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        config::AppConfig, dao::match_store::memory::InMemoryStore, services::auth::TokenKeys,
        state::AppState,
    };

    #[tokio::test]
    async fn status_follows_the_degraded_flag() {
        let state = AppState::new(
            AppConfig::default(),
            TokenKeys::from_secret(b"test", Duration::from_secs(60)),
        );
        assert_eq!(health_status(&state).await.status, "degraded");

        state.set_match_store(Arc::new(InMemoryStore::new())).await;
        let health = health_status(&state).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.viewers, 0);
    }
}

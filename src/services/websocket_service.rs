use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::ServiceError,
    services::broadcast::send_score_update,
    state::{SharedState, cricket::Match},
};

/// Handle the full lifecycle of a viewer WebSocket connection.
///
/// Viewers only listen: inbound text frames are ignored, pings are answered.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let viewer_id = match attach_viewer(&state, outbound_tx.clone()).await {
        Ok(id) => id,
        Err(err) => {
            warn!(error = %err, "failed to attach viewer");
            let _ = outbound_tx.send(Message::Close(None));
            finalize(writer_task, outbound_tx).await;
            return;
        }
    };
    info!(viewer_id = %viewer_id, viewers = state.viewers().len(), "viewer connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                debug!(viewer_id = %viewer_id, payload = %text, "ignoring viewer message");
            }
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) | Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(viewer_id = %viewer_id, error = %err, "websocket error");
                break;
            }
        }
    }

    state.viewers().unregister(&viewer_id);
    info!(viewer_id = %viewer_id, "viewer disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Register a viewer and queue the stored match to it.
///
/// Runs under the transition gate so the snapshot cannot be overtaken by a concurrent
/// score update.
pub async fn attach_viewer(
    state: &SharedState,
    tx: mpsc::UnboundedSender<Message>,
) -> Result<Uuid, ServiceError> {
    state
        .run_transition(|| async move {
            let current = match state.match_store().await {
                Some(store) if !state.is_degraded() => match store.load_current_match().await {
                    Ok(current) => current,
                    Err(err) => {
                        warn!(error = %err, "could not load match for new viewer");
                        None
                    }
                },
                _ => None,
            };

            if let Some(entity) = current {
                match Match::try_from(entity) {
                    Ok(game) => {
                        if !send_score_update(&tx, &game) {
                            return Err(ServiceError::Internal(
                                "viewer closed before snapshot".into(),
                            ));
                        }
                    }
                    Err(err) => warn!(error = %err, "stored match cannot be shown to viewer"),
                }
            }

            Ok(state.viewers().register(tx))
        })
        .await
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        config::AppConfig,
        dao::match_store::memory::InMemoryStore,
        dto::ball::{BallRequest, ExtraInput},
        services::{auth::TokenKeys, score_service},
        state::AppState,
    };

    async fn setup() -> SharedState {
        let state = AppState::new(
            AppConfig::default(),
            TokenKeys::from_secret(b"test", Duration::from_secs(60)),
        );
        state.set_match_store(Arc::new(InMemoryStore::new())).await;
        state
    }

    #[tokio::test]
    async fn late_joiner_receives_the_current_match() {
        let state = setup().await;
        let ball = BallRequest {
            run: 4,
            extras: ExtraInput::None,
            is_wicket: false,
        };
        score_service::submit_ball(&state, &ball).await.unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        attach_viewer(&state, tx).await.unwrap();

        let Ok(Message::Text(text)) = rx.try_recv() else {
            panic!("late joiner did not get a snapshot");
        };
        let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
        assert_eq!(value["match"]["teamA"]["totalRuns"], 4);
        assert_eq!(state.viewers().len(), 1);
    }

    #[tokio::test]
    async fn viewer_attaches_without_snapshot_before_any_ball() {
        let state = setup().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        attach_viewer(&state, tx).await.unwrap();

        assert!(rx.try_recv().is_err());
        assert_eq!(state.viewers().len(), 1);
    }

    #[tokio::test]
    async fn viewer_attaches_in_degraded_mode() {
        let state = AppState::new(
            AppConfig::default(),
            TokenKeys::from_secret(b"test", Duration::from_secs(60)),
        );
        let (tx, _rx) = mpsc::unbounded_channel();

        assert!(attach_viewer(&state, tx).await.is_ok());
    }
}

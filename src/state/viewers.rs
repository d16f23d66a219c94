use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Clone)]
/// Handle used to push messages to a connected viewer.
pub struct ViewerConnection {
    pub id: Uuid,
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Registry of live viewer sockets.
#[derive(Default)]
pub struct ViewerHub {
    viewers: DashMap<Uuid, ViewerConnection>,
}

impl ViewerHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new viewer and return its identifier.
    pub fn register(&self, tx: mpsc::UnboundedSender<Message>) -> Uuid {
        let id = Uuid::new_v4();
        self.viewers.insert(id, ViewerConnection { id, tx });
        debug!(viewer_id = %id, "viewer registered");
        id
    }

    pub fn unregister(&self, id: &Uuid) {
        self.viewers.remove(id);
    }

    pub fn len(&self) -> usize {
        self.viewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }

    /// Queue `payload` to every viewer, dropping the ones whose writer is gone.
    ///
    /// Returns the number of viewers that accepted the message.
    pub fn broadcast(&self, payload: &str) -> usize {
        let mut delivered = 0;
        self.viewers.retain(|id, connection| {
            match connection.tx.send(Message::Text(payload.to_owned().into())) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    warn!(viewer_id = %id, "viewer channel closed; dropping viewer");
                    false
                }
            }
        });
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_reaches_every_open_viewer() {
        let hub = ViewerHub::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        hub.register(tx_a);
        hub.register(tx_b);

        assert_eq!(hub.broadcast("hello"), 2);
        for rx in [&mut rx_a, &mut rx_b] {
            match rx.try_recv() {
                Ok(Message::Text(text)) => assert_eq!(text.as_str(), "hello"),
                other => panic!("unexpected message: {other:?}"),
            }
        }
    }

    #[test]
    fn closed_viewers_are_pruned_without_failing_the_rest() {
        let hub = ViewerHub::new();
        let (tx_open, mut rx_open) = mpsc::unbounded_channel();
        let (tx_closed, rx_closed) = mpsc::unbounded_channel();
        hub.register(tx_open);
        hub.register(tx_closed);
        drop(rx_closed);

        assert_eq!(hub.broadcast("update"), 1);
        assert_eq!(hub.len(), 1);
        assert!(rx_open.try_recv().is_ok());
    }

    #[test]
    fn unregister_removes_the_viewer() {
        let hub = ViewerHub::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx);

        hub.unregister(&id);
        assert!(hub.is_empty());
        assert_eq!(hub.broadcast("ignored"), 0);
    }
}

use axum::extract::ws::Message;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    dto::{scoreboard::MatchSnapshot, ws::ViewerOutboundMessage},
    state::{SharedState, cricket::Match},
};

/// Serialized `scoreUpdate` message for `game`.
fn score_update_payload(game: &Match) -> Option<String> {
    let message = ViewerOutboundMessage::ScoreUpdate {
        game: Box::new(MatchSnapshot::from(game)),
    };
    match serde_json::to_string(&message) {
        Ok(payload) => Some(payload),
        Err(err) => {
            warn!(match_id = %game.id, error = %err, "failed to serialize score update");
            None
        }
    }
}

/// Push the committed match to every connected viewer.
pub fn broadcast_score_update(state: &SharedState, game: &Match) {
    let Some(payload) = score_update_payload(game) else {
        return;
    };
    let delivered = state.viewers().broadcast(&payload);
    debug!(match_id = %game.id, delivered, "score update broadcast");
}

/// Send the match to a single viewer, returning `false` when its writer is gone.
pub fn send_score_update(tx: &mpsc::UnboundedSender<Message>, game: &Match) -> bool {
    match score_update_payload(game) {
        Some(payload) => tx.send(Message::Text(payload.into())).is_ok(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{config::AppConfig, services::auth::TokenKeys, state::AppState};

    #[test]
    fn every_viewer_gets_the_same_score_update() {
        let state = AppState::new(
            AppConfig::default(),
            TokenKeys::from_secret(b"test", Duration::from_secs(60)),
        );
        let game = Match::bootstrap(AppConfig::default().rosters()).unwrap();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        state.viewers().register(tx_a);
        state.viewers().register(tx_b);

        broadcast_score_update(&state, &game);

        let mut payloads = Vec::new();
        for rx in [&mut rx_a, &mut rx_b] {
            match rx.try_recv() {
                Ok(Message::Text(text)) => payloads.push(text.as_str().to_owned()),
                other => panic!("unexpected message: {other:?}"),
            }
        }
        assert_eq!(payloads[0], payloads[1]);
        let value: serde_json::Value = serde_json::from_str(&payloads[0]).unwrap();
        assert_eq!(value["type"], "scoreUpdate");
        assert_eq!(value["match"]["id"], game.id.to_string());
    }

    #[test]
    fn sending_to_a_closed_viewer_reports_failure() {
        let game = Match::bootstrap(AppConfig::default().rosters()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        assert!(!send_score_update(&tx, &game));
    }
}

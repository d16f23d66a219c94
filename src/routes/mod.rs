use axum::Router;

use crate::state::SharedState;

pub(crate) mod auth;
pub(crate) mod docs;
mod extract;
pub(crate) mod health;
pub(crate) mod score;
pub(crate) mod user;
pub(crate) mod websocket;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(websocket::router())
        .merge(score::router(state.clone()))
        .merge(user::router(state.clone()))
        .merge(docs::router())
        .with_state(state)
}

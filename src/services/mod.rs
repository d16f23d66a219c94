/// Bearer token issuing and verification.
pub mod auth;
/// Fan-out of score updates to viewers.
pub(crate) mod broadcast;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub(crate) mod health_service;
/// Password hashing.
pub(crate) mod password;
/// Ball submission against the live match.
pub(crate) mod score_service;
/// Storage reconnection and degraded-mode supervisor.
pub mod storage_supervisor;
/// Scorer accounts.
pub(crate) mod user_service;
/// Viewer WebSocket lifecycle.
pub(crate) mod websocket_service;

use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" while storage is reachable, "degraded" otherwise.
    pub status: String,
    /// Number of viewers currently subscribed to score updates.
    pub viewers: usize,
}

impl HealthResponse {
    pub fn new(degraded: bool, viewers: usize) -> Self {
        let status = if degraded { "degraded" } else { "ok" };
        Self {
            status: status.to_owned(),
            viewers,
        }
    }
}

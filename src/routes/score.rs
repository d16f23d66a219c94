use axum::{
    Extension, Json, Router,
    extract::State,
    middleware,
    routing::{get, post},
};
use tracing::debug;

use crate::{
    dto::{
        ball::{BallRequest, BallResponse},
        scoreboard::MatchSnapshot,
    },
    error::AppError,
    routes::{auth::require_bearer_token, extract::ValidJson},
    services::{auth::AuthenticatedUser, score_service},
    state::SharedState,
};

/// Scoring endpoints. Submitting a ball needs a bearer token, reading the match does not.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/api/v1/score", post(submit_ball))
        .route_layer(middleware::from_fn_with_state(state, require_bearer_token))
        .route("/api/v1/match", get(current_match))
}

/// Record one ball against the live match.
#[utoipa::path(
    post,
    path = "/api/v1/score",
    tag = "score",
    request_body = BallRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Ball recorded, or the match was decided", body = BallResponse),
        (status = 400, description = "Invalid ball or malformed stored match"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 503, description = "Storage unavailable (degraded mode)")
    )
)]
pub async fn submit_ball(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidJson(payload): ValidJson<BallRequest>,
) -> Result<Json<BallResponse>, AppError> {
    debug!(username = %user.username, ball = ?payload, "score update received");
    Ok(Json(score_service::submit_ball(&state, &payload).await?))
}

/// Current state of the live (or last finished) match.
#[utoipa::path(
    get,
    path = "/api/v1/match",
    tag = "score",
    responses(
        (status = 200, description = "Match snapshot", body = MatchSnapshot),
        (status = 404, description = "No match has been started yet")
    )
)]
pub async fn current_match(
    State(state): State<SharedState>,
) -> Result<Json<MatchSnapshot>, AppError> {
    Ok(Json(score_service::current_match(&state).await?))
}

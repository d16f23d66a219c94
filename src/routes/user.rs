use axum::{
    Extension, Json, Router,
    extract::State,
    middleware,
    routing::{get, post},
};

use crate::{
    dto::user::{MeResponse, SigninRequest, SignupRequest, TokenResponse},
    error::AppError,
    routes::{auth::require_bearer_token, extract::ValidJson},
    services::{auth::AuthenticatedUser, user_service},
    state::SharedState,
};

/// Scorer account endpoints.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/api/v1/user/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, require_bearer_token))
        .route("/api/v1/user/signup", post(signup))
        .route("/api/v1/user/signin", post(signin))
}

/// Create a scorer account.
#[utoipa::path(
    post,
    path = "/api/v1/user/signup",
    tag = "user",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn signup(
    State(state): State<SharedState>,
    ValidJson(payload): ValidJson<SignupRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    Ok(Json(user_service::signup(&state, payload).await?))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/user/signin",
    tag = "user",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Unknown user or wrong password")
    )
)]
pub async fn signin(
    State(state): State<SharedState>,
    ValidJson(payload): ValidJson<SigninRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    Ok(Json(user_service::signin(&state, payload).await?))
}

/// Name of the authenticated scorer.
#[utoipa::path(
    get,
    path = "/api/v1/user/me",
    tag = "user",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated scorer", body = MeResponse),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn me(
    State(state): State<SharedState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<MeResponse>, AppError> {
    Ok(Json(user_service::me(&state, &user).await?))
}

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, services::auth::AUTH_FAILED, state::SharedState};

/// Reject requests without a valid `Authorization: Bearer` token.
///
/// The verified identity is stored as an [`AuthenticatedUser`](crate::services::auth::AuthenticatedUser)
/// request extension.
pub async fn require_bearer_token(
    State(state): State<SharedState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AppError::Unauthorized(AUTH_FAILED.into()))?;

    let user = state.tokens().verify(&token)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

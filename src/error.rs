use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use validator::ValidationErrors;

use crate::{dao::storage::StorageError, state::cricket::SetupError};

/// Failure of a service operation, independent of the transport.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage request failed")]
    Unavailable(#[source] StorageError),
    /// No healthy store is installed.
    #[error("scoring is suspended while storage is down")]
    Degraded,
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The stored match cannot be scored.
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error("already exists: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected failure: {0}")]
    Internal(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        if let StorageError::Conflict(message) = err {
            return ServiceError::Conflict(message);
        }
        ServiceError::Unavailable(err)
    }
}

/// HTTP-facing error; rendered as `{ "message": ... }` with the matching status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Passed through verbatim so clients see the exact rejection.
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Details stay in the logs.
    #[error("internal server error")]
    Internal,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(status = %rejection.status(), error = %rejection, "rejected request body");
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("invalid payload: {err}"))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => {
                error!(error = %source, detail = ?source, "storage request failed");
                AppError::Internal
            }
            ServiceError::Internal(message) => {
                error!(error = %message, "unexpected failure");
                AppError::Internal
            }
            ServiceError::Degraded => {
                AppError::ServiceUnavailable("storage is reconnecting".into())
            }
            ServiceError::Unauthorized(message) => AppError::Unauthorized(message),
            ServiceError::Setup(setup) => AppError::BadRequest(setup.to_string()),
            ServiceError::Conflict(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_conflicts_surface_as_conflicts() {
        let err: ServiceError = StorageError::Conflict("username taken".into()).into();
        assert!(matches!(
            AppError::from(err),
            AppError::Conflict(message) if message == "username taken"
        ));
    }

    #[test]
    fn storage_failures_hide_their_details() {
        let source = std::io::Error::other("socket reset");
        let err: ServiceError = StorageError::unavailable("save match".into(), source).into();
        let app = AppError::from(err);

        assert_eq!(app.to_string(), "internal server error");
        assert_eq!(
            app.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn degraded_mode_is_service_unavailable() {
        let app = AppError::from(ServiceError::Degraded);
        assert_eq!(app.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn setup_errors_are_bad_requests() {
        let app = AppError::from(ServiceError::from(SetupError::MissingBatters {
            team: "Lions".into(),
        }));
        assert_eq!(app.into_response().status(), StatusCode::BAD_REQUEST);
    }
}

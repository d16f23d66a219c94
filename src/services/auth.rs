//! Bearer token issuing and verification.

use std::{
    env,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::ServiceError;

const JWT_SECRET_ENV: &str = "JWT_SECRET";
/// Message returned for every rejected token, whatever the cause.
pub(crate) const AUTH_FAILED: &str = "Authentication failed";

/// Claims carried by issued tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    /// Account id.
    sub: String,
    username: String,
    iat: u64,
    exp: u64,
}

/// Identity attached to requests that passed the bearer-token check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
}

/// HS256 signing material and token lifetime.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    /// Keys derived from a shared secret.
    pub fn from_secret(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Read the secret from `JWT_SECRET`, generating a per-process one when it is unset.
    pub fn from_env(ttl: Duration) -> Self {
        match env::var(JWT_SECRET_ENV) {
            Ok(secret) if !secret.trim().is_empty() => Self::from_secret(secret.as_bytes(), ttl),
            _ => {
                warn!(
                    env = JWT_SECRET_ENV,
                    "no token secret configured; generating a random one (tokens will not survive restarts)"
                );
                let secret: [u8; 32] = rand::random();
                Self::from_secret(&secret, ttl)
            }
        }
    }

    /// Sign a token for the given account.
    pub(crate) fn issue(&self, user_id: Uuid, username: &str) -> Result<String, ServiceError> {
        let now = unix_now()?;
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_owned(),
            iat: now,
            exp: now + self.ttl.as_secs(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|err| {
            error!(error = %err, "failed to sign token");
            ServiceError::Internal("token signing failed".into())
        })
    }

    /// Check signature and expiry, returning the caller identity.
    pub(crate) fn verify(&self, token: &str) -> Result<AuthenticatedUser, ServiceError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|err| {
                warn!(error = %err, "rejected bearer token");
                ServiceError::Unauthorized(AUTH_FAILED.into())
            })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| ServiceError::Unauthorized(AUTH_FAILED.into()))?;

        Ok(AuthenticatedUser {
            user_id,
            username: data.claims.username,
        })
    }
}

fn unix_now() -> Result<u64, ServiceError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .map_err(|err| ServiceError::Internal(format!("system clock before epoch: {err}")))
}

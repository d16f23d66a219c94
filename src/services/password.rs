use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use tokio::task;
use tracing::error;

use crate::error::ServiceError;

/// Hash `password` on the blocking pool; Argon2id costs tens of milliseconds of CPU.
pub async fn hash_password(password: String) -> Result<String, ServiceError> {
    run_blocking(move || hash_blocking(&password)).await
}

/// Check `password` against a stored PHC string on the blocking pool.
pub async fn verify_password(password: String, stored_hash: String) -> Result<bool, ServiceError> {
    run_blocking(move || verify_blocking(&password, &stored_hash)).await
}

async fn run_blocking<T, F>(work: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(work).await.map_err(|err| {
        error!(error = %err, "password task did not complete");
        ServiceError::Internal("password hashing failed".into())
    })?
}

/// Argon2id with a fresh random salt, returning the PHC string.
fn hash_blocking(password: &str) -> Result<String, ServiceError> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|err| {
        error!(error = %err, "failed to encode password salt");
        ServiceError::Internal("password hashing failed".into())
    })?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            error!(error = %err, "failed to hash password");
            ServiceError::Internal("password hashing failed".into())
        })
}

fn verify_blocking(password: &str, stored_hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|err| {
        error!(error = %err, "stored password hash is malformed");
        ServiceError::Internal("stored password hash is malformed".into())
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashes_verify_only_the_original_password() {
        let hash = hash_password("secret1".into()).await.unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret1".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("secret2".into(), hash).await.unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_blocking("secret1").unwrap(), hash_blocking("secret1").unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_internal_error() {
        assert!(matches!(
            verify_password("secret1".into(), "plaintext".into()).await,
            Err(ServiceError::Internal(_))
        ));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn other_tasks_run_while_a_password_is_hashed() {
        let hashing = tokio::spawn(hash_password("secret1".into()));
        let other = tokio::spawn(async { 7 });

        assert_eq!(other.await.unwrap(), 7);
        assert!(!hashing.is_finished());
        assert!(hashing.await.unwrap().unwrap().starts_with("$argon2"));
    }
}

use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::UserEntity,
    dto::{
        user::{MeResponse, SigninRequest, SignupRequest, TokenResponse},
        validation::normalize_username,
    },
    error::ServiceError,
    services::{
        auth::AuthenticatedUser,
        password::{hash_password, verify_password},
    },
    state::SharedState,
};

const UNKNOWN_USER: &str = "User does not exist";

/// Create a scorer account and sign the caller in.
pub async fn signup(
    state: &SharedState,
    request: SignupRequest,
) -> Result<TokenResponse, ServiceError> {
    let store = state.require_match_store().await?;
    let username = normalize_username(&request.username);

    let user = UserEntity {
        id: Uuid::new_v4(),
        first_name: request.first_name.trim().to_owned(),
        last_name: request.last_name.trim().to_owned(),
        username: username.clone(),
        password_hash: hash_password(request.password).await?,
        created_at: SystemTime::now(),
    };
    let user_id = user.id;

    store.insert_user(user).await.map_err(|err| match ServiceError::from(err) {
        ServiceError::Conflict(_) => ServiceError::Conflict("username already exists".into()),
        other => other,
    })?;
    info!(username = %username, user_id = %user_id, "scorer account created");

    Ok(TokenResponse {
        message: "User signed up successfully!".into(),
        token: state.tokens().issue(user_id, &username)?,
    })
}

/// Exchange credentials for a token.
///
/// Unknown usernames and wrong passwords are reported identically.
pub async fn signin(
    state: &SharedState,
    request: SigninRequest,
) -> Result<TokenResponse, ServiceError> {
    let store = state.require_match_store().await?;
    let username = normalize_username(&request.username);

    let user = store
        .find_user(username.clone())
        .await?
        .ok_or_else(|| ServiceError::NotFound(UNKNOWN_USER.into()))?;

    if !verify_password(request.password, user.password_hash.clone()).await? {
        info!(username = %username, "signin rejected: wrong password");
        return Err(ServiceError::NotFound(UNKNOWN_USER.into()));
    }

    Ok(TokenResponse {
        message: "User signed in successfully!".into(),
        token: state.tokens().issue(user.id, &user.username)?,
    })
}

/// Profile of the authenticated caller.
pub async fn me(state: &SharedState, user: &AuthenticatedUser) -> Result<MeResponse, ServiceError> {
    let store = state.require_match_store().await?;
    let account = store
        .find_user(user.username.clone())
        .await?
        .filter(|account| account.id == user.user_id)
        .ok_or_else(|| ServiceError::NotFound("User not found".into()))?;

    Ok(MeResponse {
        name: account.first_name,
    })
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        config::AppConfig,
        dao::match_store::{MatchStore, memory::InMemoryStore},
        services::auth::TokenKeys,
        state::AppState,
    };

    async fn state_with_store() -> (SharedState, InMemoryStore) {
        let state = AppState::new(
            AppConfig::default(),
            TokenKeys::from_secret(b"test", Duration::from_secs(3600)),
        );
        let store = InMemoryStore::new();
        state.set_match_store(Arc::new(store.clone())).await;
        (state, store)
    }

    fn signup_request(username: &str) -> SignupRequest {
        SignupRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: username.into(),
            password: "secret1".into(),
        }
    }

    fn signin_request(username: &str, password: &str) -> SigninRequest {
        SigninRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn signup_stores_a_hashed_password_and_returns_a_valid_token() {
        let (state, store) = state_with_store().await;
        let response = signup(&state, signup_request(" Ada@Example.com ")).await.unwrap();

        let user = store
            .find_user("ada@example.com".into())
            .await
            .unwrap()
            .unwrap();
        assert_ne!(user.password_hash, "secret1");

        let identity = state.tokens().verify(&response.token).unwrap();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.username, "ada@example.com");
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let (state, _store) = state_with_store().await;
        signup(&state, signup_request("ada@example.com")).await.unwrap();

        let err = signup(&state, signup_request("ADA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn signin_checks_the_password() {
        let (state, _store) = state_with_store().await;
        signup(&state, signup_request("ada@example.com")).await.unwrap();

        assert!(
            signin(&state, signin_request("ada@example.com", "secret1"))
                .await
                .is_ok()
        );
        let wrong = signin(&state, signin_request("ada@example.com", "secret9"))
            .await
            .unwrap_err();
        let unknown = signin(&state, signin_request("bob@example.com", "secret1"))
            .await
            .unwrap_err();

        for err in [wrong, unknown] {
            assert!(matches!(err, ServiceError::NotFound(message) if message == UNKNOWN_USER));
        }
    }

    #[tokio::test]
    async fn me_returns_the_first_name() {
        let (state, _store) = state_with_store().await;
        let response = signup(&state, signup_request("ada@example.com")).await.unwrap();
        let identity = state.tokens().verify(&response.token).unwrap();

        assert_eq!(me(&state, &identity).await.unwrap().name, "Ada");
    }

    #[tokio::test]
    async fn identity_services_fail_while_degraded() {
        let state = AppState::new(
            AppConfig::default(),
            TokenKeys::from_secret(b"test", Duration::from_secs(3600)),
        );
        assert!(matches!(
            signup(&state, signup_request("ada@example.com")).await,
            Err(ServiceError::Degraded)
        ));
    }
}

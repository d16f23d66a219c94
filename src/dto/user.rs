use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::validation::validate_not_blank;

/// Account creation payload.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(max = 30), custom(function = "validate_not_blank"))]
    pub first_name: String,
    #[validate(length(max = 30), custom(function = "validate_not_blank"))]
    pub last_name: String,
    /// E-mail address used as the login.
    #[validate(email, length(min = 5, max = 50))]
    pub username: String,
    #[validate(length(min = 6, max = 20))]
    pub password: String,
}

/// Login payload.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SigninRequest {
    #[validate(email, length(min = 5, max = 50))]
    pub username: String,
    #[validate(length(min = 6, max = 20))]
    pub password: String,
}

/// Bearer token issued after signup or signin.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub message: String,
    pub token: String,
}

/// Identity of the authenticated scorer.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    /// First name of the account owner.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(first_name: &str, username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            first_name: first_name.into(),
            last_name: "Lovelace".into(),
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn accepts_well_formed_signup() {
        assert!(signup("Ada", "ada@example.com", "secret1").validate().is_ok());
    }

    #[test]
    fn rejects_invalid_signup_fields() {
        assert!(signup("Ada", "not-an-email", "secret1").validate().is_err());
        assert!(signup("Ada", "ada@example.com", "short").validate().is_err());
        assert!(
            signup("Ada", "ada@example.com", "a-very-long-password-indeed")
                .validate()
                .is_err()
        );
        assert!(signup("   ", "ada@example.com", "secret1").validate().is_err());
        assert!(
            signup(&"x".repeat(31), "ada@example.com", "secret1")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn signup_reads_camel_case_names() {
        let request: SignupRequest = serde_json::from_str(
            r#"{"firstName":"Ada","lastName":"Lovelace","username":"ada@example.com","password":"secret1"}"#,
        )
        .unwrap();
        assert_eq!(request.first_name, "Ada");
        assert_eq!(request.last_name, "Lovelace");
    }
}

//! Validation helpers for DTOs.

use validator::ValidationError;

/// Rejects values made only of whitespace.
///
/// ```ignore
/// validate_not_blank("Ada")  // Ok
/// validate_not_blank("   ")  // Err
/// ```
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Trimmed, lowercased form under which usernames are stored and looked up.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted room or player name, in characters.
pub const MAX_NAME_LENGTH: u64 = 32;
/// Longest accepted room password, in characters.
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Validates that a room or player name is not blank and carries no control characters.
///
/// # Examples
///
/// ```ignore
/// validate_name("lobby 1")   // Ok
/// validate_name("   ")       // Err - blank
/// validate_name("a\nb")      // Err - control character
/// ```
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("Name must contain at least one visible character".into());
        return Err(err);
    }

    if name.chars().any(char::is_control) {
        let mut err = ValidationError::new("name_format");
        err.message = Some("Name must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_valid() {
        assert!(validate_name("lobby").is_ok());
        assert!(validate_name("Sala do João").is_ok());
        assert!(validate_name(" padded ").is_ok());
    }

    #[test]
    fn test_validate_name_blank() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("\t").is_err());
    }

    #[test]
    fn test_validate_name_control_characters() {
        assert!(validate_name("a\nb").is_err());
        assert!(validate_name("bell\u{7}").is_err());
    }
}

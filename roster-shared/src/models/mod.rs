/// Entity schema for Roster
///
/// # Models
///
/// - `user`: User records with role, salary and department for analytics
/// - `task`: Task manager records stamped by background side-effects
///
/// Each model carries its input payloads with `validator` rules and the
/// PostgreSQL operations used by [`crate::store::PgStore`].

pub mod task;
pub mod user;

use validator::ValidationError;

/// Rejects text containing NUL characters
///
/// PostgreSQL `TEXT` cannot store `\0`, so both backends refuse it up front.
pub fn reject_nul_chars(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        let mut error = ValidationError::new("nul_character");
        error.message = Some("Text must not contain NUL characters".into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_nul_chars() {
        assert!(reject_nul_chars("plain text").is_ok());
        assert!(reject_nul_chars("").is_ok());

        let error = reject_nul_chars("bad\u{0}name").unwrap_err();
        assert_eq!(error.code, "nul_character");
    }
}

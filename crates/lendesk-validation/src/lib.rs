//! Lendesk Validation Core
//!
//! Pure validation functions shared by every lendesk form. A validator takes the
//! raw string typed into a field and returns `Ok(())` when the value is acceptable
//! or `Err(message)` with a user-facing (Spanish) message.
//!
//! Validators are pure: the same input always yields the same result, and they
//! never panic on user input. Compose them with `and_then`, the first error wins:
//!
//! ```
//! use lendesk_validation::{validate_letters, validate_min_length};
//!
//! let check = |v: &str| validate_min_length(v, 3).and_then(|_| validate_letters(v));
//! assert!(check("Ana").is_ok());
//! assert!(check("Al").is_err());
//! assert!(check("Ana2").is_err());
//! ```

pub mod carnet;
pub mod email;
pub mod filter;
pub mod numeric;
pub mod password;
pub mod phone;
pub mod text;

// Re-export all validators
pub use carnet::*;
pub use email::*;
pub use numeric::*;
pub use password::*;
pub use phone::*;
pub use text::*;

/// Result type returned by every validator
pub type ValidationResult = Result<(), String>;

/// Skips `validator` when the field was left blank
///
/// Optional fields are only checked once the user types something.
pub fn optional<F>(value: &str, validator: F) -> ValidationResult
where
    F: FnOnce(&str) -> ValidationResult,
{
    if value.is_empty() {
        Ok(())
    } else {
        validator(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_skips_blank() {
        assert!(optional("", validate_required).is_ok());
        assert!(optional("  ", validate_required).is_err());
        assert!(optional("x", validate_required).is_ok());
    }

    #[test]
    fn test_composition_short_circuits() {
        let check = |v: &str| validate_min_length(v, 3).and_then(|_| validate_letters(v));
        assert_eq!(
            check("a1"),
            Err("El campo debe tener al menos 3 caracteres".to_string())
        );
        assert_eq!(
            check("a12"),
            Err("El campo debe contener solo letras y espacios".to_string())
        );
    }
}

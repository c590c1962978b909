//! Password validation functions

use crate::ValidationResult;

/// Symbols that satisfy the special-character requirement
pub const SPECIAL_CHARS: &str = "@$!%*?&#-_+=.,";

/// Strong password: `min` characters with uppercase, lowercase, digit and a
/// symbol from [`SPECIAL_CHARS`]
pub fn validate_password(password: &str, min: usize) -> ValidationResult {
    if password.is_empty() {
        return Err("La contraseña es obligatoria".to_string());
    }

    if password.chars().count() < min {
        return Err(format!(
            "La contraseña debe tener al menos {} caracteres",
            min
        ));
    }

    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| SPECIAL_CHARS.contains(c));

    if !has_uppercase {
        return Err("La contraseña debe contener al menos una letra mayúscula".to_string());
    }
    if !has_lowercase {
        return Err("La contraseña debe contener al menos una letra minúscula".to_string());
    }
    if !has_digit {
        return Err("La contraseña debe contener al menos un número".to_string());
    }
    if !has_special {
        return Err(format!(
            "La contraseña debe contener al menos un carácter especial ({})",
            SPECIAL_CHARS
        ));
    }

    Ok(())
}

//! Mobile phone validation

use crate::ValidationResult;

/// Lowest accepted national mobile number
pub const PHONE_MIN: u32 = 60_000_000;
/// Highest accepted national mobile number
pub const PHONE_MAX: u32 = 79_999_999;
/// Every mobile number has exactly this many digits
pub const PHONE_DIGITS: usize = 8;

/// Exactly 8 digits inside the national mobile prefix range
pub fn validate_phone(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err("El teléfono es obligatorio".to_string());
    }

    if value.len() != PHONE_DIGITS || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err("El teléfono debe tener 8 dígitos y solo números".to_string());
    }

    match value.parse::<u32>() {
        Ok(number) if (PHONE_MIN..=PHONE_MAX).contains(&number) => Ok(()),
        _ => Err("El teléfono debe ser válido".to_string()),
    }
}

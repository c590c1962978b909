//! National ID ("carnet") and ID suffix ("complemento") validation
//!
//! A carnet is a run of digits optionally followed by a single letter. When the
//! holder also has a complemento, the numeric part is one digit shorter.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ValidationResult;

/// Digits allowed in a carnet without complemento
pub const CARNET_MAX_DIGITS: usize = 8;
/// Digits allowed in a carnet that carries a complemento
pub const CARNET_MAX_DIGITS_WITH_COMPLEMENTO: usize = 7;
/// Maximum characters in a complemento
pub const COMPLEMENTO_MAX_LENGTH: usize = 2;

static CARNET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+[A-Za-z]?$").expect("carnet pattern is valid"));

/// Required, at least `min` characters, digits with at most one trailing letter
pub fn validate_carnet(value: &str, min: usize) -> ValidationResult {
    if value.trim().is_empty() {
        return Err("El carnet es obligatorio".to_string());
    }

    if value.chars().count() < min {
        return Err(format!("El carnet debe tener al menos {} caracteres", min));
    }

    if !CARNET_REGEX.is_match(value) {
        return Err(
            "El carnet debe contener solo números y como máximo una letra al final".to_string(),
        );
    }

    Ok(())
}

/// Digit budget of the carnet given the current complemento
pub fn carnet_max_digits(complemento: &str) -> usize {
    if complemento.trim().is_empty() {
        CARNET_MAX_DIGITS
    } else {
        CARNET_MAX_DIGITS_WITH_COMPLEMENTO
    }
}

/// Maximum characters the carnet input accepts: the digit budget plus the optional letter
pub fn carnet_max_length(complemento: &str) -> usize {
    carnet_max_digits(complemento) + 1
}

/// Enforces 8 digits without complemento and 7 with one
pub fn validate_carnet_digits(value: &str, complemento: &str) -> ValidationResult {
    let max = carnet_max_digits(complemento);
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();

    if digits <= max {
        Ok(())
    } else if max == CARNET_MAX_DIGITS_WITH_COMPLEMENTO {
        Err(format!(
            "Con complemento el carnet debe tener como máximo {} dígitos",
            max
        ))
    } else {
        Err(format!("El carnet debe tener como máximo {} dígitos", max))
    }
}

/// Optional suffix: up to two characters, at most one digit and one letter
pub fn validate_complemento(value: &str) -> ValidationResult {
    if value.is_empty() {
        return Ok(());
    }

    if value.chars().count() > COMPLEMENTO_MAX_LENGTH {
        return Err(format!(
            "El complemento debe tener como máximo {} caracteres",
            COMPLEMENTO_MAX_LENGTH
        ));
    }

    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("El complemento debe contener solo letras y números".to_string());
    }

    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    let letters = value.chars().filter(|c| c.is_ascii_alphabetic()).count();
    if digits > 1 || letters > 1 {
        return Err("El complemento admite como máximo un número y una letra".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("123456")]
    #[case("12345678")]
    #[case("1234567L")]
    fn accepts_well_formed_carnet(#[case] carnet: &str) {
        assert!(validate_carnet(carnet, 6).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("12345")]
    #[case("12A456")]
    #[case("123456LP")]
    #[case("123-456")]
    fn rejects_malformed_carnet(#[case] carnet: &str) {
        assert!(validate_carnet(carnet, 6).is_err());
    }

    #[test]
    fn digit_budget_depends_on_complemento() {
        assert!(validate_carnet_digits("1234567", "5A").is_ok());
        assert!(validate_carnet_digits("12345678", "5A").is_err());

        assert!(validate_carnet_digits("12345678", "").is_ok());
        assert!(validate_carnet_digits("123456789", "").is_err());

        // the trailing letter does not count against the budget
        assert!(validate_carnet_digits("1234567K", "1B").is_ok());
    }

    #[test]
    fn max_length_follows_complemento() {
        assert_eq!(carnet_max_length(""), 9);
        assert_eq!(carnet_max_length("5A"), 8);
    }

    #[rstest]
    #[case("")]
    #[case("5")]
    #[case("A")]
    #[case("5A")]
    #[case("A5")]
    fn accepts_complemento(#[case] value: &str) {
        assert!(validate_complemento(value).is_ok());
    }

    #[rstest]
    #[case("55")]
    #[case("AB")]
    #[case("5A1")]
    #[case("5-")]
    fn rejects_complemento(#[case] value: &str) {
        assert!(validate_complemento(value).is_err());
    }
}

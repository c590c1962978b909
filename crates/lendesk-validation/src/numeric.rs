//! Numeric validation functions
//!
//! Form values are strings; these helpers parse them before checking bounds.

use crate::ValidationResult;

/// A requested loan must be strictly above this amount
pub const MIN_LOAN_AMOUNT: f64 = 99.0;
/// Longest accepted loan term
pub const MAX_TERM_MONTHS: u32 = 99;

/// Parses a finite decimal number, ignoring surrounding whitespace
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Monthly income must be a positive number
pub fn validate_income(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err("El ingreso mensual es obligatorio".to_string());
    }

    match parse_number(value) {
        Some(n) if n > 0.0 => Ok(()),
        _ => Err("El ingreso mensual debe ser mayor que 0".to_string()),
    }
}

/// Requested amount must be numeric and above [`MIN_LOAN_AMOUNT`]
pub fn validate_loan_amount(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err("El monto es obligatorio".to_string());
    }

    match parse_number(value) {
        Some(n) if n > MIN_LOAN_AMOUNT => Ok(()),
        Some(_) => Err(format!(
            "El monto debe ser mayor a {}",
            MIN_LOAN_AMOUNT as u32
        )),
        None => Err("El monto debe ser un número válido".to_string()),
    }
}

/// Term in whole months, 1 to [`MAX_TERM_MONTHS`]
pub fn validate_term_months(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err("El plazo es obligatorio".to_string());
    }

    let months = match parse_number(value) {
        Some(n) if n.fract() == 0.0 => n,
        _ => return Err("El plazo debe ser un número entero de meses".to_string()),
    };

    if months <= 0.0 {
        Err("El plazo debe ser mayor que 0".to_string())
    } else if months > f64::from(MAX_TERM_MONTHS) {
        Err(format!(
            "El plazo no puede exceder {} meses",
            MAX_TERM_MONTHS
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[rstest]
    #[case("100", true)]
    #[case("99.01", true)]
    #[case("99", false)]
    #[case("0", false)]
    #[case("abc", false)]
    #[case("", false)]
    fn loan_amount(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(validate_loan_amount(value).is_ok(), ok);
    }

    #[rstest]
    #[case("1", true)]
    #[case("12", true)]
    #[case("99", true)]
    #[case("0", false)]
    #[case("-3", false)]
    #[case("100", false)]
    #[case("6.5", false)]
    #[case("doce", false)]
    fn term_months(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(validate_term_months(value).is_ok(), ok);
    }

    #[test]
    fn test_income() {
        assert!(validate_income("3500.50").is_ok());
        assert!(validate_income("0").is_err());
        assert!(validate_income("-10").is_err());
        assert!(validate_income("mil").is_err());
        assert_eq!(
            validate_income(""),
            Err("El ingreso mensual es obligatorio".to_string())
        );
    }
}

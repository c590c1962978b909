//! Keystroke and paste filters
//!
//! Filters run before a value reaches a validator: they drop characters a field
//! can never hold and enforce the field's maximum length, so pasted text is
//! sanitised the same way as typed text.

use crate::text::is_letter_or_space;

/// Truncates to `max` characters
pub fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Keeps ASCII digits only
pub fn digits_only(value: &str, max: usize) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).take(max).collect()
}

/// Keeps letters (any script) and spaces only
pub fn letters_only(value: &str, max: usize) -> String {
    value.chars().filter(|&c| is_letter_or_space(c)).take(max).collect()
}

/// Shapes input as `\d{0,max_int}(\.\d{0,max_dec})?`
///
/// Everything but digits and the first dot is dropped; the integer and
/// fractional parts are then cut to their budgets.
pub fn decimal(value: &str, max_int: usize, max_dec: usize) -> String {
    let kept: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match kept.split_once('.') {
        Some((int_part, rest)) => {
            let int_part = truncate(int_part, max_int);
            let frac: String = rest
                .chars()
                .filter(|c| c.is_ascii_digit())
                .take(max_dec)
                .collect();
            if max_dec == 0 {
                int_part
            } else {
                format!("{}.{}", int_part, frac)
            }
        }
        None => truncate(&kept, max_int),
    }
}

/// Uppercases, drops anything that is not alphanumeric, keeps two characters
pub fn complemento(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .take(crate::carnet::COMPLEMENTO_MAX_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate_respects_chars() {
        assert_eq!(truncate("ñandú", 3), "ñan");
        assert_eq!(truncate("ab", 5), "ab");
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("7a1-2 3", 8), "7123");
        assert_eq!(digits_only("7123456789", 8), "71234567");
    }

    #[test]
    fn test_letters_only() {
        assert_eq!(letters_only("José 2 Peña!", 30), "José  Peña");
        assert_eq!(letters_only("abcdef", 3), "abc");
    }

    #[test]
    fn test_decimal() {
        assert_eq!(decimal("1234567.891", 6, 2), "123456.89");
        assert_eq!(decimal("12.3.4", 6, 2), "12.34");
        assert_eq!(decimal("Bs 3500", 6, 2), "3500");
        assert_eq!(decimal("12.", 6, 2), "12.");
        assert_eq!(decimal("12.5", 6, 0), "12");
    }

    #[test]
    fn test_complemento() {
        assert_eq!(complemento("1a"), "1A");
        assert_eq!(complemento("-1 b-"), "1B");
        assert_eq!(complemento("1ab"), "1A");
    }
}

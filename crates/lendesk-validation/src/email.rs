//! Email validation functions

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ValidationResult;

/// Top-level extensions accepted for client emails
pub const ALLOWED_EXTENSIONS: &[&str] = &["com", "net", "org", "edu", "gob", "bo", "es", "info"];

/// Providers accepted for employee emails
pub const ALLOWED_PROVIDERS: &[&str] = &[
    "gmail.com",
    "hotmail.com",
    "outlook.com",
    "yahoo.com",
    "icloud.com",
];

// local@domain.tld with no whitespace and a single '@'
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Basic `local@domain.tld` shape
pub fn validate_email(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err("El correo es obligatorio".to_string());
    }

    if EMAIL_REGEX.is_match(value) {
        Ok(())
    } else {
        Err("El correo no es válido".to_string())
    }
}

/// Restricts the top-level extension to [`ALLOWED_EXTENSIONS`]
pub fn validate_email_extension(value: &str) -> ValidationResult {
    let extension = extract_domain(value)
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_lowercase();

    if ALLOWED_EXTENSIONS.iter().any(|&e| e == extension) {
        Ok(())
    } else {
        Err(format!(
            "La extensión del correo debe ser una de: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ))
    }
}

/// Restricts the whole domain to [`ALLOWED_PROVIDERS`]
pub fn validate_email_provider(value: &str) -> ValidationResult {
    let domain = extract_domain(value).to_lowercase();

    if ALLOWED_PROVIDERS.iter().any(|&p| p == domain) {
        Ok(())
    } else {
        Err(format!(
            "Solo se permiten correos de: {}",
            ALLOWED_PROVIDERS.join(", ")
        ))
    }
}

/// Returns the domain portion of an email address (everything after @).
/// If the email is malformed, returns an empty string.
fn extract_domain(email: &str) -> &str {
    email.split('@').nth(1).unwrap_or("")
}

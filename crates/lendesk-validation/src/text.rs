//! Text validation functions

use crate::ValidationResult;

const REQUIRED: &str = "El campo es obligatorio";

/// Fails when the trimmed value is empty
pub fn validate_required(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        Err(REQUIRED.to_string())
    } else {
        Ok(())
    }
}

/// Letters (any script, accents included) and spaces only
pub fn validate_letters(value: &str) -> ValidationResult {
    validate_required(value)?;

    if value.chars().all(is_letter_or_space) {
        Ok(())
    } else {
        Err("El campo debe contener solo letras y espacios".to_string())
    }
}

/// Validates minimum length, counted in characters
pub fn validate_min_length(value: &str, min: usize) -> ValidationResult {
    validate_required(value)?;

    if value.chars().count() >= min {
        Ok(())
    } else {
        Err(format!("El campo debe tener al menos {} caracteres", min))
    }
}

/// Validates maximum length, counted in characters. Empty values pass.
pub fn validate_max_length(value: &str, max: usize) -> ValidationResult {
    if value.chars().count() <= max {
        Ok(())
    } else {
        Err(format!("El campo no puede exceder {} caracteres", max))
    }
}

pub fn validate_length(value: &str, min: usize, max: usize) -> ValidationResult {
    validate_required(value)?;

    let len = value.chars().count();
    if len >= min && len <= max {
        Ok(())
    } else {
        Err(format!("El campo debe tener entre {} y {} caracteres", min, max))
    }
}

/// Rejects values made only of whitespace. Empty values pass.
pub fn validate_not_blank(value: &str) -> ValidationResult {
    if !value.is_empty() && value.trim().is_empty() {
        Err("No se permiten solo espacios en blanco".to_string())
    } else {
        Ok(())
    }
}

/// Enum/value restriction
pub fn validate_one_of(value: &str, allowed: &[&str]) -> ValidationResult {
    validate_required(value)?;

    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!("El valor debe ser uno de: {}", allowed.join(", ")))
    }
}

pub(crate) fn is_letter_or_space(c: char) -> bool {
    c.is_alphabetic() || c == ' '
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert!(validate_required("hola").is_ok());
        assert!(validate_required("").is_err());
        assert!(validate_required("   ").is_err());
    }

    #[test]
    fn test_letters_accept_accents() {
        assert!(validate_letters("José Peña").is_ok());
        assert!(validate_letters("Müller").is_ok());
        assert!(validate_letters("Juan3").is_err());
        assert!(validate_letters("Juan-Pablo").is_err());
    }

    #[test]
    fn test_length_validators() {
        assert!(validate_min_length("hola", 3).is_ok());
        assert!(validate_min_length("ho", 3).is_err());

        assert!(validate_max_length("", 5).is_ok());
        assert!(validate_max_length("cinco", 5).is_ok());
        assert!(validate_max_length("seisss", 5).is_err());

        assert!(validate_length("hola", 1, 10).is_ok());
        assert!(validate_length("", 1, 10).is_err());
        assert!(validate_length("demasiado largo", 1, 10).is_err());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // "ñññ" is 6 bytes but 3 characters
        assert!(validate_length("ñññ", 1, 3).is_ok());
        assert!(validate_max_length("ñññ", 3).is_ok());
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("").is_ok());
        assert!(validate_not_blank("nota").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_one_of() {
        let roles = &["Administrador", "Asesor"];
        assert!(validate_one_of("Asesor", roles).is_ok());
        assert!(validate_one_of("Gerente", roles).is_err());
        assert!(validate_one_of("", roles).is_err());
    }
}

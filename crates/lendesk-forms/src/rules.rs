//! Cross-field rules
//!
//! A few fields change how their siblings are validated. Rules are attached to a
//! [`FormSchema`](crate::schema::FormSchema); the form state revalidates every
//! field a rule links whenever one of them changes.

use lendesk_validation::{carnet_max_length, validate_carnet_digits, ValidationResult};

use crate::schema::FormValues;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossFieldRule {
    /// The ID digit budget and input length shrink while the suffix is filled
    IdSuffix {
        id: &'static str,
        suffix: &'static str,
    },
    /// At least one of the listed fields must be filled
    AtLeastOne {
        fields: &'static [&'static str],
        message: &'static str,
    },
}

impl CrossFieldRule {
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            CrossFieldRule::IdSuffix { id, suffix } => vec![*id, *suffix],
            CrossFieldRule::AtLeastOne { fields, .. } => fields.to_vec(),
        }
    }

    pub fn involves(&self, key: &str) -> bool {
        self.fields().contains(&key)
    }

    /// Extra per-field check layered on top of the field's own validator
    pub fn check_field(&self, key: &str, values: &FormValues) -> ValidationResult {
        match self {
            CrossFieldRule::IdSuffix { id, suffix } if *id == key => {
                let value = value_of(values, id);
                if value.is_empty() {
                    return Ok(());
                }
                validate_carnet_digits(value, value_of(values, suffix))
            }
            _ => Ok(()),
        }
    }

    /// Whole-form check; returns the message when violated
    pub fn check_joint(&self, values: &FormValues) -> Option<&'static str> {
        match self {
            CrossFieldRule::AtLeastOne { fields, message } => {
                let any_filled = fields.iter().any(|k| !value_of(values, k).trim().is_empty());
                (!any_filled).then_some(*message)
            }
            CrossFieldRule::IdSuffix { .. } => None,
        }
    }

    /// Maximum length override for `key`, if this rule controls it
    pub fn max_length(&self, key: &str, values: &FormValues) -> Option<usize> {
        match self {
            CrossFieldRule::IdSuffix { id, suffix } if *id == key => {
                Some(carnet_max_length(value_of(values, suffix)))
            }
            _ => None,
        }
    }
}

fn value_of<'a>(values: &'a FormValues, key: &str) -> &'a str {
    values.get(key).map(String::as_str).unwrap_or("")
}

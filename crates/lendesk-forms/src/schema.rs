// File: src/schema.rs
// Purpose: Field descriptors and per-entity form schemas

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use lendesk_validation::{filter, ValidationResult};
use serde::{Deserialize, Serialize};

use crate::rules::CrossFieldRule;

/// Current value of every field, keyed by field name. Values are always strings.
pub type FormValues = BTreeMap<String, String>;

/// Current error of every field. An empty string means the field is valid.
pub type FormErrors = BTreeMap<String, String>;

/// Shared validator closure
pub type Validator = Arc<dyn Fn(&str) -> ValidationResult + Send + Sync>;

/// HTML input type a field is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Number,
    Email,
    Password,
}

/// Sanitiser applied to raw input before it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFilter {
    /// Only the maximum length is enforced
    Plain,
    Digits,
    Letters,
    Decimal { max_int: usize, max_dec: usize },
    Complemento,
}

impl InputFilter {
    pub fn apply(&self, raw: &str, max_length: Option<usize>) -> String {
        let max = max_length.unwrap_or(usize::MAX);
        match *self {
            InputFilter::Plain => filter::truncate(raw, max),
            InputFilter::Digits => filter::digits_only(raw, max),
            InputFilter::Letters => filter::letters_only(raw, max),
            InputFilter::Decimal { max_int, max_dec } => {
                filter::truncate(&filter::decimal(raw, max_int, max_dec), max)
            }
            InputFilter::Complemento => filter::complemento(raw),
        }
    }
}

/// How a string value is converted when the form is submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Text,
    Integer,
    Decimal,
}

/// Kind of record a form creates or edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Client,
    Employee,
    LoanRequest,
    Loan,
    /// One row of a loan's payment plan
    Installment,
}

impl EntityKind {
    /// REST collection the entity lives under
    pub fn resource(&self) -> &'static str {
        match self {
            EntityKind::Client => "clientes",
            EntityKind::Employee => "empleados",
            EntityKind::LoanRequest => "solicitudes",
            EntityKind::Loan => "prestamos",
            EntityKind::Installment => "plan-pagos",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

/// One field of a form: identity, presentation and its validation rule
#[derive(Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub max_length: Option<usize>,
    pub required: bool,
    pub filter: InputFilter,
    pub conversion: Conversion,
    validator: Validator,
}

impl FieldDescriptor {
    /// Required plain-text field
    pub fn new<F>(key: &'static str, label: &'static str, validator: F) -> Self
    where
        F: Fn(&str) -> ValidationResult + Send + Sync + 'static,
    {
        Self {
            key,
            label,
            kind: InputKind::Text,
            max_length: None,
            required: true,
            filter: InputFilter::Plain,
            conversion: Conversion::Text,
            validator: Arc::new(validator),
        }
    }

    pub fn kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Optional fields are not validated while blank
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn filter(mut self, filter: InputFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn conversion(mut self, conversion: Conversion) -> Self {
        self.conversion = conversion;
        self
    }

    /// Runs the field validator, skipping optional fields left blank
    pub fn validate(&self, value: &str) -> ValidationResult {
        if !self.required && value.is_empty() {
            return Ok(());
        }
        (self.validator)(value)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("max_length", &self.max_length)
            .field("required", &self.required)
            .field("filter", &self.filter)
            .field("conversion", &self.conversion)
            .finish_non_exhaustive()
    }
}

/// Ordered field list for one entity plus the rules that tie fields together
///
/// Schemas are immutable once built and shared by every form instance through `Arc`.
#[derive(Debug, Clone)]
pub struct FormSchema {
    entity: EntityKind,
    fields: Vec<FieldDescriptor>,
    rules: Vec<CrossFieldRule>,
}

impl FormSchema {
    pub fn new(entity: EntityKind, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            entity,
            fields,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: CrossFieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn rules(&self) -> &[CrossFieldRule] {
        &self.rules
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.key)
    }

    /// Keys that must be non-empty before the form may be submitted
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.key)
    }

    /// Values map with every field present and empty
    pub fn empty_values(&self) -> FormValues {
        self.keys().map(|k| (k.to_string(), String::new())).collect()
    }

    /// Effective maximum length, which may depend on sibling values
    pub fn max_length(&self, key: &str, values: &FormValues) -> Option<usize> {
        self.rules
            .iter()
            .find_map(|rule| rule.max_length(key, values))
            .or_else(|| self.field(key).and_then(|f| f.max_length))
    }

    /// Validates one field against its own rule, then against cross-field rules
    pub fn validate_field(&self, key: &str, values: &FormValues) -> ValidationResult {
        let Some(field) = self.field(key) else {
            return Ok(());
        };
        let value = values.get(key).map(String::as_str).unwrap_or("");

        field.validate(value)?;
        for rule in &self.rules {
            rule.check_field(key, values)?;
        }
        Ok(())
    }

    /// Fields whose validation depends on `key`
    pub fn linked_fields(&self, key: &str) -> Vec<&'static str> {
        let mut linked: Vec<&'static str> = self
            .rules
            .iter()
            .filter(|rule| rule.involves(key))
            .flat_map(|rule| rule.fields())
            .filter(|&k| k != key)
            .collect();
        linked.sort_unstable();
        linked.dedup();
        linked
    }

    /// Messages of every joint rule currently violated
    pub fn joint_violations(&self, values: &FormValues) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter_map(|rule| rule.check_joint(values))
            .collect()
    }
}

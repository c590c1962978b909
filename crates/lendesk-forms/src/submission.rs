//! Submission payloads and server error extraction

use lendesk_validation::parse_number;
use serde_json::{Map, Number, Value};

use crate::schema::{Conversion, FormSchema, FormValues};

/// Message shown when a failure carries nothing readable
pub const GENERIC_ERROR: &str = "Ocurrió un error inesperado, intenta más tarde.";

/// Builds the JSON body sent to the API
///
/// Fields keep schema order. Numeric fields are converted from their string
/// form; optional fields left blank are omitted.
pub fn build_payload(schema: &FormSchema, values: &FormValues) -> Map<String, Value> {
    let mut payload = Map::new();

    for field in schema.fields() {
        let raw = values.get(field.key).map(String::as_str).unwrap_or("");
        if raw.is_empty() && !field.required {
            continue;
        }
        payload.insert(field.key.to_string(), convert(raw, field.conversion));
    }

    payload
}

fn convert(raw: &str, conversion: Conversion) -> Value {
    match conversion {
        Conversion::Text => Value::String(raw.to_string()),
        Conversion::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
        Conversion::Decimal => parse_number(raw)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.to_string())),
    }
}

/// Known shapes of an error body returned by the API
#[derive(Debug, Clone, PartialEq)]
pub enum ServerError {
    /// `{"errors": {"field": ["message", ...]}}`, in server order
    FieldErrors(Vec<(String, Vec<String>)>),
    /// `{"error": "message"}`
    Error(String),
    /// `{"message": "message"}`
    Message(String),
    /// the body itself is a string
    Plain(String),
    /// anything else
    Unknown,
}

impl ServerError {
    /// Classifies a response body
    ///
    /// Shapes are tried in priority order: field errors, `error`, `message`,
    /// then a plain string. Spanish keys (`errores`, `mensaje`) are accepted.
    pub fn from_body(body: &Value) -> Self {
        match body {
            Value::String(s) if !s.trim().is_empty() => ServerError::Plain(s.clone()),
            Value::Object(map) => {
                if let Some(fields) = field_errors(map) {
                    return ServerError::FieldErrors(fields);
                }
                if let Some(error) = text_of(map, &["error"]) {
                    return ServerError::Error(error);
                }
                if let Some(message) = text_of(map, &["message", "mensaje", "detail"]) {
                    return ServerError::Message(message);
                }
                ServerError::Unknown
            }
            _ => ServerError::Unknown,
        }
    }

    /// The single message to show the user
    pub fn user_message(&self) -> String {
        match self {
            ServerError::FieldErrors(fields) => fields
                .iter()
                .flat_map(|(_, messages)| messages.iter())
                .next()
                .cloned()
                .unwrap_or_else(|| GENERIC_ERROR.to_string()),
            ServerError::Error(m) | ServerError::Message(m) | ServerError::Plain(m) => m.clone(),
            ServerError::Unknown => GENERIC_ERROR.to_string(),
        }
    }
}

fn field_errors(map: &Map<String, Value>) -> Option<Vec<(String, Vec<String>)>> {
    let errors = map
        .get("errors")
        .or_else(|| map.get("errores"))?
        .as_object()?;

    let fields: Vec<(String, Vec<String>)> = errors
        .iter()
        .map(|(field, messages)| (field.clone(), messages_of(messages)))
        .filter(|(_, messages)| !messages.is_empty())
        .collect();

    (!fields.is_empty()).then_some(fields)
}

fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn text_of(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
        .map(str::to_string)
}

//! Records managed by the back office and their form schemas

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{info, warn};

use crate::gateway::{Gateway, GatewayError, SubmitRequest};
use crate::schema::EntityKind;

pub mod client;
pub mod employee;
pub mod loan;
pub mod loan_request;

pub use client::Client;
pub use employee::{Employee, Role};
pub use loan::{ApprovalError, ApprovalRequest, Loan};
pub use loan_request::LoanRequest;

/// Formats a number the way a user would type it (no trailing `.0` on integers)
pub(crate) fn display_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Asks the API to flip record `id` between active and inactive
///
/// `activo` changes only once the API accepts; an `activo` flag in the
/// response wins over the local flip.
pub(crate) async fn toggle_active<G>(
    gateway: &G,
    entity: EntityKind,
    id: u64,
    activo: &mut bool,
) -> Result<Value, GatewayError>
where
    G: Gateway + ?Sized,
{
    let record = gateway
        .submit(SubmitRequest::toggle(entity, id))
        .await
        .map_err(|err| {
            warn!(%entity, id, error = %err, "toggle rejected");
            err
        })?;

    *activo = record
        .get("activo")
        .and_then(Value::as_bool)
        .unwrap_or(!*activo);
    info!(%entity, id, activo = *activo, "active flag toggled");
    Ok(record)
}

/// The API sends decimals either as JSON numbers or as strings ("3500.00")
pub(crate) fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => lendesk_validation::parse_number(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid decimal: {}", s))),
    }
}

pub(crate) fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "decimal")] f64);

    let wrapped: Option<Wrapper> = Option::deserialize(deserializer)?;
    Ok(wrapped.map(|Wrapper(n)| n))
}

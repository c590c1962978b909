//! Loan requests (solicitudes) and their form

use std::sync::Arc;

use chrono::NaiveDate;
use lendesk_validation::{
    validate_length, validate_letters, validate_loan_amount, validate_max_length,
    validate_not_blank, validate_required, validate_term_months, ValidationResult,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::entities::{decimal, display_number, optional_decimal, ApprovalError};
use crate::gateway::{Gateway, GatewayError, SubmitRequest};
use crate::lifecycle::{RequestStatus, REQUEST_FIELDS};
use crate::schema::{
    Conversion, EntityKind, FieldDescriptor, FormSchema, FormValues, InputFilter, InputKind,
};
use crate::state::FormState;

static SCHEMA: Lazy<Arc<FormSchema>> = Lazy::new(|| Arc::new(schema()));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub id: u64,
    pub cliente: u64,
    #[serde(default)]
    pub cliente_nombre: Option<String>,
    #[serde(default)]
    pub empleado: Option<u64>,
    #[serde(deserialize_with = "decimal")]
    pub monto_solicitado: f64,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub monto_aprobado: Option<f64>,
    #[serde(default)]
    pub plazo_meses: Option<u32>,
    pub proposito: String,
    #[serde(default)]
    pub observaciones: Option<String>,
    pub estado: RequestStatus,
    #[serde(default)]
    pub fecha_solicitud: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_aprobacion: Option<NaiveDate>,
}

fn client_id_rule(value: &str) -> ValidationResult {
    validate_required(value)?;
    match value.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(()),
        _ => Err("Debe seleccionar un cliente".to_string()),
    }
}

fn purpose_rule(value: &str) -> ValidationResult {
    validate_length(value, 5, 500).and_then(|_| validate_letters(value))
}

/// Observations may be left out, but not filled with blanks
fn notes_rule(value: &str) -> ValidationResult {
    validate_not_blank(value)?;
    validate_max_length(value, 500)?;
    validate_letters(value)
}

pub fn schema() -> FormSchema {
    FormSchema::new(
        EntityKind::LoanRequest,
        vec![
            FieldDescriptor::new("cliente", "Cliente", client_id_rule)
                .max_length(10)
                .filter(InputFilter::Digits)
                .conversion(Conversion::Integer),
            FieldDescriptor::new("monto_solicitado", "Monto Solicitado", validate_loan_amount)
                .kind(InputKind::Number)
                .max_length(9)
                .filter(InputFilter::Decimal {
                    max_int: 6,
                    max_dec: 2,
                })
                .conversion(Conversion::Decimal),
            FieldDescriptor::new("proposito", "Propósito", purpose_rule)
                .max_length(500)
                .filter(InputFilter::Letters),
            FieldDescriptor::new("plazo_meses", "Plazo (meses)", validate_term_months)
                .kind(InputKind::Number)
                .max_length(3)
                .filter(InputFilter::Digits)
                .conversion(Conversion::Integer),
            FieldDescriptor::new("observaciones", "Observaciones", notes_rule)
                .optional()
                .max_length(500),
        ],
    )
}

pub fn default_schema() -> Arc<FormSchema> {
    Arc::clone(&SCHEMA)
}

impl LoanRequest {
    pub fn form_values(&self) -> FormValues {
        [
            ("cliente", self.cliente.to_string()),
            ("monto_solicitado", display_number(self.monto_solicitado)),
            ("proposito", self.proposito.clone()),
            (
                "plazo_meses",
                self.plazo_meses.map(|m| m.to_string()).unwrap_or_default(),
            ),
            (
                "observaciones",
                self.observaciones.clone().unwrap_or_default(),
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    /// Edit form with every field the current status freezes locked
    pub fn edit_form(&self, schema: Arc<FormSchema>) -> FormState {
        let editable = self.estado.editable_fields();
        let mut form = FormState::seeded(schema, self.form_values());
        form.lock(
            REQUEST_FIELDS
                .iter()
                .copied()
                .filter(|key| !editable.contains(key)),
        );
        form
    }

    /// Rejects a pending request
    pub async fn reject<G>(&self, gateway: &G) -> Result<Value, ApprovalError>
    where
        G: Gateway + ?Sized,
    {
        let status = self.estado.transition(RequestStatus::Rejected)?;
        let record = update_status(gateway, self.id, status).await?;
        info!(solicitud = self.id, "loan request rejected");
        Ok(record)
    }

    /// Removes the request from the API
    pub async fn delete<G>(&self, gateway: &G) -> Result<Value, GatewayError>
    where
        G: Gateway + ?Sized,
    {
        let record = gateway
            .submit(SubmitRequest::delete(EntityKind::LoanRequest, self.id))
            .await
            .map_err(|err| {
                warn!(solicitud = self.id, error = %err, "delete rejected");
                err
            })?;
        info!(solicitud = self.id, "loan request deleted");
        Ok(record)
    }
}

/// Writes a new status onto request `id`
pub(crate) async fn update_status<G>(
    gateway: &G,
    id: u64,
    status: RequestStatus,
) -> Result<Value, ApprovalError>
where
    G: Gateway + ?Sized,
{
    let mut payload = Map::new();
    payload.insert("estado".to_string(), Value::from(status.as_str()));
    let record = gateway
        .submit(SubmitRequest::update(EntityKind::LoanRequest, id, payload))
        .await?;
    Ok(record)
}

//! Disbursed loans (prestamos) and request approval

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::PolicyConfig;
use crate::entities::loan_request::update_status;
use crate::entities::{decimal, LoanRequest};
use crate::gateway::{Gateway, GatewayError, SubmitRequest};
use crate::lifecycle::{LifecycleError, LoanStatus, RequestStatus};
use crate::schedule::{build_schedule, Installment};
use crate::schema::EntityKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: u64,
    pub solicitud: u64,
    #[serde(default)]
    pub cliente_nombre: Option<String>,
    #[serde(deserialize_with = "decimal")]
    pub monto_solicitado: f64,
    #[serde(deserialize_with = "decimal")]
    pub monto_aprobado: f64,
    #[serde(deserialize_with = "decimal")]
    pub monto_restante: f64,
    /// Monthly rate in percent
    #[serde(deserialize_with = "decimal")]
    pub interes: f64,
    pub plazo_meses: u32,
    pub fecha_desembolso: NaiveDate,
    pub fecha_plazo: NaiveDate,
    pub estado: LoanStatus,
}

impl Loan {
    /// Installments implied by the approved amount, rate and term
    pub fn schedule(&self) -> Vec<Installment> {
        build_schedule(
            self.monto_aprobado,
            self.interes,
            self.plazo_meses,
            self.fecha_desembolso,
        )
    }

    pub fn is_settled(&self) -> bool {
        self.estado == LoanStatus::Completed || self.monto_restante <= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApprovalError {
    #[error("Debe seleccionar una fecha de desembolso.")]
    MissingDate,

    #[error("La fecha de desembolso debe estar entre {earliest} y {latest}")]
    DateOutOfWindow {
        date: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ApprovalError {
    pub fn user_message(&self) -> String {
        match self {
            ApprovalError::Gateway(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Validated order to disburse a pending request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalRequest {
    pub solicitud: u64,
    pub fecha_desembolso: NaiveDate,
}

impl ApprovalRequest {
    /// Checks that `request` may be approved with disbursement on `date`
    ///
    /// The date must fall between `today` and `today` plus the policy window.
    pub fn new(
        request: &LoanRequest,
        date: Option<NaiveDate>,
        today: NaiveDate,
        policy: &PolicyConfig,
    ) -> Result<Self, ApprovalError> {
        request.estado.transition(RequestStatus::Approved)?;

        let date = date.ok_or(ApprovalError::MissingDate)?;
        let latest = today
            .checked_add_months(Months::new(policy.disbursement_window_months))
            .unwrap_or(NaiveDate::MAX);

        if date < today || date > latest {
            return Err(ApprovalError::DateOutOfWindow {
                date,
                earliest: today,
                latest,
            });
        }

        Ok(Self {
            solicitud: request.id,
            fecha_desembolso: date,
        })
    }

    /// Like [`ApprovalRequest::new`] with the local date as `today`
    pub fn for_today(
        request: &LoanRequest,
        date: Option<NaiveDate>,
        policy: &PolicyConfig,
    ) -> Result<Self, ApprovalError> {
        Self::new(request, date, chrono::Local::now().date_naive(), policy)
    }

    pub fn payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("solicitud".to_string(), Value::from(self.solicitud));
        payload.insert(
            "fecha_desembolso".to_string(),
            Value::from(self.fecha_desembolso.format("%Y-%m-%d").to_string()),
        );
        payload
    }

    /// Creates the loan, then marks the request approved
    ///
    /// Returns the loan record sent back by the API.
    pub async fn submit<G>(self, gateway: &G) -> Result<Value, ApprovalError>
    where
        G: Gateway + ?Sized,
    {
        let loan = gateway
            .submit(SubmitRequest::create(EntityKind::Loan, self.payload()))
            .await
            .map_err(|err| {
                warn!(solicitud = self.solicitud, error = %err, "loan creation failed");
                err
            })?;

        update_status(gateway, self.solicitud, RequestStatus::Approved).await?;
        info!(solicitud = self.solicitud, fecha = %self.fecha_desembolso, "loan request approved");
        Ok(loan)
    }
}

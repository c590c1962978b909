//! Repayment schedule (plan de pagos)

use std::fmt;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::calculator::round2;
use crate::entities::decimal;
use crate::gateway::{Gateway, GatewayError, SubmitRequest};
use crate::schema::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallmentStatus {
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Pagada")]
    Paid,
    #[serde(rename = "Vencida")]
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "QR")]
    Qr,
    #[serde(rename = "Efectivo")]
    Cash,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentMethod::Qr => "QR",
            PaymentMethod::Cash => "Efectivo",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("la cuota {0} ya fue pagada")]
    AlreadyPaid(u32),

    /// Locally built rows have no backend id to update
    #[error("la cuota {0} no existe en el servidor")]
    NotPersisted(u32),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ScheduleError {
    /// Message suitable for a notification
    pub fn user_message(&self) -> String {
        match self {
            ScheduleError::Gateway(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// One row of the payment plan, named the way the API names it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// 1-based position in the plan; the API omits it, see [`number_rows`]
    #[serde(rename = "numero_cuota", default)]
    pub number: u32,
    #[serde(rename = "fecha_vencimiento")]
    pub due_date: NaiveDate,
    #[serde(rename = "monto_cuota", deserialize_with = "decimal")]
    pub amount: f64,
    /// Late-payment charge added by the backend
    #[serde(rename = "mora_cuota", default, deserialize_with = "decimal")]
    pub penalty: f64,
    #[serde(rename = "estado")]
    pub status: InstallmentStatus,
    #[serde(rename = "metodo_pago", default)]
    pub method: Option<PaymentMethod>,
    #[serde(rename = "fecha_pago", default, skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDate>,
}

impl Installment {
    /// Amount the client has to pay today
    pub fn total_due(&self) -> f64 {
        round2(self.amount + self.penalty)
    }

    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    /// Update body registering a payment with `method`
    pub fn payment_body(method: PaymentMethod) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("metodo_pago".to_string(), Value::from(method.to_string()));
        body.insert("estado".to_string(), Value::from("Pagada"));
        body
    }

    /// Registers the payment with the API
    ///
    /// The row only becomes [`InstallmentStatus::Paid`] once the API accepts
    /// the update; on failure it is left untouched so the payment can be
    /// retried.
    pub async fn pay<G>(
        &mut self,
        gateway: &G,
        method: PaymentMethod,
    ) -> Result<Value, ScheduleError>
    where
        G: Gateway + ?Sized,
    {
        if self.is_paid() {
            return Err(ScheduleError::AlreadyPaid(self.number));
        }
        let id = self.id.ok_or(ScheduleError::NotPersisted(self.number))?;

        let body = Self::payment_body(method);
        let request = SubmitRequest::update(EntityKind::Installment, id, body);
        let record = gateway.submit(request).await.map_err(|err| {
            warn!(installment = id, error = %err, "payment rejected");
            ScheduleError::from(err)
        })?;

        self.status = InstallmentStatus::Paid;
        self.method = Some(method);
        info!(installment = id, %method, "installment paid");
        Ok(record)
    }
}

/// Numbers rows by their position in the plan, as the payment table shows them
pub fn number_rows(installments: &mut [Installment]) {
    for (index, installment) in installments.iter_mut().enumerate() {
        installment.number = index as u32 + 1;
    }
}

/// Builds a flat-interest schedule
///
/// Interest is `principal * rate% * months`, spread evenly; the last
/// installment absorbs rounding so the sum matches the total exactly.
/// Installment `n` falls due `n` months after `disbursed`.
pub fn build_schedule(
    principal: f64,
    monthly_rate: f64,
    months: u32,
    disbursed: NaiveDate,
) -> Vec<Installment> {
    if months == 0 {
        return Vec::new();
    }

    let total = round2(principal * (1.0 + monthly_rate / 100.0 * f64::from(months)));
    let regular = round2(total / f64::from(months));

    (1..=months)
        .filter_map(|number| {
            let due_date = disbursed.checked_add_months(Months::new(number))?;
            let amount = if number == months {
                round2(total - regular * f64::from(months - 1))
            } else {
                regular
            };
            Some(Installment {
                id: None,
                number,
                due_date,
                amount,
                penalty: 0.0,
                status: InstallmentStatus::Pending,
                method: None,
                paid_on: None,
            })
        })
        .collect()
}

/// Flags unpaid installments whose due date has passed
pub fn mark_overdue(installments: &mut [Installment], today: NaiveDate) {
    for installment in installments
        .iter_mut()
        .filter(|i| i.status == InstallmentStatus::Pending && i.due_date < today)
    {
        installment.status = InstallmentStatus::Overdue;
    }
}

//! Loan-request and loan status lifecycles
//!
//! A request starts `Pending` and is decided exactly once. Decided requests are
//! read-only; anything that happens afterwards (disbursement, repayment) belongs
//! to the loan created from it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fields of the loan-request form
pub const REQUEST_FIELDS: &[&str] = &[
    "cliente",
    "monto_solicitado",
    "proposito",
    "plazo_meses",
    "observaciones",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "Aprobada")]
    Approved,
    #[serde(rename = "Rechazada")]
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("no se puede cambiar una solicitud {from} a {to}")]
    IllegalTransition {
        from: RequestStatus,
        to: RequestStatus,
    },
}

impl RequestStatus {
    /// States reachable from `self`
    pub fn allowed_transitions(&self) -> &'static [RequestStatus] {
        match self {
            RequestStatus::Pending => &[RequestStatus::Approved, RequestStatus::Rejected],
            RequestStatus::Approved | RequestStatus::Rejected => &[],
        }
    }

    pub fn can_transition_to(&self, to: RequestStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    pub fn transition(self, to: RequestStatus) -> Result<RequestStatus, LifecycleError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            tracing::warn!(from = %self, to = %to, "illegal loan request transition");
            Err(LifecycleError::IllegalTransition { from: self, to })
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Request-form fields that may still be edited in this state
    pub fn editable_fields(&self) -> &'static [&'static str] {
        if self.is_terminal() {
            &[]
        } else {
            REQUEST_FIELDS
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pendiente",
            RequestStatus::Approved => "Aprobada",
            RequestStatus::Rejected => "Rechazada",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a disbursed loan, owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    #[serde(rename = "En curso")]
    Active,
    #[serde(rename = "Mora")]
    Overdue,
    #[serde(rename = "Completado")]
    Completed,
}

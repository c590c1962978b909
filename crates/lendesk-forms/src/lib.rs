// Lendesk Forms - loan back-office form layer
// Field schemas, form state and the submission flow for clients, employees and loan requests

pub mod calculator;
pub mod config;
pub mod entities;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod rules;
pub mod schedule;
pub mod schema;
pub mod state;
pub mod submission;

// Re-export core types
pub use config::{ApiConfig, LendeskConfig, PolicyConfig};
pub use error::{FormError, SubmitError};
pub use gateway::{Gateway, GatewayError, MemoryGateway, SubmitAction, SubmitRequest};
pub use lifecycle::{LifecycleError, LoanStatus, RequestStatus};
pub use rules::CrossFieldRule;
pub use schedule::{Installment, InstallmentStatus, PaymentMethod, ScheduleError};
pub use schema::{
    Conversion, EntityKind, FieldDescriptor, FormErrors, FormSchema, FormValues, InputFilter,
    InputKind,
};
pub use state::{FormState, SubmitOutcome};
pub use submission::{build_payload, ServerError, GENERIC_ERROR};

// Re-export domain records
pub use entities::{ApprovalError, ApprovalRequest, Client, Employee, Loan, LoanRequest, Role};

// Re-export the validators so callers need a single dependency
pub use lendesk_validation as validation;

// Integration tests for the form state controller against the real entity schemas

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lendesk_forms::entities::{client, employee, loan_request};
use lendesk_forms::{
    FormState, Gateway, GatewayError, MemoryGateway, SubmitAction, SubmitError, SubmitOutcome,
    SubmitRequest, GENERIC_ERROR,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Gateway whose requests never get an answer
struct StalledGateway;

#[async_trait]
impl Gateway for StalledGateway {
    async fn submit(&self, _request: SubmitRequest) -> Result<Value, GatewayError> {
        std::future::pending().await
    }

    fn name(&self) -> &'static str {
        "stalled"
    }
}

fn filled_client_form() -> FormState {
    let mut form = FormState::new(client::default_schema());
    for (key, value) in [
        ("carnet", "4589123"),
        ("nombre", "María"),
        ("apellido_paterno", "Quispe"),
        ("lugar_trabajo", "Mercado Rodriguez"),
        ("tipo_trabajo", "Comerciante"),
        ("ingreso_mensual", "4200.50"),
        ("direccion", "Av. Buenos Aires 120"),
        ("telefono", "71234567"),
    ] {
        form.set(key, value).unwrap();
    }
    form
}

#[test]
fn client_form_becomes_submittable_when_complete() {
    init_tracing();
    let form = filled_client_form();
    assert!(!form.has_errors(), "{:?}", form.errors());
    assert!(form.can_submit());
}

#[test]
fn surnames_are_jointly_required() {
    let mut form = filled_client_form();

    form.set("apellido_paterno", "").unwrap();
    assert!(form.has_errors());
    assert_eq!(form.joint_errors(), vec![client::SURNAME_REQUIRED]);

    form.set("apellido_materno", "Mamani").unwrap();
    assert!(!form.has_errors());
    assert!(form.joint_errors().is_empty());
}

#[test]
fn carnet_digit_budget_follows_complemento() {
    let mut form = filled_client_form();

    form.set("carnet", "12345678").unwrap();
    assert_eq!(form.error("carnet"), None);

    // adding the suffix revalidates the primary field
    form.set("complemento", "5a").unwrap();
    assert_eq!(form.value("complemento"), Some("5A"));
    assert!(form.error("carnet").is_some());

    form.set("carnet", "1234567").unwrap();
    assert_eq!(form.error("carnet"), None);

    form.set("complemento", "").unwrap();
    form.set("carnet", "123456789").unwrap();
    assert!(form.error("carnet").is_some());
}

#[test]
fn carnet_input_is_capped_by_suffix() {
    let mut form = filled_client_form();
    form.set("complemento", "5A").unwrap();
    form.set("carnet", "1234567890").unwrap();
    assert_eq!(form.value("carnet"), Some("12345678"));
}

#[test]
fn filters_sanitise_keystrokes() {
    let mut form = filled_client_form();

    form.set("telefono", "7a1-23 4567").unwrap();
    assert_eq!(form.value("telefono"), Some("71234567"));

    form.set("ingreso_mensual", "1234567.891").unwrap();
    assert_eq!(form.value("ingreso_mensual"), Some("123456.89"));

    form.set("nombre", "Ana2").unwrap();
    assert_eq!(form.value("nombre"), Some("Ana"));
}

#[test]
fn payload_converts_numbers_and_omits_blank_optionals() {
    let form = filled_client_form();
    let payload = form.payload();

    assert_eq!(payload["telefono"], json!(71234567));
    assert_eq!(payload["ingreso_mensual"], json!(4200.5));
    assert_eq!(payload["carnet"], json!("4589123"));
    assert!(!payload.contains_key("correo"));
    assert!(!payload.contains_key("complemento"));
    assert!(!payload.contains_key("apellido_materno"));

    let keys: Vec<&str> = payload.keys().map(String::as_str).collect();
    assert_eq!(keys.first(), Some(&"carnet"));
    assert_eq!(keys.last(), Some(&"telefono"));
}

#[tokio::test]
async fn blocked_form_never_reaches_the_gateway() {
    let gateway = MemoryGateway::new();
    let mut form = FormState::new(client::default_schema());

    let outcome = form.submit(&gateway, SubmitAction::Create).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Blocked);
    assert!(gateway.requests().await.is_empty());
}

#[tokio::test]
async fn successful_submit_resets_and_notifies() {
    init_tracing();
    let gateway = MemoryGateway::new();
    let completed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&completed);

    let mut form = filled_client_form().on_complete(move |record| {
        sink.lock().unwrap().push(record["id"].clone());
    });

    let outcome = form.submit(&gateway, SubmitAction::Create).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Completed(_)));
    assert_eq!(*completed.lock().unwrap(), vec![json!(1)]);

    assert_eq!(form.value("nombre"), Some(""));
    assert!(form.has_errors());

    let sent = gateway.requests().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].path(), "/clientes/");
}

#[tokio::test]
async fn field_error_from_server_is_surfaced() {
    let gateway = MemoryGateway::new();
    gateway
        .reject_next(
            400,
            json!({ "errors": { "telefono": ["El teléfono debe ser válido"] } }),
        )
        .await;

    let mut form = filled_client_form();
    let err = form.submit(&gateway, SubmitAction::Create).await.unwrap_err();
    assert_eq!(err.user_message(), "El teléfono debe ser válido");

    // values stay for a retry
    assert_eq!(form.value("telefono"), Some("71234567"));
    assert!(!form.is_submitting());
    assert!(form.can_submit());
}

#[tokio::test]
async fn transport_failure_keeps_values() {
    let gateway = MemoryGateway::new();
    gateway.disconnect_next("connection refused").await;

    let mut form = filled_client_form();
    let err = form.submit(&gateway, SubmitAction::Create).await.unwrap_err();
    let SubmitError::Rejected { source, .. } = &err;
    assert!(matches!(source, GatewayError::Transport(_)));
    assert_eq!(form.value("nombre"), Some("María"));

    // the retry goes through
    let outcome = form.submit(&gateway, SubmitAction::Create).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Completed(_)));
}

#[tokio::test]
async fn unreadable_rejection_uses_generic_message() {
    let gateway = MemoryGateway::new();
    gateway.reject_next(500, json!({ "trace": [1, 2, 3] })).await;

    let mut form = filled_client_form();
    let err = form.submit(&gateway, SubmitAction::Create).await.unwrap_err();
    assert_eq!(err.user_message(), GENERIC_ERROR);
}

#[tokio::test]
async fn employee_create_and_edit() {
    let gateway = MemoryGateway::new();
    let mut form = FormState::new(employee::default_create_schema());
    for (key, value) in [
        ("nombre", "Luis"),
        ("apellido_paterno", "Quispe"),
        ("apellido_materno", "Mamani"),
        ("correo", "lquispe@gmail.com"),
        ("telefono", "61234567"),
        ("rol", "Asesor"),
        ("username", "lquispe"),
        ("password", "Abcdef1!"),
    ] {
        form.set(key, value).unwrap();
    }
    assert!(!form.has_errors(), "{:?}", form.errors());

    let outcome = form.submit(&gateway, SubmitAction::Create).await.unwrap();
    let SubmitOutcome::Completed(record) = outcome else {
        panic!("expected completion");
    };
    assert_eq!(record["telefono"], json!(61234567));

    let mut edit = FormState::seeded(
        employee::default_edit_schema(),
        [("rol".to_string(), "Gerente".to_string())].into(),
    );
    assert!(edit.error("rol").is_some());
    edit.set("rol", "Administrador").unwrap();
    assert_eq!(edit.error("rol"), None);
}

#[tokio::test]
async fn loan_request_update_goes_to_its_path() {
    let gateway = MemoryGateway::new();
    let mut form = FormState::new(loan_request::default_schema());
    for (key, value) in [
        ("cliente", "4"),
        ("monto_solicitado", "100"),
        ("proposito", "Compra de mercaderia"),
        ("plazo_meses", "12"),
    ] {
        form.set(key, value).unwrap();
    }
    assert!(form.can_submit(), "{:?}", form.errors());

    form.set("monto_solicitado", "99").unwrap();
    assert!(form.error("monto_solicitado").is_some());
    form.set("monto_solicitado", "100").unwrap();

    form.submit(&gateway, SubmitAction::Update(12)).await.unwrap();
    let sent = gateway.requests().await;
    assert_eq!(sent[0].path(), "/solicitudes/12/");
    assert_eq!(sent[0].payload["plazo_meses"], json!(12));
    assert_eq!(sent[0].payload["monto_solicitado"], json!(100.0));
}

#[tokio::test]
async fn cancelled_submit_leaves_form_submittable() {
    init_tracing();
    let mut form = filled_client_form();

    let timed_out = tokio::time::timeout(
        Duration::from_millis(20),
        form.submit(&StalledGateway, SubmitAction::Create),
    )
    .await;
    assert!(timed_out.is_err());

    assert!(!form.is_submitting());
    assert!(form.can_submit());
    assert_eq!(form.value("carnet"), Some("4589123"));

    let gateway = MemoryGateway::new();
    let outcome = form.submit(&gateway, SubmitAction::Create).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Completed(_)));
    assert_eq!(gateway.requests().await.len(), 1);
}

#[test]
fn loan_term_accepts_three_digits_and_reports_overflow() {
    let mut form = FormState::new(loan_request::default_schema());
    form.set("plazo_meses", "100").unwrap();
    assert_eq!(form.value("plazo_meses"), Some("100"));
    assert_eq!(
        form.error("plazo_meses"),
        Some("El plazo no puede exceder 99 meses")
    );

    form.set("plazo_meses", "1234").unwrap();
    assert_eq!(form.value("plazo_meses"), Some("123"));

    form.set("cliente", "123456789012").unwrap();
    assert_eq!(form.value("cliente"), Some("1234567890"));
}

//! Client (borrower) records and the client form

use std::sync::Arc;

use lendesk_validation::{
    validate_carnet, validate_complemento, validate_email, validate_email_extension,
    validate_income, validate_length, validate_letters, validate_min_length, validate_phone,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PolicyConfig;
use crate::entities::{self, decimal, display_number};
use crate::gateway::{Gateway, GatewayError};
use crate::rules::CrossFieldRule;
use crate::schema::{
    Conversion, EntityKind, FieldDescriptor, FormSchema, FormValues, InputFilter, InputKind,
};
use crate::state::FormState;

pub const SURNAME_REQUIRED: &str = "Debe ingresar al menos un apellido";

static DEFAULT_SCHEMA: Lazy<Arc<FormSchema>> =
    Lazy::new(|| Arc::new(schema(&PolicyConfig::default())));

/// Client as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    #[serde(default)]
    pub user: Option<String>,
    pub carnet: String,
    #[serde(default)]
    pub complemento: Option<String>,
    pub nombre: String,
    #[serde(default)]
    pub apellido_paterno: Option<String>,
    #[serde(default)]
    pub apellido_materno: Option<String>,
    pub lugar_trabajo: String,
    pub tipo_trabajo: String,
    #[serde(deserialize_with = "decimal")]
    pub ingreso_mensual: f64,
    pub direccion: String,
    #[serde(default)]
    pub correo: Option<String>,
    pub telefono: u64,
    #[serde(default = "default_active")]
    pub activo: bool,
}

fn default_active() -> bool {
    true
}

fn name_rule(value: &str) -> lendesk_validation::ValidationResult {
    validate_min_length(value, 3).and_then(|_| validate_letters(value))
}

/// Client form schema; create and edit share it
pub fn schema(policy: &PolicyConfig) -> FormSchema {
    let carnet_min = policy.carnet_min_length;

    FormSchema::new(
        EntityKind::Client,
        vec![
            FieldDescriptor::new("carnet", "Carnet", move |v| validate_carnet(v, carnet_min))
                .max_length(9),
            FieldDescriptor::new("complemento", "Complemento", validate_complemento)
                .optional()
                .max_length(2)
                .filter(InputFilter::Complemento),
            FieldDescriptor::new("nombre", "Nombre", name_rule)
                .max_length(30)
                .filter(InputFilter::Letters),
            FieldDescriptor::new("apellido_paterno", "Apellido Paterno", name_rule)
                .optional()
                .max_length(30)
                .filter(InputFilter::Letters),
            FieldDescriptor::new("apellido_materno", "Apellido Materno", name_rule)
                .optional()
                .max_length(30)
                .filter(InputFilter::Letters),
            FieldDescriptor::new("lugar_trabajo", "Lugar de Trabajo", |v| {
                validate_length(v, 1, 60).and_then(|_| validate_letters(v))
            })
            .max_length(60)
            .filter(InputFilter::Letters),
            FieldDescriptor::new("tipo_trabajo", "Ocupación", |v| {
                validate_length(v, 1, 30).and_then(|_| validate_letters(v))
            })
            .max_length(30)
            .filter(InputFilter::Letters),
            FieldDescriptor::new("ingreso_mensual", "Ingreso Mensual", validate_income)
                .kind(InputKind::Number)
                .max_length(9)
                .filter(InputFilter::Decimal {
                    max_int: 6,
                    max_dec: 2,
                })
                .conversion(Conversion::Decimal),
            FieldDescriptor::new("direccion", "Dirección", |v| validate_length(v, 1, 255))
                .max_length(255),
            FieldDescriptor::new("correo", "Correo", |v| {
                validate_length(v, 1, 50)
                    .and_then(|_| validate_email(v))
                    .and_then(|_| validate_email_extension(v))
            })
            .optional()
            .kind(InputKind::Email)
            .max_length(50),
            FieldDescriptor::new("telefono", "Teléfono", validate_phone)
                .max_length(8)
                .filter(InputFilter::Digits)
                .conversion(Conversion::Integer),
        ],
    )
    .with_rule(CrossFieldRule::IdSuffix {
        id: "carnet",
        suffix: "complemento",
    })
    .with_rule(CrossFieldRule::AtLeastOne {
        fields: &["apellido_paterno", "apellido_materno"],
        message: SURNAME_REQUIRED,
    })
}

/// Shared schema built with the default policy
pub fn default_schema() -> Arc<FormSchema> {
    Arc::clone(&DEFAULT_SCHEMA)
}

impl Client {
    /// Display values used to seed the edit form
    pub fn form_values(&self) -> FormValues {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        [
            ("carnet", self.carnet.clone()),
            ("complemento", text(&self.complemento)),
            ("nombre", self.nombre.clone()),
            ("apellido_paterno", text(&self.apellido_paterno)),
            ("apellido_materno", text(&self.apellido_materno)),
            ("lugar_trabajo", self.lugar_trabajo.clone()),
            ("tipo_trabajo", self.tipo_trabajo.clone()),
            ("ingreso_mensual", display_number(self.ingreso_mensual)),
            ("direccion", self.direccion.clone()),
            ("correo", text(&self.correo)),
            ("telefono", self.telefono.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    pub fn edit_form(&self, schema: Arc<FormSchema>) -> FormState {
        FormState::seeded(schema, self.form_values())
    }

    /// Activates or deactivates the client through the API
    pub async fn toggle_active<G>(&mut self, gateway: &G) -> Result<Value, GatewayError>
    where
        G: Gateway + ?Sized,
    {
        entities::toggle_active(gateway, EntityKind::Client, self.id, &mut self.activo).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use pretty_assertions::assert_eq;

    fn sample() -> Client {
        serde_json::from_value(serde_json::json!({
            "id": 4,
            "carnet": "1234567",
            "complemento": "1A",
            "nombre": "María",
            "apellido_paterno": "Quispe",
            "apellido_materno": null,
            "lugar_trabajo": "Mercado Rodriguez",
            "tipo_trabajo": "Comerciante",
            "ingreso_mensual": "4200.00",
            "direccion": "Av. Buenos Aires 120",
            "correo": null,
            "telefono": 71234567,
            "activo": true
        }))
        .unwrap()
    }

    #[test]
    fn test_schema_required_set() {
        let schema = default_schema();
        let required: Vec<_> = schema.required_fields().collect();
        assert_eq!(
            required,
            vec![
                "carnet",
                "nombre",
                "lugar_trabajo",
                "tipo_trabajo",
                "ingreso_mensual",
                "direccion",
                "telefono"
            ]
        );
    }

    #[test]
    fn test_form_values_display_forms() {
        let values = sample().form_values();
        assert_eq!(values["ingreso_mensual"], "4200");
        assert_eq!(values["telefono"], "71234567");
        assert_eq!(values["apellido_materno"], "");
        assert_eq!(values["correo"], "");
    }

    #[test]
    fn test_edit_form_starts_clean() {
        let form = sample().edit_form(default_schema());
        assert!(!form.has_errors(), "{:?}", form.errors());
    }

    #[tokio::test]
    async fn test_toggle_active_after_api_accepts() {
        let gateway = MemoryGateway::new();
        let mut client = sample();

        client.toggle_active(&gateway).await.unwrap();
        assert!(!client.activo);
        client.toggle_active(&gateway).await.unwrap();
        assert!(client.activo);

        let sent = gateway.requests().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].path(), "/clientes/4/toggle/");
    }

    #[tokio::test]
    async fn test_failed_toggle_keeps_flag() {
        let gateway = MemoryGateway::new();
        gateway.disconnect_next("connection refused").await;
        let mut client = sample();

        assert!(client.toggle_active(&gateway).await.is_err());
        assert!(client.activo);
    }
}

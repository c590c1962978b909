//! Staff accounts and the employee create/edit forms

use std::fmt;
use std::sync::Arc;

use lendesk_validation::{
    validate_email, validate_email_provider, validate_length, validate_letters,
    validate_min_length, validate_one_of, validate_password, validate_phone, ValidationResult,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PolicyConfig;
use crate::entities;
use crate::gateway::{Gateway, GatewayError};
use crate::schema::{
    Conversion, EntityKind, FieldDescriptor, FormSchema, FormValues, InputFilter, InputKind,
};
use crate::state::FormState;

static CREATE_SCHEMA: Lazy<Arc<FormSchema>> =
    Lazy::new(|| Arc::new(create_schema(&PolicyConfig::default())));

static EDIT_SCHEMA: Lazy<Arc<FormSchema>> = Lazy::new(|| Arc::new(edit_schema()));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Administrador,
    Asesor,
}

impl Role {
    pub const ALL: &'static [&'static str] = &["Administrador", "Asesor"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrador => "Administrador",
            Role::Asesor => "Asesor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: String,
    #[serde(default)]
    pub correo: Option<String>,
    pub telefono: u64,
    pub rol: Role,
    #[serde(default = "default_active")]
    pub activo: bool,
}

fn default_active() -> bool {
    true
}

fn name_rule(value: &str) -> ValidationResult {
    validate_min_length(value, 3).and_then(|_| validate_letters(value))
}

fn role_rule(value: &str) -> ValidationResult {
    validate_one_of(value, Role::ALL)
}

fn name_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("nombre", "Nombre", name_rule)
            .max_length(30)
            .filter(InputFilter::Letters),
        FieldDescriptor::new("apellido_paterno", "Apellido Paterno", name_rule)
            .max_length(30)
            .filter(InputFilter::Letters),
        FieldDescriptor::new("apellido_materno", "Apellido Materno", name_rule)
            .max_length(30)
            .filter(InputFilter::Letters),
    ]
}

fn phone_field() -> FieldDescriptor {
    FieldDescriptor::new("telefono", "Teléfono", validate_phone)
        .max_length(8)
        .filter(InputFilter::Digits)
        .conversion(Conversion::Integer)
}

/// Form used to register a new employee, login credentials included
pub fn create_schema(policy: &PolicyConfig) -> FormSchema {
    let password_min = policy.password_min_length;

    let mut fields = name_fields();
    fields.extend([
        FieldDescriptor::new("correo", "Correo", |v| {
            validate_email(v).and_then(|_| validate_email_provider(v))
        })
        .kind(InputKind::Email)
        .max_length(50),
        phone_field(),
        FieldDescriptor::new("rol", "Rol", role_rule),
        FieldDescriptor::new("username", "Usuario", |v| validate_length(v, 3, 20)).max_length(20),
        FieldDescriptor::new("password", "Contraseña", move |v| {
            validate_password(v, password_min)
        })
        .kind(InputKind::Password)
        .max_length(64),
    ]);

    FormSchema::new(EntityKind::Employee, fields)
}

/// Form used to edit an employee; credentials are managed elsewhere
pub fn edit_schema() -> FormSchema {
    let mut fields = vec![FieldDescriptor::new("rol", "Rol", role_rule)];
    fields.extend(name_fields());
    fields.extend([
        FieldDescriptor::new("correo", "Correo", validate_email)
            .optional()
            .kind(InputKind::Email)
            .max_length(50),
        phone_field(),
    ]);

    FormSchema::new(EntityKind::Employee, fields)
}

pub fn default_create_schema() -> Arc<FormSchema> {
    Arc::clone(&CREATE_SCHEMA)
}

pub fn default_edit_schema() -> Arc<FormSchema> {
    Arc::clone(&EDIT_SCHEMA)
}

impl Employee {
    pub fn form_values(&self) -> FormValues {
        [
            ("rol", self.rol.to_string()),
            ("nombre", self.nombre.clone()),
            ("apellido_paterno", self.apellido_paterno.clone()),
            ("apellido_materno", self.apellido_materno.clone()),
            ("correo", self.correo.clone().unwrap_or_default()),
            ("telefono", self.telefono.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    pub fn edit_form(&self, schema: Arc<FormSchema>) -> FormState {
        FormState::seeded(schema, self.form_values())
    }

    /// Activates or deactivates the employee account through the API
    pub async fn toggle_active<G>(&mut self, gateway: &G) -> Result<Value, GatewayError>
    where
        G: Gateway + ?Sized,
    {
        entities::toggle_active(gateway, EntityKind::Employee, self.id, &mut self.activo).await
    }
}

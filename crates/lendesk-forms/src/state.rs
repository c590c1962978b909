//! Form state controller
//!
//! One `FormState` backs one open create/edit dialog. Every change is filtered,
//! stored and revalidated synchronously; submission is gated on
//! [`FormState::has_errors`] and awaits the gateway.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{FormError, SubmitError};
use crate::gateway::{Gateway, SubmitAction, SubmitRequest};
use crate::schema::{FormErrors, FormSchema, FormValues};
use crate::submission::build_payload;

type CompletionCallback = Box<dyn FnMut(&Value) + Send>;

/// Result of a submit attempt that did not fail remotely
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The form still has errors (or a submission is in flight); nothing was sent
    Blocked,
    /// The API accepted the submission and returned this record
    Completed(Value),
}

pub struct FormState {
    schema: Arc<FormSchema>,
    initial: FormValues,
    initial_errors: FormErrors,
    values: FormValues,
    errors: FormErrors,
    read_only: BTreeSet<String>,
    submitting: bool,
    on_complete: Option<CompletionCallback>,
}

impl FormState {
    /// Create-mode form: every field empty, no errors shown yet
    pub fn new(schema: Arc<FormSchema>) -> Self {
        let initial = schema.empty_values();
        let initial_errors = initial.keys().map(|k| (k.clone(), String::new())).collect();
        Self::build(schema, initial, initial_errors)
    }

    /// Edit-mode form seeded from an existing record
    ///
    /// Unknown keys are ignored. Seeded values are validated immediately so
    /// stale data is flagged before the user touches it.
    pub fn seeded(schema: Arc<FormSchema>, values: FormValues) -> Self {
        let mut initial = schema.empty_values();
        for (key, value) in values {
            if initial.contains_key(&key) {
                initial.insert(key, value);
            } else {
                debug!(entity = %schema.entity(), key = %key, "ignoring unknown seed field");
            }
        }

        let initial_errors = schema
            .keys()
            .map(|key| {
                let error = if initial[key].is_empty() {
                    String::new()
                } else {
                    schema.validate_field(key, &initial).err().unwrap_or_default()
                };
                (key.to_string(), error)
            })
            .collect();

        Self::build(schema, initial, initial_errors)
    }

    fn build(schema: Arc<FormSchema>, initial: FormValues, initial_errors: FormErrors) -> Self {
        Self {
            values: initial.clone(),
            errors: initial_errors.clone(),
            schema,
            initial,
            initial_errors,
            read_only: BTreeSet::new(),
            submitting: false,
            on_complete: None,
        }
    }

    /// Registers the callback invoked after a successful submission
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Value) + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Handles a change event for `key`
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), FormError> {
        let field = self
            .schema
            .field(key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        if self.read_only.contains(key) {
            return Err(FormError::ReadOnly(key.to_string()));
        }

        let max = self.schema.max_length(key, &self.values);
        let value = field.filter.apply(raw, max);
        self.values.insert(key.to_string(), value);

        self.revalidate(key);
        for linked in self.schema.linked_fields(key) {
            self.revalidate(linked);
        }

        debug!(
            entity = %self.schema.entity(),
            field = key,
            error = self.errors.get(key).map(String::as_str).unwrap_or(""),
            "field changed"
        );
        Ok(())
    }

    fn revalidate(&mut self, key: &str) {
        let error = self
            .schema
            .validate_field(key, &self.values)
            .err()
            .unwrap_or_default();
        self.errors.insert(key.to_string(), error);
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current error for `key`; `None` when the field is valid
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors
            .get(key)
            .map(String::as_str)
            .filter(|e| !e.is_empty())
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Whole-form messages, such as a missing surname
    pub fn joint_errors(&self) -> Vec<&'static str> {
        self.schema.joint_violations(&self.values)
    }

    /// Field errors, missing required values or violated joint rules
    pub fn has_errors(&self) -> bool {
        self.errors.values().any(|e| !e.is_empty())
            || self
                .schema
                .required_fields()
                .any(|key| self.values.get(key).map_or(true, |v| v.trim().is_empty()))
            || !self.joint_errors().is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.has_errors()
    }

    /// Makes `keys` read-only
    pub fn lock<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        self.read_only.extend(keys.into_iter().map(str::to_string));
    }

    pub fn is_read_only(&self, key: &str) -> bool {
        self.read_only.contains(key)
    }

    /// Restores the values the form was opened with
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors = self.initial_errors.clone();
    }

    /// JSON body for the current values
    pub fn payload(&self) -> Map<String, Value> {
        build_payload(&self.schema, &self.values)
    }

    /// Sends the form through `gateway`
    ///
    /// Returns [`SubmitOutcome::Blocked`] without contacting the API while the
    /// form has errors. On success the form is reset and the completion
    /// callback runs; on failure the values are kept so the user can retry.
    pub async fn submit<G>(
        &mut self,
        gateway: &G,
        action: SubmitAction,
    ) -> Result<SubmitOutcome, SubmitError>
    where
        G: Gateway + ?Sized,
    {
        if self.submitting || self.has_errors() {
            debug!(entity = %self.schema.entity(), "submit ignored, form not submittable");
            return Ok(SubmitOutcome::Blocked);
        }

        let request = SubmitRequest {
            entity: self.schema.entity(),
            action,
            payload: self.payload(),
        };

        info!(
            entity = %request.entity,
            path = %request.path(),
            gateway = gateway.name(),
            "submitting form"
        );

        let result = {
            let _in_flight = InFlight::start(&mut self.submitting);
            gateway.submit(request).await
        };

        match result {
            Ok(record) => {
                info!(entity = %self.schema.entity(), "submission completed");
                self.reset();
                if let Some(callback) = self.on_complete.as_mut() {
                    callback(&record);
                }
                Ok(SubmitOutcome::Completed(record))
            }
            Err(source) => {
                let message = source.user_message();
                warn!(
                    entity = %self.schema.entity(),
                    error = %source,
                    %message,
                    "submission rejected"
                );
                Err(SubmitError::Rejected { message, source })
            }
        }
    }
}

/// Holds the submitting flag up for the life of one request
///
/// Clears it on drop, so a submit future cancelled mid-request leaves the
/// form submittable again.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl fmt::Debug for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("entity", &self.schema.entity())
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("read_only", &self.read_only)
            .field("submitting", &self.submitting)
            .finish_non_exhaustive()
    }
}

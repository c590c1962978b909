//! REST implementation of [`Gateway`]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lendesk_forms::{ApiConfig, EntityKind, Gateway, GatewayError, SubmitAction, SubmitRequest};
use reqwest::{header, Method};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::credentials::{CredentialProvider, EnvToken};
use crate::error::ClientError;

const USER_AGENT: &str = concat!("lendesk-client/", env!("CARGO_PKG_VERSION"));

/// Talks to the lendesk REST API
///
/// Creates are `POST /{resource}/`, updates are `PUT /{resource}/{id}/`,
/// active toggles are `PATCH /{resource}/{id}/toggle/` and deletes are
/// `DELETE /{resource}/{id}/`. Cloning is cheap; clones share the
/// connection pool.
#[derive(Clone)]
pub struct HttpGateway {
    inner: Arc<Inner>,
}

struct Inner {
    base_url: String,
    http: reqwest::Client,
    credentials: Box<dyn CredentialProvider>,
}

impl HttpGateway {
    pub fn new<C>(config: &ApiConfig, credentials: C) -> Result<Self, ClientError>
    where
        C: CredentialProvider + 'static,
    {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                base_url,
                http,
                credentials: Box::new(credentials),
            }),
        })
    }

    /// Gateway reading its token from the variable named in `config.token_env`
    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        Self::new(config, EnvToken::new(config.token_env.as_str()))
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Fetches every record of `entity`
    pub async fn list<T: DeserializeOwned>(
        &self,
        entity: EntityKind,
    ) -> Result<Vec<T>, ClientError> {
        let path = format!("/{}/", entity.resource());
        let body = self.send(Method::GET, &path, None).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Fetches one record of `entity`
    pub async fn get<T: DeserializeOwned>(
        &self,
        entity: EntityKind,
        id: u64,
    ) -> Result<T, ClientError> {
        let path = format!("/{}/{}/", entity.resource(), id);
        let body = self.send(Method::GET, &path, None).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Map<String, Value>>,
    ) -> Result<Value, ClientError> {
        let url = Url::parse(&format!("{}{}", self.inner.base_url, path))?;
        let mut request = self.inner.http.request(method.clone(), url);

        if let Some(token) = self.inner.credentials.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, path, "sending request");
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let body = parse_body(&bytes);

        if status.is_success() {
            debug!(%method, path, status = status.as_u16(), "request succeeded");
            Ok(body)
        } else {
            warn!(%method, path, status = status.as_u16(), "API rejected request");
            Err(ClientError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// JSON when possible, the raw text otherwise, `null` when empty
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).trim().to_string()))
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn submit(&self, request: SubmitRequest) -> Result<Value, GatewayError> {
        let (method, body) = match request.action {
            SubmitAction::Create => (Method::POST, Some(&request.payload)),
            SubmitAction::Update(_) => (Method::PUT, Some(&request.payload)),
            SubmitAction::Toggle(_) => (Method::PATCH, None),
            SubmitAction::Delete(_) => (Method::DELETE, None),
        };
        self.send(method, &request.path(), body)
            .await
            .map_err(GatewayError::from)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

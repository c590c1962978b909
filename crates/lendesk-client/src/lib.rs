//! Lendesk REST client
//!
//! [`HttpGateway`] implements the form layer's [`Gateway`](lendesk_forms::Gateway)
//! over reqwest. Credentials are injected through a [`CredentialProvider`]
//! instead of being read from ambient storage.
//!
//! ```no_run
//! use lendesk_client::{HttpGateway, StaticToken};
//! use lendesk_forms::{entities::client, FormState, LendeskConfig, SubmitAction};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = LendeskConfig::load_default()?;
//! let gateway = HttpGateway::new(&config.api, StaticToken::new("token"))?;
//!
//! let mut form = FormState::new(client::default_schema());
//! form.set("carnet", "4589123")?;
//! form.submit(&gateway, SubmitAction::Create).await?;
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod error;
pub mod http;

pub use credentials::{Anonymous, CredentialProvider, EnvToken, StaticToken};
pub use error::ClientError;
pub use http::HttpGateway;

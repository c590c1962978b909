//! Bearer-token sources
//!
//! The gateway asks its provider for a token on every request, so a token
//! refreshed elsewhere is picked up without rebuilding the client.

use std::env;
use std::fmt;

/// Supplies the access token sent as `Authorization: Bearer <token>`
pub trait CredentialProvider: Send + Sync {
    /// Current token; `None` sends the request unauthenticated
    fn token(&self) -> Option<String>;
}

/// Fixed token, typically read from configuration at startup
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialProvider for StaticToken {
    fn token(&self) -> Option<String> {
        (!self.0.is_empty()).then(|| self.0.clone())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

/// Token read from an environment variable on each request
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialProvider for EnvToken {
    fn token(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|t| !t.trim().is_empty())
    }
}

/// Sends every request without credentials
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl CredentialProvider for Anonymous {
    fn token(&self) -> Option<String> {
        None
    }
}

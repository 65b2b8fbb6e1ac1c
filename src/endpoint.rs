use url::Url;

use crate::types::constants::{DEV_BACKEND_PORT, TOKEN_PARAM, WS_PATH};
use crate::types::{RealtimeError, Result};

/// Deployment environment, controls the host/port convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Dial the backend directly on its own port.
    Development,
    /// Same-origin convention: backend is reachable on the app's host.
    Production,
}

/// Derives the WebSocket connection target from the application origin.
///
/// The scheme mirrors the origin's transport security: `wss` iff the app is
/// served over `https`, plain `ws` otherwise. The session credential, when
/// present, rides along as a query parameter.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    origin: Url,
    environment: Environment,
    dev_port: u16,
    path: String,
}

impl EndpointConfig {
    pub fn new(origin: impl AsRef<str>, environment: Environment) -> Result<Self> {
        let origin = Url::parse(origin.as_ref())?;
        if origin.host_str().is_none() {
            return Err(RealtimeError::Connection(format!(
                "origin has no host: {origin}"
            )));
        }
        Ok(Self {
            origin,
            environment,
            dev_port: DEV_BACKEND_PORT,
            path: WS_PATH.to_string(),
        })
    }

    /// Override the development backend port (defaults to 8000).
    pub fn with_dev_port(mut self, port: u16) -> Self {
        self.dev_port = port;
        self
    }

    /// Override the WebSocket path (defaults to `/ws`).
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Build the full connection URL, appending the credential if one exists.
    pub fn websocket_url(&self, token: Option<&str>) -> Result<Url> {
        let scheme = if self.origin.scheme() == "https" {
            "wss"
        } else {
            "ws"
        };

        // host_str presence is validated in new()
        let host = self
            .origin
            .host_str()
            .ok_or_else(|| RealtimeError::Connection("origin has no host".to_string()))?;

        let authority = match self.environment {
            Environment::Development => format!("{}:{}", host, self.dev_port),
            Environment::Production => match self.origin.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            },
        };

        let mut url = Url::parse(&format!("{}://{}{}", scheme, authority, self.path))?;
        if let Some(token) = token {
            url.query_pairs_mut().append_pair(TOKEN_PARAM, token);
        }
        Ok(url)
    }
}

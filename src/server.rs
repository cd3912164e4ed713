//! Read-only view of the running sync server.

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::config::ServerOptions;

/// Deployment mode of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Environment {
    Development,
    Production,
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            other => bail!(
                "Unknown environment '{}'. Use 'development' or 'production'.",
                other
            ),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Describes how clients reach the server once it is listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenDescriptor {
    /// Bound to an address without TLS.
    Plain { host: String, port: u16 },
    /// Bound to an address with a certificate present.
    Secure { host: String, port: u16 },
    /// Attached to a transport the embedding application created itself.
    External,
}

impl ListenDescriptor {
    pub fn plain(host: impl ToString, port: u16) -> Self {
        ListenDescriptor::Plain {
            host: host.to_string(),
            port,
        }
    }

    pub fn secure(host: impl ToString, port: u16) -> Self {
        ListenDescriptor::Secure {
            host: host.to_string(),
            port,
        }
    }

    /// Returns the URL clients connect to, or a description for external transports.
    pub fn url(&self) -> String {
        match self {
            ListenDescriptor::Plain { host, port } => format!("ws://{host}:{port}"),
            ListenDescriptor::Secure { host, port } => format!("wss://{host}:{port}"),
            ListenDescriptor::External => "external transport".to_string(),
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self, ListenDescriptor::Secure { .. })
    }
}

/// Everything the reporter needs to know about the server itself.
#[derive(Debug, Clone)]
pub struct ServerContext {
    pub environment: Environment,
    pub pid: u32,
    pub node_id: String,
    /// Application subprotocol version, e.g. `2.5.0`.
    pub subprotocol: String,
    /// Range of client subprotocols accepted, e.g. `2.x || 1.x`.
    pub supports: String,
    /// `None` until the listen phase has completed.
    pub listen: Option<ListenDescriptor>,
    pub started_at: DateTime<Utc>,
}

impl ServerContext {
    pub fn new(options: ServerOptions, started_at: DateTime<Utc>) -> Self {
        ServerContext {
            environment: options.env,
            pid: options.pid,
            node_id: options.node_id,
            subprotocol: options.subprotocol,
            supports: options.supports,
            listen: None,
            started_at,
        }
    }

    /// Records where the server ended up listening.
    pub fn listening(mut self, listen: ListenDescriptor) -> Self {
        self.listen = Some(listen);
        self
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_environment_names() {
        assert_eq!(
            "development".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert_eq!(
            " Production ".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn builds_urls_per_listener() {
        assert_eq!(
            ListenDescriptor::plain("127.0.0.1", 1337).url(),
            "ws://127.0.0.1:1337"
        );
        assert_eq!(
            ListenDescriptor::secure("0.0.0.0", 1337).url(),
            "wss://0.0.0.0:1337"
        );
        assert_eq!(ListenDescriptor::External.url(), "external transport");
    }
}

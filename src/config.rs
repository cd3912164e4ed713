//! Server options as seen by the reporter.
//!
//! Options can be read from a JSON document or from the environment:
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `SYNC_ENV` | `development` or `production` | `development` |
//! | `SYNC_NODE_ID` | Node identifier of this server | `server:<pid>` |
//! | `SYNC_SUBPROTOCOL` | Application subprotocol version | (required) |
//! | `SYNC_SUPPORTS` | Accepted client subprotocol range | value of `SYNC_SUBPROTOCOL` |

use anyhow::Context;
use serde::Deserialize;
use std::env;

use crate::server::Environment;

/// Static options the server was started with.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOptions {
    #[serde(default = "default_env")]
    pub env: Environment,
    #[serde(default = "std::process::id")]
    pub pid: u32,
    pub node_id: String,
    pub subprotocol: String,
    /// Falls back to `subprotocol` when empty or missing.
    #[serde(default)]
    pub supports: String,
}

fn default_env() -> Environment {
    Environment::Development
}

impl ServerOptions {
    /// Parses options from a JSON object like `{"nodeId": "...", "subprotocol": "1.0.0", ...}`.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let mut options: ServerOptions =
            serde_json::from_str(json).context("Failed to parse server options")?;
        if options.supports.is_empty() {
            options.supports = options.subprotocol.clone();
        }

        Ok(options)
    }

    /// Reads options from `SYNC_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let env = match lookup("SYNC_ENV") {
            Some(value) => value
                .parse::<Environment>()
                .context("Failed to read SYNC_ENV")?,
            None => default_env(),
        };
        let pid = std::process::id();
        let subprotocol =
            lookup("SYNC_SUBPROTOCOL").context("SYNC_SUBPROTOCOL must be set")?;

        Ok(ServerOptions {
            env,
            pid,
            node_id: lookup("SYNC_NODE_ID").unwrap_or_else(|| format!("server:{pid}")),
            supports: lookup("SYNC_SUPPORTS").unwrap_or_else(|| subprotocol.clone()),
            subprotocol,
        })
    }
}

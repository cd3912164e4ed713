//! Errors that get reported, as opposed to errors the reporter raises.

use serde_json::Value;
use std::fmt::{Display, Formatter};

/// A fault in the sync protocol exchange with a peer.
///
/// `raised_about_peer` is set when the server blames the remote side for the
/// fault. Otherwise the error is about the server itself or was received from
/// the peer describing its own local fault.
#[derive(Debug, Clone)]
pub struct ProtocolError {
    pub kind: String,
    pub detail: Value,
    pub raised_about_peer: bool,
}

impl ProtocolError {
    pub fn new(kind: impl ToString, detail: impl Into<Value>, raised_about_peer: bool) -> Self {
        ProtocolError {
            kind: kind.to_string(),
            detail: detail.into(),
            raised_about_peer,
        }
    }

    /// Human readable sentence for the well-known protocol error kinds.
    pub fn description(&self) -> String {
        let detail = &self.detail;
        match self.kind.as_str() {
            "timeout" => format!("A timeout was reached ({} ms)", detail_text(detail)),
            "wrong-protocol" => format!(
                "Sync protocol supports only versions from {}, but the peer uses {}",
                detail_text(&detail["supported"]),
                detail_text(&detail["used"])
            ),
            "wrong-subprotocol" => format!(
                "Only {} application subprotocols are supported, but the peer uses {}",
                detail_text(&detail["supported"]),
                detail_text(&detail["used"])
            ),
            "wrong-format" => format!("Wrong message format in {}", detail_text(detail)),
            "unknown-message" => format!("Unknown message `{}` type", detail_text(detail)),
            "missed-auth" => format!(
                "Start authentication before sending {}",
                detail_text(detail)
            ),
            "wrong-credentials" => "Wrong credentials".to_string(),
            "bruteforce" => "Too many wrong login attempts".to_string(),
            kind if detail.is_null() => format!("{kind} error"),
            kind => format!("{kind} error: {}", detail_text(detail)),
        }
    }
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Strings are shown without quotes, everything else as compact JSON.
fn detail_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// A failure unrelated to the sync protocol, e.g. a panic in an action handler.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub name: String,
    pub message: String,
    /// Trace lines, reported verbatim.
    pub stack: String,
}

impl RuntimeError {
    pub fn new(name: impl ToString, message: impl ToString) -> Self {
        RuntimeError {
            name: name.to_string(),
            message: message.to_string(),
            stack: String::new(),
        }
    }

    pub fn with_stack(mut self, stack: impl ToString) -> Self {
        self.stack = stack.to_string();
        self
    }
}

impl From<&anyhow::Error> for RuntimeError {
    /// Uses the outermost message as headline and the cause chain as stack.
    fn from(err: &anyhow::Error) -> Self {
        let stack = err
            .chain()
            .skip(1)
            .map(|cause| format!("caused by: {cause}"))
            .collect::<Vec<_>>()
            .join("\n");

        RuntimeError::new("Error", err).with_stack(stack)
    }
}

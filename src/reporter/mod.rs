//! Turns server lifecycle and error events into operator-facing log text.
//!
//! Every [`Event`] variant carries exactly the data its report needs, and
//! [`Reporter::format`] matches on it exhaustively. The result is a block of
//! newline-terminated lines:
//!
//! ```text
//! [info] Sync server is listening at 1970-01-01 00:00:00
//!         PID:         21384
//!         Environment: development
//!         Node ID:     server:H1f8LAyzl
//!         Subprotocol: 2.5.0
//!         Supports:    2.x || 1.x
//!         Listen:      ws://127.0.0.1:1337
//! [warn] Server was started in non-secure development mode
//!         Press Ctrl-C to shutdown server
//! ```

use anyhow::{Context, bail};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;
use tracing::Level;

use crate::client::{ClientIdentity, ClientView};
use crate::clock::{Clock, SystemClock};
use crate::error::{ProtocolError, RuntimeError};
use crate::server::{ListenDescriptor, ServerContext};

pub mod style;

use style::{Label, ReportWriter, humanize};

/// Target used when reports are handed to `tracing`.
pub const REPORT_TARGET: &str = "sync_reporter::report";

/// Something that happened on the server and should be reported.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    Listen,
    Connect {
        remote_address: &'a str,
    },
    Authenticated {
        client: &'a ClientView,
    },
    Unauthenticated {
        client: &'a ClientView,
    },
    Disconnect {
        client: &'a ClientView,
    },
    RuntimeError {
        error: &'a RuntimeError,
    },
    ClientError {
        client: &'a ClientView,
        error: &'a ProtocolError,
    },
    SyncError {
        client: &'a ClientView,
        error: &'a ProtocolError,
    },
    Destroy,
}

/// The discriminator of an [`Event`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Listen,
    Connect,
    Authenticated,
    Unauthenticated,
    Disconnect,
    RuntimeError,
    ClientError,
    SyncError,
    Destroy,
}

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::Listen,
        EventKind::Connect,
        EventKind::Authenticated,
        EventKind::Unauthenticated,
        EventKind::Disconnect,
        EventKind::RuntimeError,
        EventKind::ClientError,
        EventKind::SyncError,
        EventKind::Destroy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::Listen => "listen",
            EventKind::Connect => "connect",
            EventKind::Authenticated => "authenticated",
            EventKind::Unauthenticated => "unauthenticated",
            EventKind::Disconnect => "disconnect",
            EventKind::RuntimeError => "runtimeError",
            EventKind::ClientError => "clientError",
            EventKind::SyncError => "syncError",
            EventKind::Destroy => "destroy",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EventKind {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .with_context(|| format!("Unknown reporter event kind: '{}'", name))
    }
}

impl Event<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Listen => EventKind::Listen,
            Event::Connect { .. } => EventKind::Connect,
            Event::Authenticated { .. } => EventKind::Authenticated,
            Event::Unauthenticated { .. } => EventKind::Unauthenticated,
            Event::Disconnect { .. } => EventKind::Disconnect,
            Event::RuntimeError { .. } => EventKind::RuntimeError,
            Event::ClientError { .. } => EventKind::ClientError,
            Event::SyncError { .. } => EventKind::SyncError,
            Event::Destroy => EventKind::Destroy,
        }
    }

    /// Log level matching the headline label of the report.
    pub fn level(&self) -> Level {
        match self {
            Event::Unauthenticated { .. } | Event::ClientError { .. } => Level::WARN,
            Event::RuntimeError { .. } | Event::SyncError { .. } => Level::ERROR,
            Event::Listen
            | Event::Connect { .. }
            | Event::Authenticated { .. }
            | Event::Disconnect { .. }
            | Event::Destroy => Level::INFO,
        }
    }
}

/// Formats [`Event`]s. Holds no state besides its clock and color setting.
#[derive(Clone)]
pub struct Reporter {
    clock: Arc<dyn Clock>,
    colors: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// A reporter using the system clock and plain text output.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Reporter {
            clock: Arc::new(clock),
            colors: false,
        }
    }

    /// Enables ANSI colors. Has no effect unless built with `pretty_logs`.
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Renders `event` as a newline-terminated block of text.
    ///
    /// Fails if the event is inconsistent with the server or client state,
    /// e.g. reporting `Listen` before the listen descriptor is known.
    pub fn format(&self, event: &Event<'_>, server: &ServerContext) -> anyhow::Result<String> {
        let now = self.clock.now();
        let mut out = ReportWriter::new(self.colors);

        match *event {
            Event::Listen => {
                let Some(listen) = &server.listen else {
                    bail!(
                        "Cannot report 'listen' for node {}: the server is not listening yet",
                        server.node_id
                    );
                };

                out.headline(Label::Info, "Sync server is listening", now)
                    .params(&[
                        ("PID", server.pid.to_string()),
                        ("Environment", server.environment.to_string()),
                        ("Node ID", server.node_id.clone()),
                        ("Subprotocol", server.subprotocol.clone()),
                        ("Supports", server.supports.clone()),
                        ("Listen", listen.url()),
                    ]);

                if server.is_development() && !listen.is_secure() {
                    out.note(Label::Warn, "Server was started in non-secure development mode")
                        .line("Press Ctrl-C to shutdown server");
                } else if matches!(listen, ListenDescriptor::Plain { .. }) {
                    out.note(Label::Warn, "Server is listening without TLS")
                        .line("Traffic between clients and server is not encrypted");
                }
            }
            Event::Connect { remote_address } => {
                out.headline(Label::Info, "Client was connected", now)
                    .params(&[("IP address", remote_address.to_string())]);
            }
            Event::Authenticated { client } => {
                let Some(user_id) = client.user_id() else {
                    bail!(
                        "Cannot report 'authenticated' for connection {}: the client has no user",
                        client.connection_id
                    );
                };

                let mut params = vec![("User ID", user_id.to_string())];
                params.extend(handshake_params(client));
                params.push(("IP address", client.remote_address.clone()));

                out.headline(Label::Info, "User was authenticated", now)
                    .params(&params);
            }
            Event::Unauthenticated { client } => {
                let mut params = handshake_params(client);
                params.push(("IP address", client.remote_address.clone()));

                out.headline(Label::Warn, "Bad authentication", now)
                    .params(&params);
            }
            Event::Disconnect { client } => {
                let title = match client.identity {
                    ClientIdentity::Authenticated { .. } => "Client was disconnected",
                    ClientIdentity::Anonymous => "Unauthenticated client was disconnected",
                };

                out.headline(Label::Info, title, now)
                    .params(&identity_params(client));
            }
            Event::RuntimeError { error } => {
                // Extra message lines go below the headline so the timestamp stays on it
                let mut lines = error.message.lines();
                let first = lines.next().unwrap_or_default();

                out.headline(Label::Error, &format!("{}: {}", error.name, first), now);
                for line in lines {
                    out.line(line);
                }
                out.stack(&error.stack);
            }
            Event::ClientError { client, error } => {
                let mut params = identity_params(client);
                params.push(("Error kind", error.kind.clone()));

                out.headline(
                    Label::Warn,
                    &format!("Client error: {}", error.description()),
                    now,
                )
                .params(&params);
            }
            Event::SyncError { client, error } => {
                let title = if error.raised_about_peer {
                    format!("Sync error in client: {}", error.description())
                } else {
                    format!("Sync error: {}", error.description())
                };

                let mut params = identity_params(client);
                params.push(("Error kind", error.kind.clone()));

                out.headline(Label::Error, &title, now).params(&params);
            }
            Event::Destroy => {
                out.headline(Label::Info, "Shutting down sync server", now)
                    .params(&[("Uptime", humanize(now - server.started_at))]);
            }
        }

        Ok(out.finish())
    }

    /// Formats `event` and logs it via `tracing` under [`REPORT_TARGET`].
    pub fn emit(&self, event: &Event<'_>, server: &ServerContext) -> anyhow::Result<()> {
        tracing::debug!("Emitting report for event {}", event.kind());

        let report = self.format(event, server)?;
        let report = report.trim_end();

        match event.level() {
            Level::ERROR => tracing::error!(target: REPORT_TARGET, "{}", report),
            Level::WARN => tracing::warn!(target: REPORT_TARGET, "{}", report),
            _ => tracing::info!(target: REPORT_TARGET, "{}", report),
        }

        Ok(())
    }
}

/// `Node ID`, `Subprotocol` and `Sync protocol`, for whatever the peer has sent.
fn handshake_params(client: &ClientView) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(node_id) = &client.node_id {
        params.push(("Node ID", node_id.clone()));
    }
    if let Some(subprotocol) = &client.subprotocol {
        params.push(("Subprotocol", subprotocol.clone()));
    }
    if let Some(protocol) = &client.protocol {
        params.push(("Sync protocol", protocol.to_string()));
    }

    params
}

/// Identifies a client by user and node when authenticated, by connection otherwise.
fn identity_params(client: &ClientView) -> Vec<(&'static str, String)> {
    match &client.identity {
        ClientIdentity::Authenticated { user_id } => {
            let mut params = vec![("User ID", user_id.clone())];
            if let Some(node_id) = &client.node_id {
                params.push(("Node ID", node_id.clone()));
            }
            params
        }
        ClientIdentity::Anonymous => vec![
            ("Connection", client.connection_id.clone()),
            ("IP address", client.remote_address.clone()),
        ],
    }
}

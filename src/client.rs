//! Read-only view of a connected client.

use std::fmt::{Display, Formatter};

/// Sync protocol version negotiated with a peer, as `major.minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
}

impl ProtocolVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        ProtocolVersion { major, minor }
    }
}

impl Display for ProtocolVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Whether a client passed authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientIdentity {
    Authenticated { user_id: String },
    Anonymous,
}

/// The fields of a client connection that show up in reports.
///
/// Everything except the connection id and the remote address is only known
/// once the peer has sent its handshake, so those fields are optional.
#[derive(Debug, Clone)]
pub struct ClientView {
    pub connection_id: String,
    pub remote_address: String,
    pub node_id: Option<String>,
    pub subprotocol: Option<String>,
    pub protocol: Option<ProtocolVersion>,
    pub identity: ClientIdentity,
}

impl ClientView {
    /// A freshly accepted connection that has not sent anything yet.
    pub fn new(connection_id: impl ToString, remote_address: impl ToString) -> Self {
        ClientView {
            connection_id: connection_id.to_string(),
            remote_address: remote_address.to_string(),
            node_id: None,
            subprotocol: None,
            protocol: None,
            identity: ClientIdentity::Anonymous,
        }
    }

    /// Records the peer's handshake data.
    pub fn with_handshake(
        mut self,
        node_id: impl ToString,
        subprotocol: impl ToString,
        protocol: ProtocolVersion,
    ) -> Self {
        self.node_id = Some(node_id.to_string());
        self.subprotocol = Some(subprotocol.to_string());
        self.protocol = Some(protocol);
        self
    }

    pub fn authenticated_as(mut self, user_id: impl ToString) -> Self {
        self.identity = ClientIdentity::Authenticated {
            user_id: user_id.to_string(),
        };
        self
    }

    pub fn user_id(&self) -> Option<&str> {
        match &self.identity {
            ClientIdentity::Authenticated { user_id } => Some(user_id),
            ClientIdentity::Anonymous => None,
        }
    }
}

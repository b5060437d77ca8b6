//! UDP mesh adapter error types.

use meshbridge_domain::address::PhysicalAddress;
use meshbridge_domain::error::{GatewayError, TransportError};

/// Errors specific to the UDP mesh adapter.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// A configured socket address could not be parsed.
    #[error("invalid {field} address {value:?}")]
    InvalidAddress {
        /// Configuration field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },

    /// Binding the local socket failed.
    #[error("failed to bind mesh socket")]
    Bind(#[source] std::io::Error),

    /// Sending a datagram to the radio failed.
    #[error("failed to send datagram to radio")]
    Send(#[source] std::io::Error),

    /// Unicast to a node that was never added as a peer.
    #[error("node {0} is not a peer")]
    NotPeer(PhysicalAddress),

    /// The peer table is full.
    #[error("peer table is full ({capacity} peers)")]
    PeerTableFull {
        /// Maximum number of peers.
        capacity: usize,
    },
}

impl MeshError {
    /// Convert into a [`GatewayError`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> GatewayError {
        match self {
            Self::NotPeer(address) => TransportError::NotPeer(address).into(),
            Self::PeerTableFull { capacity } => TransportError::PeerTableFull { capacity }.into(),
            other => TransportError::Mesh(Box::new(other)).into(),
        }
    }
}

impl From<MeshError> for GatewayError {
    fn from(err: MeshError) -> Self {
        err.into_domain()
    }
}

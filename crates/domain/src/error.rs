//! Error taxonomy shared across the workspace.
//!
//! Each failure family has its own typed enum. [`GatewayError`] is the
//! umbrella used at port boundaries; the narrow errors convert into it via
//! `#[from]`.

use crate::address::PhysicalAddress;

/// Boxed error used for causes that come from outside the domain.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A mesh frame could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The frame is not exactly the fixed mesh frame size.
    #[error("mesh frame must be {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Fixed frame size.
        expected: usize,
        /// Size actually received.
        actual: usize,
    },
}

/// A bus topic or payload could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The topic does not have the `<base>/<class>/<id>/set` shape.
    #[error("unrecognized topic {0:?}")]
    Unrecognized(String),

    /// The payload is not a JSON object.
    #[error("payload is not a JSON object")]
    Malformed,

    /// A required numeric field is absent or not a number.
    #[error("missing or non-numeric field {0:?}")]
    MissingField(&'static str),

    /// A numeric field does not fit its wire type.
    #[error("field {0:?} is out of range")]
    OutOfRange(&'static str),
}

/// The device registry refused an insertion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A device with this physical address is already registered.
    #[error("device {0} is already registered")]
    AlreadyExists(PhysicalAddress),

    /// The registry holds as many devices as it can.
    #[error("registry is full ({capacity} devices)")]
    Full {
        /// Maximum number of devices.
        capacity: usize,
    },
}

/// An outbound transport operation failed.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The mesh transport reported a failure.
    #[error("mesh transport error")]
    Mesh(#[source] BoxError),

    /// The cloud bus client reported a failure.
    #[error("cloud bus error")]
    Bus(#[source] BoxError),

    /// Unicast to a node that is not in the mesh peer table.
    #[error("node {0} is not a mesh peer")]
    NotPeer(PhysicalAddress),

    /// The mesh peer table cannot hold another node.
    #[error("mesh peer table is full ({capacity} peers)")]
    PeerTableFull {
        /// Maximum number of peers.
        capacity: usize,
    },
}

/// A lookup found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of thing that was looked up (e.g. `"Device"`).
    pub entity: &'static str,
    /// Identifier that was looked up.
    pub id: String,
}

/// Umbrella error returned across port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Malformed mesh frame.
    #[error("decode error")]
    Decode(#[from] DecodeError),

    /// Malformed bus topic or payload.
    #[error("parse error")]
    Parse(#[from] ParseError),

    /// Registry insertion refused.
    #[error("registry error")]
    Registry(#[from] RegistryError),

    /// Outbound transport failure.
    #[error("transport error")]
    Transport(#[from] TransportError),

    /// Lookup found nothing.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Durable storage failure.
    #[error("storage error")]
    Storage(#[source] BoxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_size_mismatch() {
        let err = DecodeError::SizeMismatch {
            expected: 7,
            actual: 3,
        };
        assert_eq!(err.to_string(), "mesh frame must be 7 bytes, got 3");
    }

    #[test]
    fn should_display_registry_errors_with_context() {
        let addr: PhysicalAddress = "AA:BB:CC:DD:EE:01".parse().unwrap();
        assert_eq!(
            RegistryError::AlreadyExists(addr).to_string(),
            "device AA:BB:CC:DD:EE:01 is already registered"
        );
        assert_eq!(
            RegistryError::Full { capacity: 20 }.to_string(),
            "registry is full (20 devices)"
        );
    }

    #[test]
    fn should_convert_narrow_errors_into_gateway_error() {
        let err: GatewayError = RegistryError::Full { capacity: 1 }.into();
        assert!(matches!(err, GatewayError::Registry(RegistryError::Full { .. })));

        let err: GatewayError = ParseError::Malformed.into();
        assert!(matches!(err, GatewayError::Parse(ParseError::Malformed)));
    }

    #[test]
    fn should_expose_source_of_gateway_error() {
        let err: GatewayError = DecodeError::SizeMismatch {
            expected: 7,
            actual: 0,
        }
        .into();
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("7 bytes"));
    }
}

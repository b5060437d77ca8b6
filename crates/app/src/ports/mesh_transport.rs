//! Mesh transport port: unicast to nodes and peer table management.
//!
//! Receipt is not part of this trait: adapters push raw
//! [`MeshFrame`](meshbridge_domain::message::MeshFrame)s into the inbound
//! channel consumed by [`inbound::run`](crate::inbound::run).

use std::future::Future;
use std::sync::Arc;

use meshbridge_domain::address::PhysicalAddress;
use meshbridge_domain::codec::FRAME_LEN;
use meshbridge_domain::error::GatewayError;

/// Outbound side of the local device mesh.
pub trait MeshTransport {
    /// Send one frame to a node. Fire-and-forget: no acknowledgement is awaited.
    fn send(
        &self,
        address: PhysicalAddress,
        frame: [u8; FRAME_LEN],
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Add a node to the transport's peer table.
    fn add_peer(
        &self,
        address: PhysicalAddress,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Whether a node is already in the peer table.
    fn is_peer(&self, address: PhysicalAddress) -> impl Future<Output = bool> + Send;
}

impl<T: MeshTransport + Send + Sync> MeshTransport for Arc<T> {
    fn send(
        &self,
        address: PhysicalAddress,
        frame: [u8; FRAME_LEN],
    ) -> impl Future<Output = Result<(), GatewayError>> + Send {
        (**self).send(address, frame)
    }

    fn add_peer(
        &self,
        address: PhysicalAddress,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send {
        (**self).add_peer(address)
    }

    fn is_peer(&self, address: PhysicalAddress) -> impl Future<Output = bool> + Send {
        (**self).is_peer(address)
    }
}

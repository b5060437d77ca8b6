//! # meshbridge-adapter-mesh-udp
//!
//! Mesh adapter for a radio co-processor attached over UDP.
//!
//! The radio owns the actual short-range link. The gateway exchanges
//! [`datagram`]s with it: received frames are pushed into the inbound mesh
//! channel, outbound frames are unicast to peers.
//!
//! ## Responsibilities
//! - Implement the [`MeshTransport`] port (send, add peer, peer check)
//! - Keep the bounded peer table the radio enforces
//! - Forward received datagrams as [`MeshFrame`]s
//!
//! ## Dependency rule
//! Same as other adapters: depends on `meshbridge-app` and `meshbridge-domain`.

pub mod config;
pub mod datagram;
pub mod error;

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use meshbridge_app::ports::MeshTransport;
use meshbridge_domain::address::PhysicalAddress;
use meshbridge_domain::codec::FRAME_LEN;
use meshbridge_domain::error::GatewayError;
use meshbridge_domain::message::MeshFrame;

pub use self::config::MeshConfig;
pub use self::error::MeshError;

/// [`MeshTransport`] implementation talking to a radio over UDP.
pub struct UdpMesh {
    socket: Arc<UdpSocket>,
    radio: SocketAddr,
    max_peers: usize,
    peers: Mutex<BTreeSet<PhysicalAddress>>,
}

impl UdpMesh {
    /// Bind the local socket.
    ///
    /// # Errors
    ///
    /// - [`MeshError::InvalidAddress`] if `bind` or `radio` is not a socket address
    /// - [`MeshError::Bind`] if the socket cannot be bound
    pub async fn bind(config: &MeshConfig) -> Result<Self, MeshError> {
        let bind = parse_addr("bind", &config.bind)?;
        let radio = parse_addr("radio", &config.radio)?;

        let socket = UdpSocket::bind(bind).await.map_err(MeshError::Bind)?;
        tracing::info!(%bind, %radio, max_peers = config.max_peers, "mesh socket bound");

        Ok(Self {
            socket: Arc::new(socket),
            radio,
            max_peers: config.max_peers,
            peers: Mutex::new(BTreeSet::new()),
        })
    }

    /// Address the local socket is bound to.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Bind`] if the OS cannot report it.
    pub fn local_addr(&self) -> Result<SocketAddr, MeshError> {
        self.socket.local_addr().map_err(MeshError::Bind)
    }

    /// Current peer table, in address order.
    #[must_use]
    pub fn peers(&self) -> Vec<PhysicalAddress> {
        self.lock_peers().iter().copied().collect()
    }

    /// Spawn the receive loop forwarding radio datagrams to `inbound`.
    ///
    /// Datagrams from any host other than the radio, or too short to carry
    /// an address, are dropped. The task ends when `inbound` is closed.
    pub fn spawn_receiver(&self, inbound: mpsc::Sender<MeshFrame>) -> JoinHandle<()> {
        tokio::spawn(receive(Arc::clone(&self.socket), self.radio, inbound))
    }

    fn lock_peers(&self) -> std::sync::MutexGuard<'_, BTreeSet<PhysicalAddress>> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MeshTransport for UdpMesh {
    async fn send(
        &self,
        address: PhysicalAddress,
        frame: [u8; FRAME_LEN],
    ) -> Result<(), GatewayError> {
        if !self.lock_peers().contains(&address) {
            return Err(MeshError::NotPeer(address).into());
        }

        let datagram = datagram::encode(address, &frame);
        self.socket
            .send_to(&datagram, self.radio)
            .await
            .map_err(MeshError::Send)?;
        tracing::trace!(mac = %address, "frame sent to radio");
        Ok(())
    }

    async fn add_peer(&self, address: PhysicalAddress) -> Result<(), GatewayError> {
        let mut peers = self.lock_peers();
        if peers.contains(&address) {
            return Ok(());
        }
        if peers.len() >= self.max_peers {
            return Err(MeshError::PeerTableFull {
                capacity: self.max_peers,
            }
            .into());
        }
        peers.insert(address);
        tracing::debug!(mac = %address, "mesh peer added");
        Ok(())
    }

    async fn is_peer(&self, address: PhysicalAddress) -> bool {
        self.lock_peers().contains(&address)
    }
}

fn parse_addr(field: &'static str, value: &str) -> Result<SocketAddr, MeshError> {
    value.parse().map_err(|_| MeshError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}

async fn receive(socket: Arc<UdpSocket>, radio: SocketAddr, inbound: mpsc::Sender<MeshFrame>) {
    let mut buf = [0u8; datagram::MAX_DATAGRAM_LEN];
    loop {
        let (len, from) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(err) => {
                tracing::warn!(%err, "failed to receive from mesh socket");
                continue;
            }
        };

        if from != radio {
            tracing::warn!(%from, "dropping datagram from unexpected host");
            continue;
        }
        let Some(frame) = datagram::decode(&buf[..len]) else {
            tracing::warn!(len, "dropping datagram shorter than an address");
            continue;
        };

        if inbound.send(frame).await.is_err() {
            tracing::info!("mesh channel closed, stopping receiver");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use meshbridge_domain::error::TransportError;

    use super::*;

    fn addr(last: u8) -> PhysicalAddress {
        PhysicalAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, last])
    }

    async fn setup(max_peers: usize) -> (UdpMesh, UdpSocket) {
        let radio = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let config = MeshConfig {
            bind: "127.0.0.1:0".to_string(),
            radio: radio.local_addr().unwrap().to_string(),
            max_peers,
        };
        let mesh = UdpMesh::bind(&config).await.unwrap();
        (mesh, radio)
    }

    #[tokio::test]
    async fn should_reject_invalid_radio_address() {
        let config = MeshConfig {
            radio: "not-an-address".to_string(),
            ..MeshConfig::default()
        };
        let result = UdpMesh::bind(&config).await;
        assert!(matches!(
            result,
            Err(MeshError::InvalidAddress { field: "radio", .. })
        ));
    }

    #[tokio::test]
    async fn should_refuse_to_send_to_non_peer() {
        let (mesh, _radio) = setup(20).await;

        let result = mesh.send(addr(2), [2, 1, 1, 0, 0, 0, 0]).await;

        assert!(matches!(
            result,
            Err(GatewayError::Transport(TransportError::NotPeer(a))) if a == addr(2)
        ));
    }

    #[tokio::test]
    async fn should_send_prefixed_datagram_to_radio() {
        let (mesh, radio) = setup(20).await;
        mesh.add_peer(addr(2)).await.unwrap();

        mesh.send(addr(2), [2, 1, 1, 0, 0, 0, 0]).await.unwrap();

        let mut buf = [0u8; 64];
        let (len, _) = tokio::time::timeout(Duration::from_secs(2), radio.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            &buf[..len],
            &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x02, 2, 1, 1, 0, 0, 0, 0]
        );
    }

    #[tokio::test]
    async fn should_bound_peer_table() {
        let (mesh, _radio) = setup(2).await;
        mesh.add_peer(addr(1)).await.unwrap();
        mesh.add_peer(addr(2)).await.unwrap();
        mesh.add_peer(addr(2)).await.unwrap();

        let result = mesh.add_peer(addr(3)).await;

        assert!(matches!(
            result,
            Err(GatewayError::Transport(TransportError::PeerTableFull { capacity: 2 }))
        ));
        assert_eq!(mesh.peers(), vec![addr(1), addr(2)]);
        assert!(mesh.is_peer(addr(1)).await);
        assert!(!mesh.is_peer(addr(3)).await);
    }

    #[tokio::test]
    async fn should_forward_radio_datagrams_as_frames() {
        let (mesh, radio) = setup(20).await;
        let (tx, mut rx) = mpsc::channel(4);
        let handle = mesh.spawn_receiver(tx);
        let target = mesh.local_addr().unwrap();

        radio.send_to(&[1, 2], target).await.unwrap();
        radio
            .send_to(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x01, 0, 1, 1, 0xE8, 3, 0, 0], target)
            .await
            .unwrap();

        let frame = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(frame.source, addr(1));
        assert_eq!(frame.bytes, vec![0, 1, 1, 0xE8, 3, 0, 0]);
        handle.abort();
    }

    #[tokio::test]
    async fn should_ignore_datagrams_from_other_hosts() {
        let (mesh, radio) = setup(20).await;
        let stranger = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let (tx, mut rx) = mpsc::channel(4);
        let handle = mesh.spawn_receiver(tx);
        let target = mesh.local_addr().unwrap();

        stranger
            .send_to(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x09, 0, 9, 1, 0, 0, 0, 0], target)
            .await
            .unwrap();
        radio
            .send_to(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x01, 0, 1, 1, 0, 0, 0, 0], target)
            .await
            .unwrap();

        let frame = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(frame.source, addr(1));
        handle.abort();
    }
}

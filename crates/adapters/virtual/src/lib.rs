//! # meshbridge-adapter-virtual
//!
//! In-memory implementations of every port, for tests and demonstrations.
//!
//! | Adapter | Port | Behaviour |
//! |---------|------|-----------|
//! | [`VirtualMesh`] | `MeshTransport` | Records unicasts; simulated nodes speak through [`VirtualMesh::emit`] |
//! | [`VirtualBus`] | `CloudBus` | Records publishes; delivers injected messages on subscribed topics only |
//! | [`MemorySnapshotStore`] | `SnapshotStore` | Keeps the last snapshot in memory |
//!
//! ## Dependency rule
//!
//! Depends on `meshbridge-app` (port traits) and `meshbridge-domain` only.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use meshbridge_app::ports::{CloudBus, MeshTransport, SnapshotStore};
use meshbridge_domain::address::PhysicalAddress;
use meshbridge_domain::codec::{FRAME_LEN, encode_mesh_frame};
use meshbridge_domain::error::{GatewayError, TransportError};
use meshbridge_domain::message::{BusMessage, MeshFrame, MeshMessage};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn channel_closed() -> GatewayError {
    GatewayError::Transport(TransportError::Mesh("inbound channel closed".into()))
}

/// Simulated mesh: a peer table, a log of unicasts and a way for fake nodes
/// to send frames to the gateway.
pub struct VirtualMesh {
    inbound: mpsc::Sender<MeshFrame>,
    peers: Mutex<BTreeSet<PhysicalAddress>>,
    sent: Mutex<Vec<(PhysicalAddress, [u8; FRAME_LEN])>>,
}

impl VirtualMesh {
    /// Create a mesh delivering simulated frames to `inbound`.
    #[must_use]
    pub fn new(inbound: mpsc::Sender<MeshFrame>) -> Self {
        Self {
            inbound,
            peers: Mutex::default(),
            sent: Mutex::default(),
        }
    }

    /// Have the node at `source` send `message` to the gateway.
    ///
    /// # Errors
    ///
    /// Returns a mesh transport error if the inbound channel is closed.
    pub async fn emit(
        &self,
        source: PhysicalAddress,
        message: MeshMessage,
    ) -> Result<(), GatewayError> {
        self.emit_raw(source, encode_mesh_frame(&message).to_vec())
            .await
    }

    /// Deliver arbitrary bytes from `source`, well-formed or not.
    ///
    /// # Errors
    ///
    /// Returns a mesh transport error if the inbound channel is closed.
    pub async fn emit_raw(&self, source: PhysicalAddress, bytes: Vec<u8>) -> Result<(), GatewayError> {
        self.inbound
            .send(MeshFrame { source, bytes })
            .await
            .map_err(|_| channel_closed())
    }

    /// Every frame unicast so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<(PhysicalAddress, [u8; FRAME_LEN])> {
        lock(&self.sent).clone()
    }

    /// Current peer table, in address order.
    #[must_use]
    pub fn peers(&self) -> Vec<PhysicalAddress> {
        lock(&self.peers).iter().copied().collect()
    }
}

impl MeshTransport for VirtualMesh {
    async fn send(
        &self,
        address: PhysicalAddress,
        frame: [u8; FRAME_LEN],
    ) -> Result<(), GatewayError> {
        if !lock(&self.peers).contains(&address) {
            return Err(TransportError::NotPeer(address).into());
        }
        lock(&self.sent).push((address, frame));
        Ok(())
    }

    async fn add_peer(&self, address: PhysicalAddress) -> Result<(), GatewayError> {
        lock(&self.peers).insert(address);
        Ok(())
    }

    async fn is_peer(&self, address: PhysicalAddress) -> bool {
        lock(&self.peers).contains(&address)
    }
}

/// Simulated broker with a single client: the gateway.
pub struct VirtualBus {
    inbound: mpsc::Sender<BusMessage>,
    subscriptions: Mutex<BTreeSet<String>>,
    published: Mutex<Vec<BusMessage>>,
}

impl VirtualBus {
    /// Create a bus delivering injected messages to `inbound`.
    #[must_use]
    pub fn new(inbound: mpsc::Sender<BusMessage>) -> Self {
        Self {
            inbound,
            subscriptions: Mutex::default(),
            published: Mutex::default(),
        }
    }

    /// Publish `payload` on `topic` as another bus client would.
    ///
    /// Returns whether the gateway was subscribed and the message delivered.
    ///
    /// # Errors
    ///
    /// Returns a bus transport error if the inbound channel is closed.
    pub async fn inject(&self, topic: &str, payload: &str) -> Result<bool, GatewayError> {
        if !lock(&self.subscriptions).contains(topic) {
            return Ok(false);
        }
        self.inbound
            .send(BusMessage {
                topic: topic.to_string(),
                payload: payload.to_string(),
            })
            .await
            .map_err(|_| GatewayError::Transport(TransportError::Bus("inbound channel closed".into())))?;
        Ok(true)
    }

    /// Every message published so far, oldest first.
    #[must_use]
    pub fn published(&self) -> Vec<BusMessage> {
        lock(&self.published).clone()
    }

    /// Subscribed topics, in lexical order.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        lock(&self.subscriptions).iter().cloned().collect()
    }
}

impl CloudBus for VirtualBus {
    async fn publish(&self, topic: String, payload: String) -> Result<(), GatewayError> {
        lock(&self.published).push(BusMessage { topic, payload });
        Ok(())
    }

    async fn subscribe(&self, topic: String) -> Result<(), GatewayError> {
        lock(&self.subscriptions).insert(topic);
        Ok(())
    }
}

/// Snapshot store that lives as long as the process.
#[derive(Default)]
pub struct MemorySnapshotStore {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl MemorySnapshotStore {
    /// Start from previously saved bytes.
    #[must_use]
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes)),
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Option<Vec<u8>>, GatewayError> {
        Ok(lock(&self.bytes).clone())
    }

    async fn save(&self, bytes: Vec<u8>) -> Result<(), GatewayError> {
        *lock(&self.bytes) = Some(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use meshbridge_domain::device::DeviceClass;

    use super::*;

    fn addr(last: u8) -> PhysicalAddress {
        PhysicalAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, last])
    }

    #[tokio::test]
    async fn should_emit_encoded_frames() {
        let (tx, mut rx) = mpsc::channel(1);
        let mesh = VirtualMesh::new(tx);

        mesh.emit(
            addr(1),
            MeshMessage {
                device_class: DeviceClass::Button,
                logical_id: 1,
                command_code: 1,
                timestamp_ms: 1000,
            },
        )
        .await
        .unwrap();

        let frame = rx.recv().await.unwrap();
        assert_eq!(frame.source, addr(1));
        assert_eq!(frame.bytes, vec![0, 1, 1, 0xE8, 0x03, 0, 0]);
    }

    #[tokio::test]
    async fn should_only_send_to_peers() {
        let (tx, _rx) = mpsc::channel(1);
        let mesh = VirtualMesh::new(tx);
        let frame = [2, 1, 1, 0, 0, 0, 0];

        assert!(mesh.send(addr(2), frame).await.is_err());
        mesh.add_peer(addr(2)).await.unwrap();
        mesh.send(addr(2), frame).await.unwrap();

        assert!(mesh.is_peer(addr(2)).await);
        assert_eq!(mesh.sent(), vec![(addr(2), frame)]);
    }

    #[tokio::test]
    async fn should_fail_to_emit_once_gateway_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        let mesh = VirtualMesh::new(tx);
        drop(rx);

        assert!(mesh.emit_raw(addr(1), vec![1, 2, 3]).await.is_err());
    }

    #[tokio::test]
    async fn should_deliver_injected_messages_on_subscribed_topics_only() {
        let (tx, mut rx) = mpsc::channel(2);
        let bus = VirtualBus::new(tx);
        bus.subscribe("home/2/1/set".to_string()).await.unwrap();

        assert!(!bus.inject("home/2/9/set", "{}").await.unwrap());
        assert!(bus.inject("home/2/1/set", r#"{"command":1}"#).await.unwrap());

        let message = rx.recv().await.unwrap();
        assert_eq!(message.topic, "home/2/1/set");
        assert_eq!(message.payload, r#"{"command":1}"#);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_record_publishes() {
        let (tx, _rx) = mpsc::channel(1);
        let bus = VirtualBus::new(tx);

        bus.publish("home/0/1/event".to_string(), "{}".to_string())
            .await
            .unwrap();

        assert_eq!(
            bus.published(),
            vec![BusMessage {
                topic: "home/0/1/event".to_string(),
                payload: "{}".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn should_keep_last_saved_snapshot() {
        let store = MemorySnapshotStore::default();
        assert_eq!(store.load().await.unwrap(), None);

        store.save(vec![1]).await.unwrap();
        store.save(vec![2]).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(vec![2]));
        assert_eq!(
            MemorySnapshotStore::with_bytes(vec![9]).load().await.unwrap(),
            Some(vec![9])
        );
    }
}

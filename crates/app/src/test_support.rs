//! In-memory port doubles shared by the unit tests of this crate.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use meshbridge_domain::address::PhysicalAddress;
use meshbridge_domain::codec::FRAME_LEN;
use meshbridge_domain::error::{GatewayError, TransportError};

use crate::ports::{CloudBus, MeshTransport, SnapshotStore};

fn storage_failure() -> GatewayError {
    GatewayError::Storage("storage unavailable".into())
}

#[derive(Default)]
pub struct MemoryStore {
    bytes: Mutex<Option<Vec<u8>>>,
    saves: AtomicUsize,
    failing: bool,
}

impl MemoryStore {
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes)),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.bytes.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<Vec<u8>>, GatewayError> {
        if self.failing {
            return Err(storage_failure());
        }
        Ok(self.bytes.lock().unwrap().clone())
    }

    async fn save(&self, bytes: Vec<u8>) -> Result<(), GatewayError> {
        if self.failing {
            return Err(storage_failure());
        }
        *self.bytes.lock().unwrap() = Some(bytes);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMesh {
    pub sent: Mutex<Vec<(PhysicalAddress, [u8; FRAME_LEN])>>,
    pub peers: Mutex<HashSet<PhysicalAddress>>,
    pub add_peer_calls: AtomicUsize,
    pub fail_sends: AtomicBool,
}

impl RecordingMesh {
    pub fn sent(&self) -> Vec<(PhysicalAddress, [u8; FRAME_LEN])> {
        self.sent.lock().unwrap().clone()
    }

    pub fn has_peer(&self, address: PhysicalAddress) -> bool {
        self.peers.lock().unwrap().contains(&address)
    }
}

impl MeshTransport for RecordingMesh {
    async fn send(
        &self,
        address: PhysicalAddress,
        frame: [u8; FRAME_LEN],
    ) -> Result<(), GatewayError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::NotPeer(address).into());
        }
        self.sent.lock().unwrap().push((address, frame));
        Ok(())
    }

    async fn add_peer(&self, address: PhysicalAddress) -> Result<(), GatewayError> {
        self.add_peer_calls.fetch_add(1, Ordering::SeqCst);
        self.peers.lock().unwrap().insert(address);
        Ok(())
    }

    async fn is_peer(&self, address: PhysicalAddress) -> bool {
        self.has_peer(address)
    }
}

#[derive(Default)]
pub struct RecordingBus {
    pub published: Mutex<Vec<(String, String)>>,
    pub subscriptions: Mutex<Vec<String>>,
    pub fail_publishes: AtomicBool,
}

impl RecordingBus {
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().unwrap().clone()
    }
}

impl CloudBus for RecordingBus {
    async fn publish(&self, topic: String, payload: String) -> Result<(), GatewayError> {
        if self.fail_publishes.load(Ordering::SeqCst) {
            return Err(TransportError::Bus("broker unreachable".into()).into());
        }
        self.published.lock().unwrap().push((topic, payload));
        Ok(())
    }

    async fn subscribe(&self, topic: String) -> Result<(), GatewayError> {
        self.subscriptions.lock().unwrap().push(topic);
        Ok(())
    }
}

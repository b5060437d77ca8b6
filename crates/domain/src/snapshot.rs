//! Registry snapshot: the persisted form of the device table.

use serde::{Deserialize, Serialize};

use crate::device::DeviceIdentity;

/// Format version written by [`RegistrySnapshot::encode`].
pub const SNAPSHOT_VERSION: u32 = 1;

/// Full ordered sequence of registered devices, as persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Format version.
    pub version: u32,
    /// Devices in insertion order.
    pub devices: Vec<DeviceIdentity>,
}

/// A snapshot could not be converted to or from its stored bytes.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The bytes are not a valid snapshot document, or the snapshot could
    /// not be serialized.
    #[error("invalid snapshot document")]
    Json(#[from] serde_json::Error),

    /// The document was written by an incompatible version.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}

impl RegistrySnapshot {
    /// Wrap devices in a snapshot of the current version.
    #[must_use]
    pub fn new(devices: Vec<DeviceIdentity>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            devices,
        }
    }

    /// Serialize to bytes for the snapshot store.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse bytes read from the snapshot store.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the bytes are not a snapshot document
    /// or carry an unsupported version.
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_slice(bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }
}

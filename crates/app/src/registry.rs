//! Device registry: the authoritative, durable table of known devices.
//!
//! The table is append-only and bounded. A single async mutex guards both
//! the in-memory table and the persistence call, so concurrent lookups and
//! insertions from the mesh and bus paths are serialised.

use tokio::sync::Mutex;

use meshbridge_domain::address::PhysicalAddress;
use meshbridge_domain::device::{DeviceClass, DeviceIdentity};
use meshbridge_domain::error::RegistryError;
use meshbridge_domain::snapshot::RegistrySnapshot;

use crate::ports::SnapshotStore;

/// Default number of devices the registry holds.
pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded, persisted table of device identities.
pub struct DeviceRegistry<S> {
    store: S,
    capacity: usize,
    devices: Mutex<Vec<DeviceIdentity>>,
}

impl<S: SnapshotStore> DeviceRegistry<S> {
    /// Load the persisted snapshot from `store`.
    ///
    /// Never fails: a missing, unreadable or corrupt snapshot starts an empty
    /// table. Duplicate addresses in the snapshot are collapsed (first wins)
    /// and entries beyond `capacity` are dropped.
    pub async fn initialize(store: S, capacity: usize) -> Self {
        let loaded = match store.load().await {
            Ok(Some(bytes)) => match RegistrySnapshot::decode(&bytes) {
                Ok(snapshot) => snapshot.devices,
                Err(err) => {
                    tracing::warn!(%err, "stored registry is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                tracing::info!("no stored registry, starting empty");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(%err, "failed to read stored registry, starting empty");
                Vec::new()
            }
        };

        let devices = sanitize(loaded, capacity);
        tracing::info!(count = devices.len(), capacity, "device registry loaded");

        Self {
            store,
            capacity,
            devices: Mutex::new(devices),
        }
    }

    /// Look up a device by physical address.
    pub async fn find_by_address(&self, address: PhysicalAddress) -> Option<DeviceIdentity> {
        let devices = self.devices.lock().await;
        devices
            .iter()
            .find(|d| d.physical_address == address)
            .copied()
    }

    /// Look up a device by `(class, id)`.
    ///
    /// The registry does not enforce uniqueness of this pair; the first entry
    /// in insertion order wins.
    pub async fn find_by_class_and_id(
        &self,
        device_class: DeviceClass,
        logical_id: u8,
    ) -> Option<DeviceIdentity> {
        let devices = self.devices.lock().await;
        devices
            .iter()
            .find(|d| d.matches(device_class, logical_id))
            .copied()
    }

    /// Insert a new device and persist the whole table.
    ///
    /// A persistence failure is logged and does **not** undo the insertion:
    /// the in-memory table stays authoritative for the rest of the process.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::AlreadyExists`] if the address is already registered
    /// - [`RegistryError::Full`] if the table is at capacity
    #[tracing::instrument(skip(self), fields(mac = %identity.physical_address))]
    pub async fn add(&self, identity: DeviceIdentity) -> Result<(), RegistryError> {
        let mut devices = self.devices.lock().await;

        if devices
            .iter()
            .any(|d| d.physical_address == identity.physical_address)
        {
            return Err(RegistryError::AlreadyExists(identity.physical_address));
        }
        if devices.len() >= self.capacity {
            return Err(RegistryError::Full {
                capacity: self.capacity,
            });
        }

        devices.push(identity);

        match RegistrySnapshot::new(devices.clone()).encode() {
            Ok(bytes) => {
                if let Err(err) = self.store.save(bytes).await {
                    tracing::error!(%err, "failed to persist registry, entry kept in memory only");
                }
            }
            Err(err) => {
                tracing::error!(%err, "failed to encode registry, stored snapshot left untouched");
            }
        }

        Ok(())
    }

    /// All devices in insertion order.
    pub async fn devices(&self) -> Vec<DeviceIdentity> {
        self.devices.lock().await.clone()
    }

    /// Number of registered devices.
    pub async fn len(&self) -> usize {
        self.devices.lock().await.len()
    }

    /// Whether no device is registered.
    pub async fn is_empty(&self) -> bool {
        self.devices.lock().await.is_empty()
    }

    /// Maximum number of devices.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn sanitize(loaded: Vec<DeviceIdentity>, capacity: usize) -> Vec<DeviceIdentity> {
    let mut devices: Vec<DeviceIdentity> = Vec::with_capacity(loaded.len().min(capacity));
    for identity in loaded {
        if devices
            .iter()
            .any(|d| d.physical_address == identity.physical_address)
        {
            tracing::warn!(mac = %identity.physical_address, "duplicate address in stored registry, skipped");
            continue;
        }
        if devices.len() >= capacity {
            tracing::warn!(mac = %identity.physical_address, capacity, "stored registry exceeds capacity, entry skipped");
            continue;
        }
        devices.push(identity);
    }
    devices
}

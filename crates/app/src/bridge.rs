//! Bridge orchestrator.
//!
//! Routes decoded mesh events to the cloud bus and bus commands to mesh
//! nodes, auto-provisioning unseen senders into the [`DeviceRegistry`].
//!
//! Per physical address the bridge knows two states: *unknown* and
//! *provisioned*. The first event from an unknown address provisions it;
//! later events are published under the identity recorded at that moment.

use meshbridge_domain::address::PhysicalAddress;
use meshbridge_domain::codec::{
    TopicScheme, decode_command_payload, decode_mesh_frame, encode_event_payload,
    encode_mesh_frame,
};
use meshbridge_domain::device::DeviceIdentity;
use meshbridge_domain::error::GatewayError;
use meshbridge_domain::message::{BusCommand, MeshEvent};

use crate::ports::{CloudBus, MeshTransport, SnapshotStore};
use crate::registry::DeviceRegistry;
use crate::stats::{BridgeStats, StatsSnapshot};

/// Why an inbound message was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Mesh frame of the wrong size.
    MalformedFrame,
    /// Unknown sender that could not be added to the registry.
    RegistryRejected,
    /// Bus topic outside the command topic layout.
    UnrecognizedTopic,
    /// Bus command for a `(class, id)` that is not registered.
    UnknownTarget,
    /// Bus command payload without a usable command code.
    InvalidPayload,
}

/// Outcome of handling one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Handed to the outbound transport.
    Forwarded,
    /// Accepted, but the outbound transport reported a failure.
    Undelivered,
    /// Discarded before reaching the outbound transport.
    Dropped(DropReason),
}

/// Connects the mesh transport, the cloud bus and the device registry.
///
/// Every handler takes `&self` and may be called concurrently; the registry
/// lock is the only synchronisation point.
pub struct Bridge<M, B, S> {
    registry: DeviceRegistry<S>,
    mesh: M,
    bus: B,
    topics: TopicScheme,
    stats: BridgeStats,
}

impl<M, B, S> Bridge<M, B, S>
where
    M: MeshTransport + Send + Sync,
    B: CloudBus + Send + Sync,
    S: SnapshotStore + Send + Sync,
{
    /// Create a bridge over an initialised registry.
    pub fn new(registry: DeviceRegistry<S>, mesh: M, bus: B, topics: TopicScheme) -> Self {
        Self {
            registry,
            mesh,
            bus,
            topics,
            stats: BridgeStats::default(),
        }
    }

    /// Decode a raw mesh frame and handle it as a mesh event.
    ///
    /// A frame of the wrong size is dropped without touching the registry.
    pub async fn on_mesh_frame(&self, source: PhysicalAddress, raw: &[u8]) -> Disposition {
        self.stats.frame_received();
        match decode_mesh_frame(raw, source) {
            Ok(event) => self.on_mesh_event(event).await,
            Err(err) => {
                self.stats.decode_failed();
                tracing::warn!(mac = %source, %err, "dropping malformed mesh frame");
                Disposition::Dropped(DropReason::MalformedFrame)
            }
        }
    }

    /// Publish a mesh event on the bus, provisioning the sender first if it
    /// is unknown.
    ///
    /// The event topic is built from the **registered** identity, not from
    /// the class and id carried by this particular frame.
    #[tracing::instrument(skip(self, event), fields(mac = %event.physical_address))]
    pub async fn on_mesh_event(&self, event: MeshEvent) -> Disposition {
        let identity = match self.registry.find_by_address(event.physical_address).await {
            Some(identity) => identity,
            None => match self.provision(event.identity()).await {
                Some(identity) => identity,
                None => return Disposition::Dropped(DropReason::RegistryRejected),
            },
        };

        let topic = self
            .topics
            .event_topic(identity.device_class, identity.logical_id);
        let payload = encode_event_payload(
            event.physical_address,
            event.command_code,
            event.timestamp_ms,
        );

        match self.bus.publish(topic.clone(), payload).await {
            Ok(()) => {
                self.stats.event_published();
                tracing::debug!(%topic, command = event.command_code, "event published");
                Disposition::Forwarded
            }
            Err(err) => {
                self.stats.publish_failed();
                tracing::warn!(%topic, %err, "failed to publish event");
                Disposition::Undelivered
            }
        }
    }

    /// Forward a bus command to the registered node addressed by `topic`.
    ///
    /// The topic is checked first, then the registry, then the payload.
    #[tracing::instrument(skip(self, payload))]
    pub async fn on_bus_command(&self, topic: &str, payload: &str) -> Disposition {
        self.stats.command_received();

        let (device_class, logical_id) = match self.topics.parse_command_topic(topic) {
            Ok(target) => target,
            Err(err) => {
                self.stats.command_dropped();
                tracing::warn!(%err, "dropping bus message");
                return Disposition::Dropped(DropReason::UnrecognizedTopic);
            }
        };

        let Some(target) = self
            .registry
            .find_by_class_and_id(device_class, logical_id)
            .await
        else {
            self.stats.command_dropped();
            tracing::warn!(class = %device_class, id = logical_id, "dropping command for unregistered device");
            return Disposition::Dropped(DropReason::UnknownTarget);
        };

        let command_code = match decode_command_payload(payload) {
            Ok(code) => code,
            Err(err) => {
                self.stats.command_dropped();
                tracing::warn!(%err, "dropping command with invalid payload");
                return Disposition::Dropped(DropReason::InvalidPayload);
            }
        };

        let command = BusCommand {
            device_class: target.device_class,
            logical_id: target.logical_id,
            command_code,
        };
        let frame = encode_mesh_frame(&command.to_message());

        match self.mesh.send(target.physical_address, frame).await {
            Ok(()) => {
                self.stats.command_sent();
                tracing::debug!(mac = %target.physical_address, command = command_code, "command sent");
                Disposition::Forwarded
            }
            Err(err) => {
                self.stats.send_failed();
                tracing::warn!(mac = %target.physical_address, %err, "failed to send command");
                Disposition::Undelivered
            }
        }
    }

    /// Register a device explicitly, without waiting for it to speak first.
    ///
    /// Controllable devices are peered and subscribed the same way as on
    /// auto-provisioning. Nothing is published.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Registry`] if the address is already
    /// registered or the registry is full.
    #[tracing::instrument(skip(self), fields(mac = %identity.physical_address))]
    pub async fn register(&self, identity: DeviceIdentity) -> Result<(), GatewayError> {
        self.registry.add(identity).await?;
        self.stats.device_provisioned();
        tracing::info!(class = %identity.device_class, id = identity.logical_id, "device registered");
        self.attach(identity).await;
        Ok(())
    }

    /// Re-peer and re-subscribe every persisted controllable device.
    ///
    /// Call once at startup, after the registry is loaded. Returns the number
    /// of devices attached.
    #[tracing::instrument(skip(self))]
    pub async fn restore(&self) -> usize {
        let mut restored = 0;
        for identity in self.registry.devices().await {
            if identity.device_class.is_controllable() {
                self.attach(identity).await;
                restored += 1;
            }
        }
        tracing::info!(restored, "controllable devices restored");
        restored
    }

    /// The device registry.
    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry<S> {
        &self.registry
    }

    /// The topic layout in use.
    #[must_use]
    pub fn topics(&self) -> &TopicScheme {
        &self.topics
    }

    /// Current counter values.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    async fn provision(&self, identity: DeviceIdentity) -> Option<DeviceIdentity> {
        if let Err(err) = self.registry.add(identity).await {
            self.stats.provisioning_failed();
            tracing::warn!(%err, "cannot provision device, dropping event");
            return None;
        }

        self.stats.device_provisioned();
        tracing::info!(class = %identity.device_class, id = identity.logical_id, "device provisioned");
        self.attach(identity).await;
        Some(identity)
    }

    /// Make a controllable device reachable: mesh peer plus command
    /// subscription. Best-effort.
    async fn attach(&self, identity: DeviceIdentity) {
        if !identity.device_class.is_controllable() {
            return;
        }

        let address = identity.physical_address;
        if !self.mesh.is_peer(address).await
            && let Err(err) = self.mesh.add_peer(address).await
        {
            tracing::warn!(mac = %address, %err, "failed to add mesh peer");
        }

        let topic = self
            .topics
            .command_topic(identity.device_class, identity.logical_id);
        if let Err(err) = self.bus.subscribe(topic.clone()).await {
            tracing::warn!(%topic, %err, "failed to subscribe to command topic");
        }
    }
}

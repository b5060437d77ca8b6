//! Messages flowing through the gateway, in raw and decoded form.

use crate::address::PhysicalAddress;
use crate::device::{DeviceClass, DeviceIdentity};

/// Well-known command codes sent by mesh nodes.
pub mod command {
    /// A button node was pressed.
    pub const BUTTON_PRESSED: u8 = 1;
    /// A node announces itself after boot.
    pub const PRESENCE: u8 = 2;
}

/// Contents of a mesh frame, without addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshMessage {
    /// Class of the sending (or target) node.
    pub device_class: DeviceClass,
    /// Logical id of the sending (or target) node.
    pub logical_id: u8,
    /// Opaque command value, meaning defined per class.
    pub command_code: u8,
    /// Milliseconds on the sender's clock; zero for gateway-originated frames.
    pub timestamp_ms: u32,
}

/// A decoded inbound mesh frame.
///
/// `physical_address` comes from the transport's source metadata, never
/// from the frame body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshEvent {
    /// Address the frame was received from.
    pub physical_address: PhysicalAddress,
    /// Class claimed by the sender.
    pub device_class: DeviceClass,
    /// Logical id claimed by the sender.
    pub logical_id: u8,
    /// Opaque command value.
    pub command_code: u8,
    /// Sender-supplied timestamp in milliseconds.
    pub timestamp_ms: u32,
}

impl MeshEvent {
    /// Attach a source address to decoded frame contents.
    #[must_use]
    pub const fn new(physical_address: PhysicalAddress, message: MeshMessage) -> Self {
        Self {
            physical_address,
            device_class: message.device_class,
            logical_id: message.logical_id,
            command_code: message.command_code,
            timestamp_ms: message.timestamp_ms,
        }
    }

    /// Frame contents of this event.
    #[must_use]
    pub const fn message(&self) -> MeshMessage {
        MeshMessage {
            device_class: self.device_class,
            logical_id: self.logical_id,
            command_code: self.command_code,
            timestamp_ms: self.timestamp_ms,
        }
    }

    /// Identity a previously unseen sender is provisioned with.
    #[must_use]
    pub const fn identity(&self) -> DeviceIdentity {
        DeviceIdentity::new(self.physical_address, self.device_class, self.logical_id)
    }
}

/// A decoded inbound bus command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusCommand {
    /// Target class, from the topic.
    pub device_class: DeviceClass,
    /// Target logical id, from the topic.
    pub logical_id: u8,
    /// Command value, from the payload.
    pub command_code: u8,
}

impl BusCommand {
    /// Frame contents to unicast to the target node.
    #[must_use]
    pub const fn to_message(&self) -> MeshMessage {
        MeshMessage {
            device_class: self.device_class,
            logical_id: self.logical_id,
            command_code: self.command_code,
            timestamp_ms: 0,
        }
    }
}

/// A raw frame as delivered by the mesh transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshFrame {
    /// Sender address from the transport metadata.
    pub source: PhysicalAddress,
    /// Frame bytes, not yet size-checked.
    pub bytes: Vec<u8>,
}

/// A raw message as delivered by the cloud bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    /// Topic the message arrived on.
    pub topic: String,
    /// UTF-8 payload.
    pub payload: String,
}

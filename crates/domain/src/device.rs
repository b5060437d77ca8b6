//! Device identity: the mapping from a physical node to its logical name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::PhysicalAddress;

/// Category of a mesh node.
///
/// The wire representation is the numeric code shown on each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DeviceClass {
    /// Push button (code 0).
    Button,
    /// Motion / presence sensor (code 1).
    MotionSensor,
    /// Switchable relay (code 2).
    Relay,
    /// Sentinel for nodes of an unrecognised class (code 255).
    Unknown,
}

impl DeviceClass {
    /// Numeric code used on the wire and in topics.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Button => 0,
            Self::MotionSensor => 1,
            Self::Relay => 2,
            Self::Unknown => 255,
        }
    }

    /// Lenient conversion: any unrecognised code maps to [`Self::Unknown`].
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Button,
            1 => Self::MotionSensor,
            2 => Self::Relay,
            _ => Self::Unknown,
        }
    }

    /// Whether devices of this class accept commands from the bus.
    #[must_use]
    pub const fn is_controllable(self) -> bool {
        matches!(self, Self::Relay)
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Button => "button",
            Self::MotionSensor => "motion_sensor",
            Self::Relay => "relay",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl From<DeviceClass> for u8 {
    fn from(class: DeviceClass) -> Self {
        class.code()
    }
}

/// The code is not one of the recognised device class codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown device class code {0}")]
pub struct UnknownClassCode(pub u8);

impl TryFrom<u8> for DeviceClass {
    type Error = UnknownClassCode;

    /// Strict conversion: only the four defined codes are accepted.
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match Self::from_code(code) {
            Self::Unknown if code != Self::Unknown.code() => Err(UnknownClassCode(code)),
            class => Ok(class),
        }
    }
}

/// One physical node known to the gateway.
///
/// `physical_address` is the primary key. `logical_id` is supplied by whoever
/// registers the device and is only unique within a class by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Hardware address of the node.
    #[serde(rename = "mac")]
    pub physical_address: PhysicalAddress,
    /// Category of the node.
    #[serde(rename = "class")]
    pub device_class: DeviceClass,
    /// Logical id within the class.
    #[serde(rename = "id")]
    pub logical_id: u8,
}

impl DeviceIdentity {
    /// Create a new identity.
    #[must_use]
    pub const fn new(
        physical_address: PhysicalAddress,
        device_class: DeviceClass,
        logical_id: u8,
    ) -> Self {
        Self {
            physical_address,
            device_class,
            logical_id,
        }
    }

    /// Whether this identity answers to the given `(class, id)` pair.
    #[must_use]
    pub fn matches(&self, device_class: DeviceClass, logical_id: u8) -> bool {
        self.device_class == device_class && self.logical_id == logical_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_codes_both_ways() {
        for class in [
            DeviceClass::Button,
            DeviceClass::MotionSensor,
            DeviceClass::Relay,
            DeviceClass::Unknown,
        ] {
            assert_eq!(DeviceClass::from_code(class.code()), class);
            assert_eq!(DeviceClass::try_from(class.code()), Ok(class));
        }
    }

    #[test]
    fn should_map_unrecognised_code_to_unknown_leniently() {
        assert_eq!(DeviceClass::from_code(7), DeviceClass::Unknown);
    }

    #[test]
    fn should_reject_unrecognised_code_strictly() {
        assert_eq!(DeviceClass::try_from(7), Err(UnknownClassCode(7)));
    }

    #[test]
    fn should_only_treat_relay_as_controllable() {
        assert!(DeviceClass::Relay.is_controllable());
        assert!(!DeviceClass::Button.is_controllable());
        assert!(!DeviceClass::MotionSensor.is_controllable());
        assert!(!DeviceClass::Unknown.is_controllable());
    }

    #[test]
    fn should_serialize_identity_with_short_field_names() {
        let identity = DeviceIdentity::new(
            "AA:BB:CC:DD:EE:02".parse().unwrap(),
            DeviceClass::Relay,
            1,
        );
        let json = serde_json::to_value(identity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"mac": "AA:BB:CC:DD:EE:02", "class": 2, "id": 1})
        );
        let back: DeviceIdentity = serde_json::from_value(json).unwrap();
        assert_eq!(back, identity);
    }

    #[test]
    fn should_reject_identity_with_unknown_class_code() {
        let json = serde_json::json!({"mac": "AA:BB:CC:DD:EE:02", "class": 9, "id": 1});
        assert!(serde_json::from_value::<DeviceIdentity>(json).is_err());
    }

    #[test]
    fn should_match_on_class_and_id() {
        let identity = DeviceIdentity::new(PhysicalAddress::default(), DeviceClass::Button, 3);
        assert!(identity.matches(DeviceClass::Button, 3));
        assert!(!identity.matches(DeviceClass::Button, 4));
        assert!(!identity.matches(DeviceClass::Relay, 3));
    }
}

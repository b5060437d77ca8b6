//! Physical (hardware) address of a mesh node.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of bytes in a physical address.
pub const ADDRESS_LEN: usize = 6;

/// Stable 6-byte hardware address of a mesh node.
///
/// Displays as upper-case colon-separated hex (`"AA:BB:CC:DD:EE:01"`) and
/// serializes as that string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PhysicalAddress([u8; ADDRESS_LEN]);

impl PhysicalAddress {
    /// Wrap raw address bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Build an address from the first six bytes of `bytes`.
    ///
    /// Returns `None` when the slice is shorter than six bytes.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let head = bytes.get(..ADDRESS_LEN)?;
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(head);
        Some(Self(out))
    }

    /// Access the raw bytes.
    #[must_use]
    pub const fn octets(&self) -> [u8; ADDRESS_LEN] {
        self.0
    }
}

impl From<[u8; ADDRESS_LEN]> for PhysicalAddress {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// The text is not a six-octet hex address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid physical address {0:?}")]
pub struct AddressParseError(String);

impl FromStr for PhysicalAddress {
    type Err = AddressParseError;

    /// Parse `AA:BB:CC:DD:EE:FF` or `aa-bb-cc-dd-ee-ff`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressParseError(s.to_string());

        let mut out = [0u8; ADDRESS_LEN];
        let mut parts = s.split([':', '-']);
        for slot in &mut out {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *slot = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(out))
    }
}

impl Serialize for PhysicalAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PhysicalAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

//! Fixed-size mesh frame.
//!
//! | Offset | Field | Type |
//! |--------|-------|------|
//! | 0 | Device class | u8 |
//! | 1 | Logical id | u8 |
//! | 2 | Command code | u8 |
//! | 3–6 | Timestamp (ms) | u32 LE |
//!
//! The transport hands over exactly one frame per delivery, so any length
//! other than [`FRAME_LEN`] is rejected outright.

use crate::address::PhysicalAddress;
use crate::device::DeviceClass;
use crate::error::DecodeError;
use crate::message::{MeshEvent, MeshMessage};

/// Size of every mesh frame in bytes.
pub const FRAME_LEN: usize = 7;

/// Decode a raw frame received from `source`.
///
/// Unrecognised class codes decode to [`DeviceClass::Unknown`].
///
/// # Errors
///
/// Returns [`DecodeError::SizeMismatch`] when `raw` is not exactly
/// [`FRAME_LEN`] bytes.
pub fn decode_mesh_frame(raw: &[u8], source: PhysicalAddress) -> Result<MeshEvent, DecodeError> {
    let Ok(bytes) = <[u8; FRAME_LEN]>::try_from(raw) else {
        return Err(DecodeError::SizeMismatch {
            expected: FRAME_LEN,
            actual: raw.len(),
        });
    };

    let message = MeshMessage {
        device_class: DeviceClass::from_code(bytes[0]),
        logical_id: bytes[1],
        command_code: bytes[2],
        timestamp_ms: u32::from_le_bytes([bytes[3], bytes[4], bytes[5], bytes[6]]),
    };

    Ok(MeshEvent::new(source, message))
}

/// Encode frame contents into the fixed binary layout.
#[must_use]
pub fn encode_mesh_frame(message: &MeshMessage) -> [u8; FRAME_LEN] {
    let ts = message.timestamp_ms.to_le_bytes();
    [
        message.device_class.code(),
        message.logical_id,
        message.command_code,
        ts[0],
        ts[1],
        ts[2],
        ts[3],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: PhysicalAddress = PhysicalAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x01]);

    #[test]
    fn should_decode_button_press() {
        // class 0, id 1, command 1, timestamp 1000 (0x03E8) LE
        let raw = [0x00, 0x01, 0x01, 0xE8, 0x03, 0x00, 0x00];

        let event = decode_mesh_frame(&raw, SOURCE).unwrap();
        assert_eq!(event.physical_address, SOURCE);
        assert_eq!(event.device_class, DeviceClass::Button);
        assert_eq!(event.logical_id, 1);
        assert_eq!(event.command_code, 1);
        assert_eq!(event.timestamp_ms, 1000);
    }

    #[test]
    fn should_encode_relay_command() {
        let message = MeshMessage {
            device_class: DeviceClass::Relay,
            logical_id: 1,
            command_code: 1,
            timestamp_ms: 0,
        };
        assert_eq!(encode_mesh_frame(&message), [2, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn should_preserve_fields_through_encode_and_decode() {
        let message = MeshMessage {
            device_class: DeviceClass::MotionSensor,
            logical_id: 200,
            command_code: 255,
            timestamp_ms: u32::MAX - 1,
        };
        let event = decode_mesh_frame(&encode_mesh_frame(&message), SOURCE).unwrap();
        assert_eq!(event.message(), message);
    }

    #[test]
    fn should_reject_short_and_long_frames() {
        for len in [0, 1, FRAME_LEN - 1, FRAME_LEN + 1, 250] {
            let raw = vec![0u8; len];
            let err = decode_mesh_frame(&raw, SOURCE).unwrap_err();
            assert_eq!(
                err,
                DecodeError::SizeMismatch {
                    expected: FRAME_LEN,
                    actual: len
                }
            );
        }
    }

    #[test]
    fn should_decode_unrecognised_class_as_unknown() {
        let raw = [0x09, 0x01, 0x02, 0, 0, 0, 0];
        let event = decode_mesh_frame(&raw, SOURCE).unwrap();
        assert_eq!(event.device_class, DeviceClass::Unknown);
    }
}

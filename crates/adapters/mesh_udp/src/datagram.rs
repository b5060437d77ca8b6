//! Radio datagram layout: `[6-byte address][frame bytes]`.
//!
//! Inbound, the address is the node that sent the frame. Outbound, it is the
//! node the radio should unicast to. The frame itself is not checked here;
//! the codec rejects wrong sizes.

use meshbridge_domain::address::{ADDRESS_LEN, PhysicalAddress};
use meshbridge_domain::message::MeshFrame;

/// Largest datagram the receiver reads; ESP-NOW payloads cap at 250 bytes.
pub const MAX_DATAGRAM_LEN: usize = ADDRESS_LEN + 250;

/// Build an outbound datagram.
#[must_use]
pub fn encode(destination: PhysicalAddress, frame: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(ADDRESS_LEN + frame.len());
    buf.extend_from_slice(&destination.octets());
    buf.extend_from_slice(frame);
    buf
}

/// Split an inbound datagram into source address and raw frame.
///
/// Returns `None` when the datagram is too short to carry an address.
#[must_use]
pub fn decode(datagram: &[u8]) -> Option<MeshFrame> {
    let (address, frame) = datagram.split_at_checked(ADDRESS_LEN)?;
    Some(MeshFrame {
        source: PhysicalAddress::from_slice(address)?,
        bytes: frame.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_prefix_frame_with_destination() {
        let address = PhysicalAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x02]);
        let datagram = encode(address, &[2, 1, 1, 0, 0, 0, 0]);
        assert_eq!(
            datagram,
            vec![0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x02, 2, 1, 1, 0, 0, 0, 0]
        );
    }

    #[test]
    fn should_split_source_and_frame() {
        let frame = decode(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x01, 0, 1, 1]).unwrap();
        assert_eq!(
            frame.source,
            PhysicalAddress::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x01])
        );
        assert_eq!(frame.bytes, vec![0, 1, 1]);
    }

    #[test]
    fn should_keep_empty_frame_after_address() {
        let frame = decode(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert!(frame.bytes.is_empty());
    }

    #[test]
    fn should_reject_datagram_shorter_than_address() {
        assert!(decode(&[1, 2, 3]).is_none());
        assert!(decode(&[]).is_none());
    }
}

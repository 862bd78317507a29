//! Sender side of the framing
//!
//! Writes access units in the wire format expected by
//! [`PendingPacket`](crate::packet::PendingPacket).

use alloc::vec::Vec;

use crate::packet::{PacketError, HEADER_LEN};

/// Encode the length prefix for a body of `len` bytes
pub fn encode_header(len: u32) -> [u8; HEADER_LEN] {
    len.to_le_bytes()
}

fn body_len(body: &[u8]) -> Result<u32, PacketError> {
    u32::try_from(body.len()).map_err(|_| PacketError::Oversized {
        declared: u32::MAX,
        max: u32::MAX,
    })
}

/// Encode one access unit (length prefix + body) into a byte buffer
///
/// Returns the number of bytes written
pub fn encode_access_unit(body: &[u8], buffer: &mut [u8]) -> Result<usize, PacketError> {
    let len = body_len(body)?;
    let packet_len = HEADER_LEN + body.len();
    if buffer.len() < packet_len {
        return Err(PacketError::BufferTooSmall);
    }

    buffer[..HEADER_LEN].copy_from_slice(&encode_header(len));
    buffer[HEADER_LEN..packet_len].copy_from_slice(body);

    Ok(packet_len)
}

/// Encode one access unit into a newly allocated Vec
pub fn encode_to_vec(body: &[u8]) -> Result<Vec<u8>, PacketError> {
    let len = body_len(body)?;
    let mut out = Vec::new();
    out.try_reserve_exact(HEADER_LEN + body.len())
        .map_err(|_| PacketError::OutOfMemory { requested: len })?;
    out.extend_from_slice(&encode_header(len));
    out.extend_from_slice(body);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_header_little_endian() {
        assert_eq!(encode_header(5), [0x05, 0x00, 0x00, 0x00]);
        assert_eq!(encode_header(0x0102_0304), [0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_encode_access_unit() {
        let mut buffer = [0u8; 16];
        let len = encode_access_unit(&[0xAA, 0xBB, 0xCC], &mut buffer).unwrap();

        assert_eq!(len, 7);
        assert_eq!(&buffer[..len], &[0x03, 0x00, 0x00, 0x00, 0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_encode_empty_unit() {
        let mut buffer = [0xFFu8; 4];
        assert_eq!(encode_access_unit(&[], &mut buffer), Ok(4));
        assert_eq!(buffer, [0, 0, 0, 0]);
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buffer = [0u8; 5];
        let result = encode_access_unit(&[1, 2], &mut buffer);
        assert_eq!(result, Err(PacketError::BufferTooSmall));
    }

    #[test]
    fn test_encode_to_vec_matches_slice_encoding() {
        let body = [7u8; 10];
        let mut buffer = [0u8; 14];
        encode_access_unit(&body, &mut buffer).unwrap();

        assert_eq!(encode_to_vec(&body).unwrap().as_slice(), &buffer[..]);
    }
}

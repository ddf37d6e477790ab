//! Source RCON packet framing.
//!
//! Wire layout: `i32_le(length) + i32_le(request_id) + i32_le(type) + payload + \0\0`,
//! where `length` counts everything after itself.

use bytes::{Buf, BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::RconError;

/// RCON packet types.
pub const PACKET_TYPE_COMMAND: i32 = 2;
pub const PACKET_TYPE_LOGIN: i32 = 3;
pub const PACKET_TYPE_RESPONSE: i32 = 0;
pub const PACKET_TYPE_AUTH_RESPONSE: i32 = 2;

/// Request id the server answers a rejected login with.
pub const AUTH_FAILED_ID: i32 = -1;

/// Largest payload a Minecraft server sends in one response packet.
pub const MAX_RESPONSE_PAYLOAD: usize = 4096;
/// Largest command payload a Minecraft server accepts.
pub const MAX_COMMAND_PAYLOAD: usize = 1446;

/// request id + type + two terminators.
const HEADER_AND_TRAILER: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub request_id: i32,
    pub packet_type: i32,
    pub body: String,
}

impl Packet {
    pub fn new(request_id: i32, packet_type: i32, body: impl Into<String>) -> Self {
        Self {
            request_id,
            packet_type,
            body: body.into(),
        }
    }

    /// Serialize the full frame, including the length prefix.
    pub fn encode(&self) -> BytesMut {
        let body = self.body.as_bytes();
        let length = HEADER_AND_TRAILER + body.len();
        let mut buf = BytesMut::with_capacity(4 + length);
        buf.put_i32_le(length as i32);
        buf.put_i32_le(self.request_id);
        buf.put_i32_le(self.packet_type);
        buf.put_slice(body);
        buf.put_slice(&[0, 0]);
        buf
    }

    /// Parse a frame body (everything after the length prefix).
    pub fn decode(mut frame: impl Buf) -> Result<Self, RconError> {
        let len = frame.remaining();
        if len < HEADER_AND_TRAILER {
            return Err(RconError::InvalidPacketLength(len as i32));
        }
        let request_id = frame.get_i32_le();
        let packet_type = frame.get_i32_le();
        let payload_len = len - HEADER_AND_TRAILER;
        let mut payload = vec![0u8; payload_len];
        frame.copy_to_slice(&mut payload);
        if frame.get_u8() != 0 || frame.get_u8() != 0 {
            return Err(RconError::MissingTerminator);
        }
        Ok(Self {
            request_id,
            packet_type,
            body: String::from_utf8_lossy(&payload).into_owned(),
        })
    }
}

/// Read one packet whose payload may be up to `max_payload` bytes.
pub async fn read_packet<R: AsyncRead + Unpin>(
    reader: &mut R,
    max_payload: usize,
) -> Result<Packet, RconError> {
    let length = reader.read_i32_le().await?;
    let max = (HEADER_AND_TRAILER + max_payload) as i32;
    if !(HEADER_AND_TRAILER as i32..=max).contains(&length) {
        return Err(RconError::InvalidPacketLength(length));
    }
    let mut frame = vec![0u8; length as usize];
    reader.read_exact(&mut frame).await?;
    Packet::decode(&frame[..])
}

pub async fn write_packet<W: AsyncWrite + Unpin>(
    writer: &mut W,
    packet: &Packet,
) -> Result<(), RconError> {
    writer.write_all(&packet.encode()).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rcon_packet_type_constants() {
        assert_eq!(PACKET_TYPE_COMMAND, 2);
        assert_eq!(PACKET_TYPE_LOGIN, 3);
        assert_eq!(PACKET_TYPE_RESPONSE, 0);
        assert_eq!(PACKET_TYPE_AUTH_RESPONSE, 2);
    }

    #[test]
    fn encode_layout() {
        let bytes = Packet::new(7, PACKET_TYPE_COMMAND, "list").encode();
        assert_eq!(
            &bytes[..],
            &[
                14, 0, 0, 0, // length
                7, 0, 0, 0, // request id
                2, 0, 0, 0, // type
                b'l', b'i', b's', b't', 0, 0,
            ]
        );
    }

    #[test]
    fn decode_empty_body() {
        let frame = [5u8, 0, 0, 0, 2, 0, 0, 0, 0, 0];
        let pkt = Packet::decode(&frame[..]).unwrap();
        assert_eq!(pkt, Packet::new(5, PACKET_TYPE_AUTH_RESPONSE, ""));
    }

    #[test]
    fn decode_rejects_short_and_unterminated() {
        assert!(matches!(
            Packet::decode(&[0u8; 4][..]),
            Err(RconError::InvalidPacketLength(4))
        ));
        let frame = [1u8, 0, 0, 0, 0, 0, 0, 0, b'x', 1];
        assert!(matches!(
            Packet::decode(&frame[..]),
            Err(RconError::MissingTerminator)
        ));
    }

    #[tokio::test]
    async fn read_checks_length_bounds() {
        let mut data: &[u8] = &[3, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            read_packet(&mut data, MAX_RESPONSE_PAYLOAD).await,
            Err(RconError::InvalidPacketLength(3))
        ));
    }

    #[tokio::test]
    async fn write_then_read() {
        let pkt = Packet::new(-1, PACKET_TYPE_RESPONSE, "There are 0 of a max of 20 players online");
        let mut buf = Vec::new();
        write_packet(&mut buf, &pkt).await.unwrap();
        let mut reader = &buf[..];
        assert_eq!(
            read_packet(&mut reader, MAX_RESPONSE_PAYLOAD).await.unwrap(),
            pkt
        );
    }
}

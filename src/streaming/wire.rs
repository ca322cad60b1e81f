//! Wire framing
//!
//! Every request and response travels as one length-prefixed JSON frame:
//!
//! ```text
//! ┌──────────────────┬──────────────────────────┐
//! │ Length (4 bytes) │ Payload (variable)       │
//! │ Big-endian u32   │ JSON (serde_json)        │
//! └──────────────────┴──────────────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! - **Oversized inbound frame**: `Error::Protocol`, connection closed
//! - **Outbound frame**: only bounded by what the length prefix can express
//! - **Undecodable payload**: reported to the caller, connection stays open
//! - **Read timeout before a frame starts**: `Ok(false)`, caller polls again

use crate::error::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{ErrorKind, Read, Write};

/// Size of the length prefix in bytes
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// Default frame size limit (64 KiB)
pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024;

/// Length-prefixed JSON codec
#[derive(Debug, Clone, Copy)]
pub struct FrameCodec {
    max_frame_bytes: usize,
}

impl FrameCodec {
    /// Create a codec refusing to read frames larger than `max_frame_bytes`
    pub fn new(max_frame_bytes: usize) -> Self {
        Self { max_frame_bytes }
    }

    /// Codec reading any frame the length prefix can describe
    pub fn unbounded() -> Self {
        Self::new(u32::MAX as usize)
    }

    /// Serialize `msg` into a complete frame (prefix + payload).
    ///
    /// The read limit does not apply here: a response grows with the probe
    /// trail and must always be deliverable.
    pub fn encode<T: Serialize>(&self, msg: &T) -> Result<Vec<u8>> {
        let payload = serde_json::to_vec(msg)?;
        let len = u32::try_from(payload.len()).map_err(|_| {
            Error::Protocol(format!(
                "Frame too large for length prefix: {} bytes",
                payload.len()
            ))
        })?;

        let mut frame = Vec::with_capacity(LENGTH_PREFIX_BYTES + payload.len());
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Deserialize a frame payload
    pub fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Encode and write one frame
    pub fn write_frame<W: Write, T: Serialize>(&self, writer: &mut W, msg: &T) -> Result<()> {
        let frame = self.encode(msg)?;
        writer.write_all(&frame)?;
        writer.flush()?;
        Ok(())
    }

    /// Read one frame payload into `buf`.
    ///
    /// Returns `Ok(false)` when the read timed out before any frame started.
    pub fn read_frame<R: Read>(&self, reader: &mut R, buf: &mut Vec<u8>) -> Result<bool> {
        let mut len_buf = [0u8; LENGTH_PREFIX_BYTES];
        match reader.read_exact(&mut len_buf) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                return Ok(false);
            }
            Err(e) => return Err(Error::Io(e)),
        }

        let len = u32::from_be_bytes(len_buf) as usize;
        if len > self.max_frame_bytes {
            return Err(Error::Protocol(format!(
                "Frame too large: {} bytes (max {})",
                len, self.max_frame_bytes
            )));
        }

        // Reuse buffer - no allocation if capacity is sufficient
        buf.clear();
        buf.resize(len, 0);
        reader.read_exact(buf)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::messages::Request;
    use std::io::Cursor;

    #[test]
    fn test_frame_layout() {
        let codec = FrameCodec::new(1024);
        let frame = codec.encode(&Request::Summary).unwrap();
        let payload = br#"{"type":"Summary"}"#;
        assert_eq!(&frame[..4], &(payload.len() as u32).to_be_bytes());
        assert_eq!(&frame[4..], payload);
    }

    #[test]
    fn test_read_back_to_back_frames() {
        let codec = FrameCodec::new(1024);
        let mut bytes = Vec::new();
        codec.write_frame(&mut bytes, &Request::Summary).unwrap();
        codec
            .write_frame(
                &mut bytes,
                &Request::Commands {
                    commands: vec!['L'],
                },
            )
            .unwrap();

        let mut reader = Cursor::new(bytes);
        let mut buf = Vec::new();
        assert!(codec.read_frame(&mut reader, &mut buf).unwrap());
        assert_eq!(codec.decode::<Request>(&buf).unwrap(), Request::Summary);
        assert!(codec.read_frame(&mut reader, &mut buf).unwrap());
        assert!(matches!(
            codec.decode::<Request>(&buf).unwrap(),
            Request::Commands { .. }
        ));

        // Clean end of stream surfaces as EOF
        let err = codec.read_frame(&mut reader, &mut buf).unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let codec = FrameCodec::new(8);
        let mut reader = Cursor::new(1000u32.to_be_bytes().to_vec());
        let mut buf = Vec::new();
        assert!(matches!(
            codec.read_frame(&mut reader, &mut buf),
            Err(Error::Protocol(_))
        ));
    }

    #[test]
    fn test_limit_only_applies_to_reads() {
        let small = FrameCodec::new(8);
        let request = Request::Commands {
            commands: vec!['F'; 16],
        };
        let frame = small.encode(&request).unwrap();
        assert!(frame.len() - LENGTH_PREFIX_BYTES > 8);

        // The sender can still emit it; only an unbounded reader accepts it
        let mut buf = Vec::new();
        assert!(matches!(
            small.read_frame(&mut Cursor::new(frame.clone()), &mut buf),
            Err(Error::Protocol(_))
        ));
        let reader = FrameCodec::unbounded();
        assert!(reader.read_frame(&mut Cursor::new(frame), &mut buf).unwrap());
        assert_eq!(reader.decode::<Request>(&buf).unwrap(), request);
    }

    #[test]
    fn test_malformed_payload() {
        let codec = FrameCodec::new(1024);
        let result = codec.decode::<Request>(b"{not json");
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}

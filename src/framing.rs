//! PDU framing over a byte stream.
//!
//! This module is the bridge between the pure codec and a TCP session: a
//! `tokio_util` [`Decoder`]/[`Encoder`] pair that splits the inbound stream
//! on the 4-octet `command_length` header, hands each complete frame to
//! [`syntax::decode`], and patches `command_length` on the way out so
//! callers never hand-compute it. All buffering, logging and I/O error
//! mapping lives here; the codec underneath stays pure.

use std::io;
use std::sync::Arc;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::syntax::{self, Descriptor, Value};

/// Upper bound on a single frame, guarding the read buffer against hostile
/// `command_length` values.
pub const MAX_FRAME_LEN: u32 = 64 * 1024;

/// Smallest legal PDU: the 16-octet header alone.
const MIN_FRAME_LEN: u32 = 16;

/// Octets of the `command_length` field itself.
const LEN_OCTETS: usize = 4;

/// Frame-level codec for whole PDUs.
///
/// The descriptor covers the entire frame including the `command_length`
/// field; a catalog typically passes a union over every PDU layout it
/// serves.
pub struct FrameCodec {
    descriptor: Arc<Descriptor>,
}

impl FrameCodec {
    pub fn new(descriptor: Arc<Descriptor>) -> Self {
        Self { descriptor }
    }
}

fn invalid_data(reason: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, reason)
}

impl Decoder for FrameCodec {
    type Item = Value;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < LEN_OCTETS {
            return Ok(None);
        }
        let frame_len = u32::from_be_bytes([src[0], src[1], src[2], src[3]]);
        if !(MIN_FRAME_LEN..=MAX_FRAME_LEN).contains(&frame_len) {
            tracing::warn!(frame_len, "rejecting frame with out-of-range command_length");
            return Err(invalid_data(format!(
                "command_length {frame_len} outside {MIN_FRAME_LEN}..={MAX_FRAME_LEN}"
            )));
        }
        if src.len() < frame_len as usize {
            src.reserve(frame_len as usize - src.len());
            return Ok(None);
        }

        let frame = src.split_to(frame_len as usize);
        let (value, rest) = syntax::decode(&frame, &self.descriptor).map_err(|e| {
            tracing::warn!(frame_len, "frame rejected by descriptor: {e}");
            invalid_data(e.to_string())
        })?;
        if !rest.is_empty() {
            return Err(invalid_data(format!(
                "{} trailing octets after decoded frame",
                rest.len()
            )));
        }
        tracing::debug!(frame_len, "decoded frame");
        Ok(Some(value))
    }
}

impl Encoder<&Value> for FrameCodec {
    type Error = io::Error;

    fn encode(&mut self, item: &Value, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let frame = syntax::encode(item, &self.descriptor).map_err(|e| invalid_data(e.to_string()))?;
        if frame.len() > MAX_FRAME_LEN as usize {
            return Err(invalid_data(format!(
                "encoded frame of {} octets exceeds {MAX_FRAME_LEN}",
                frame.len()
            )));
        }

        // Stamp command_length with the actual frame size so the value's
        // own length field never has to be kept in sync by hand.
        let start = dst.len();
        dst.put_slice(&frame);
        if frame.len() >= LEN_OCTETS {
            let stamped = (frame.len() as u32).to_be_bytes();
            dst[start..start + LEN_OCTETS].copy_from_slice(&stamped);
        }
        tracing::debug!(frame_len = frame.len(), "encoded frame");
        Ok(())
    }
}

impl Encoder<Value> for FrameCodec {
    type Error = io::Error;

    fn encode(&mut self, item: Value, dst: &mut BytesMut) -> Result<(), Self::Error> {
        Encoder::<&Value>::encode(self, &item, dst)
    }
}

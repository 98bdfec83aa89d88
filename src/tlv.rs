//! Tag/length/value optional parameters.
//!
//! SMPP extends every PDU with TLV-framed parameters: a 2-octet tag, a
//! 2-octet length, then `length` octets of value. A [`Tlv`] pairs a tag
//! with the parameter's maximum size and *base* descriptor; each datagram
//! instantiates the payload shape by fitting the base descriptor to the
//! length the wire actually declared.

use bytes::{BufMut, Bytes, BytesMut};

use crate::syntax::{self, Descriptor, Mismatch, TypeMismatch, Value};

/// Octets of tag plus length framing.
const FRAME_OCTETS: usize = 4;

/// Shape of one optional parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tlv {
    tag: u16,
    size: usize,
    base: Descriptor,
}

impl Tlv {
    /// A parameter carrying `base`-shaped payloads of at most `size` octets
    /// under `tag`.
    pub fn new(tag: u16, size: usize, base: Descriptor) -> Self {
        Tlv { tag, size, base }
    }

    /// Decode one TLV from the front of `input`.
    ///
    /// The tag must match (a foreign tag ranks like any constant mismatch,
    /// so unions of TLVs disambiguate the same way PDUs do), the declared
    /// length must be covered by the input, and the fitted payload
    /// descriptor must consume the body exactly.
    pub fn decode<'a>(&self, input: &'a [u8]) -> Result<(Value, &'a [u8]), TypeMismatch> {
        let tag_descriptor = Descriptor::constant(self.tag.to_be_bytes().to_vec());
        let (_, rest) = syntax::decode(input, &tag_descriptor)?;
        let (len_value, rest) = syntax::decode(rest, &Descriptor::integer(2, 0, 0xFFFF))?;
        let len = len_value.as_int().unwrap_or_default() as usize;

        let fitted = self.base.fit(len);
        if rest.len() < len {
            return Err(TypeMismatch::new(fitted, Mismatch::Bytes(rest.to_vec())));
        }
        let (body, tail) = rest.split_at(len);
        let (value, leftover) = syntax::decode(body, &fitted)?;
        if !leftover.is_empty() {
            return Err(TypeMismatch::new(
                fitted,
                Mismatch::Bytes(leftover.to_vec()),
            ));
        }
        Ok((value, tail))
    }

    /// Encode `value` as one TLV: tag, actual payload length, payload.
    pub fn encode(&self, value: &Value) -> Result<Bytes, TypeMismatch> {
        let payload = syntax::encode(value, &self.base)?;
        if payload.len() > self.size.min(0xFFFF) {
            return Err(TypeMismatch::new(
                self.base.clone(),
                Mismatch::Value(value.clone()),
            ));
        }
        let mut out = BytesMut::with_capacity(FRAME_OCTETS + payload.len());
        out.put_u16(self.tag);
        out.put_u16(payload.len() as u16);
        out.put_slice(&payload);
        Ok(out.freeze())
    }
}

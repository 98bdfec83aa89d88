//! Type descriptors for the SMPP base syntax.
//!
//! A descriptor declares the wire shape of one field: a literal constant,
//! a big-endian integer, a C-octet string, a raw octet string, a
//! length-prefixed list, a composite of ordered fields, or a union of
//! alternatives. PDU layouts are built by nesting descriptors; the engine
//! in [`decode`](super::decode()) and [`encode`](super::encode()) walks the
//! tree, so descriptors carry no behavior of their own.
//!
//! Descriptors are immutable and cheap to share. A catalog typically builds
//! them once in `LazyLock` statics and hands out references or `Arc`s.

/// Lexical constraint on the payload bytes of a string field.
///
/// `Hex` and `Dec` restrict every non-terminating byte to ASCII hex
/// (`0-9A-Fa-f`) or decimal (`0-9`) digits. A string consisting of only the
/// trailing NUL always satisfies the constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrFormat {
    /// Any octets.
    Free,
    /// ASCII hex digits only.
    Hex,
    /// ASCII decimal digits only.
    Dec,
}

/// How [`Descriptor::fit_with`] treats the capacity of a `List`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListFit {
    /// Cap the element capacity at the fitted size.
    #[default]
    Tighten,
    /// Keep the declared element capacity, matching decoders that ignore
    /// the TLV length when sizing lists.
    Preserve,
}

/// Recursive wire-shape description of one SMPP field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Descriptor {
    /// A literal octet sequence that must appear verbatim.
    Constant(Vec<u8>),
    /// Big-endian unsigned integer of `size` octets (1..=4). The `min`/`max`
    /// range is enforced at encode; at decode the width alone bounds the
    /// value.
    Integer { size: usize, min: u32, max: u32 },
    /// NUL-terminated string. Fixed mode occupies exactly 1 octet (a lone
    /// NUL) or exactly `size` octets with the NUL last; variable mode runs
    /// up to and including the first NUL, with `size` the inclusive
    /// maximum. The decoded value keeps the trailing NUL.
    CString {
        fixed: bool,
        size: usize,
        format: StrFormat,
    },
    /// Raw octets, no terminator. Fixed mode is exactly `size` octets
    /// (or empty at encode); variable mode consumes `min(size, remaining)`
    /// and is only meaningful inside a TLV body.
    OctetString {
        fixed: bool,
        size: usize,
        format: StrFormat,
    },
    /// Homogeneous sequence with a big-endian count prefix of
    /// `size / 256 + 1` octets. `size` is the maximum element count.
    List { element: Box<Descriptor>, size: usize },
    /// Ordered concatenation of fields. A named composite decodes to a
    /// tagged record, an anonymous one to a plain tuple; the tag never
    /// reaches the wire.
    Composite {
        name: Option<&'static str>,
        fields: Vec<Descriptor>,
    },
    /// One-of alternatives, first match wins at decode and encode.
    Union(Vec<Descriptor>),
}

impl Descriptor {
    /// Literal octets that must appear verbatim on the wire.
    pub fn constant(literal: impl Into<Vec<u8>>) -> Self {
        Descriptor::Constant(literal.into())
    }

    /// Four-octet big-endian constant, the shape of an SMPP command id.
    pub fn constant_u32(value: u32) -> Self {
        Descriptor::Constant(value.to_be_bytes().to_vec())
    }

    /// Big-endian unsigned integer of `size` octets (1..=4).
    pub fn integer(size: usize, min: u32, max: u32) -> Self {
        debug_assert!((1..=4).contains(&size), "integer width must be 1..=4");
        Descriptor::Integer { size, min, max }
    }

    pub fn cstring(fixed: bool, size: usize, format: StrFormat) -> Self {
        debug_assert!(size >= 1, "c-octet string needs room for the NUL");
        Descriptor::CString { fixed, size, format }
    }

    pub fn octet_string(fixed: bool, size: usize, format: StrFormat) -> Self {
        Descriptor::OctetString { fixed, size, format }
    }

    pub fn list(element: Descriptor, size: usize) -> Self {
        Descriptor::List {
            element: Box::new(element),
            size,
        }
    }

    /// Anonymous composite; decodes to a tuple.
    pub fn composite(fields: Vec<Descriptor>) -> Self {
        Descriptor::Composite { name: None, fields }
    }

    /// Named composite; decodes to a record tagged with `name`.
    pub fn record(name: &'static str, fields: Vec<Descriptor>) -> Self {
        Descriptor::Composite {
            name: Some(name),
            fields,
        }
    }

    pub fn union(branches: Vec<Descriptor>) -> Self {
        Descriptor::Union(branches)
    }

    /// Tighten this descriptor to at most `new_size` octets of payload.
    ///
    /// This is how a TLV instantiates a generic parameter shape against the
    /// length a datagram actually declared. Integers shrink their width,
    /// strings clamp their size and become fixed (the TLV body is exact),
    /// and constants, composites and unions pass through unchanged. Lists
    /// tighten their capacity; use [`Descriptor::fit_with`] to keep the
    /// declared capacity instead.
    pub fn fit(&self, new_size: usize) -> Descriptor {
        self.fit_with(new_size, ListFit::Tighten)
    }

    /// [`Descriptor::fit`] with an explicit [`ListFit`] mode.
    pub fn fit_with(&self, new_size: usize, list_fit: ListFit) -> Descriptor {
        match self {
            Descriptor::Integer { size, min, max } if new_size < *size => Descriptor::Integer {
                size: new_size,
                min: *min,
                max: *max,
            },
            Descriptor::CString { size, format, .. } if new_size <= *size => Descriptor::CString {
                fixed: true,
                size: new_size,
                format: *format,
            },
            Descriptor::OctetString { size, format, .. } if new_size <= *size => {
                Descriptor::OctetString {
                    fixed: true,
                    size: new_size,
                    format: *format,
                }
            }
            Descriptor::List { element, size }
                if new_size < *size && list_fit == ListFit::Tighten =>
            {
                Descriptor::List {
                    element: element.clone(),
                    size: new_size,
                }
            }
            other => other.clone(),
        }
    }
}

/// Width in octets of a list's count prefix.
pub(crate) fn list_prefix_octets(size: usize) -> usize {
    size / 256 + 1
}

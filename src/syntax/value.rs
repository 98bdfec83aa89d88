//! Decoded representation of SMPP base-syntax fields.

/// One decoded field: the value-side counterpart of a
/// [`Descriptor`](super::Descriptor).
///
/// Strings are raw octet sequences; the codec never interprets a character
/// set. C-octet strings keep their trailing NUL so that what you decode is
/// exactly what re-encodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// Unsigned integer, at most four octets wide on the wire.
    Int(u32),
    /// Octets of a constant, C-octet string or octet string.
    Str(Vec<u8>),
    /// Elements of a length-prefixed list.
    List(Vec<Value>),
    /// Fields of an anonymous composite.
    Tuple(Vec<Value>),
    /// Fields of a named composite.
    Record {
        name: &'static str,
        fields: Vec<Value>,
    },
}

impl Value {
    /// String value from raw octets.
    pub fn str(octets: impl Into<Vec<u8>>) -> Self {
        Value::Str(octets.into())
    }

    /// C-octet string value: `text` with the trailing NUL appended.
    pub fn cstr(text: &str) -> Self {
        let mut octets = text.as_bytes().to_vec();
        octets.push(0);
        Value::Str(octets)
    }

    pub fn as_int(&self) -> Option<u32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

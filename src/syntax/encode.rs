//! Descriptor-driven encoding to SMPP wire octets.

use bytes::{BufMut, Bytes, BytesMut};

use super::decode::format_allows;
use super::descriptor::{Descriptor, StrFormat, list_prefix_octets};
use super::error::{Mismatch, TypeMismatch};
use super::value::Value;

/// Encode `value` against `descriptor`.
///
/// The produced octets are exactly what [`decode`](super::decode()) accepts
/// back for any self-delimiting descriptor. Rejections mirror decode: a
/// [`TypeMismatch`] tree naming the field that refused the value.
pub fn encode(value: &Value, descriptor: &Descriptor) -> Result<Bytes, TypeMismatch> {
    let mut out = BytesMut::new();
    encode_into(value, descriptor, &mut out)?;
    Ok(out.freeze())
}

fn encode_into(
    value: &Value,
    descriptor: &Descriptor,
    out: &mut BytesMut,
) -> Result<(), TypeMismatch> {
    match descriptor {
        Descriptor::Constant(literal) => encode_constant(value, descriptor, literal, out),
        Descriptor::Integer { size, min, max } => {
            encode_integer(value, descriptor, *size, *min, *max, out)
        }
        Descriptor::CString {
            fixed,
            size,
            format,
        } => encode_cstring(value, descriptor, *fixed, *size, *format, out),
        Descriptor::OctetString {
            fixed,
            size,
            format,
        } => encode_octets(value, descriptor, *fixed, *size, *format, out),
        Descriptor::List { element, size } => encode_list(value, descriptor, element, *size, out),
        Descriptor::Composite { name, fields } => {
            encode_composite(value, descriptor, *name, fields, out)
        }
        Descriptor::Union(branches) => encode_union(value, descriptor, branches, out),
    }
}

fn reject(descriptor: &Descriptor, value: &Value) -> TypeMismatch {
    TypeMismatch::new(descriptor.clone(), Mismatch::Value(value.clone()))
}

fn encode_constant(
    value: &Value,
    descriptor: &Descriptor,
    literal: &[u8],
    out: &mut BytesMut,
) -> Result<(), TypeMismatch> {
    match value {
        Value::Str(octets) if octets == literal => {
            out.put_slice(literal);
            Ok(())
        }
        other => Err(reject(descriptor, other)),
    }
}

fn encode_integer(
    value: &Value,
    descriptor: &Descriptor,
    size: usize,
    min: u32,
    max: u32,
    out: &mut BytesMut,
) -> Result<(), TypeMismatch> {
    match value {
        Value::Int(v) if (min..=max).contains(v) => {
            for i in (0..size).rev() {
                out.put_u8((v >> (8 * i)) as u8);
            }
            Ok(())
        }
        Value::Int(v) => Err(TypeMismatch::new(
            descriptor.clone(),
            Mismatch::Int(u64::from(*v)),
        )),
        other => Err(reject(descriptor, other)),
    }
}

fn encode_cstring(
    value: &Value,
    descriptor: &Descriptor,
    fixed: bool,
    size: usize,
    format: StrFormat,
    out: &mut BytesMut,
) -> Result<(), TypeMismatch> {
    let Value::Str(octets) = value else {
        return Err(reject(descriptor, value));
    };
    let len_ok = if fixed {
        octets.len() == size || octets.len() == 1
    } else {
        (1..=size).contains(&octets.len())
    };
    // The NUL discipline matches decode exactly: terminator last, nowhere
    // else. Anything looser would produce octets decode rejects.
    let shape_ok = len_ok
        && octets.last() == Some(&0)
        && octets[..octets.len() - 1].iter().all(|&b| b != 0);
    if !shape_ok || !format_allows(format, &octets[..octets.len() - 1]) {
        return Err(reject(descriptor, value));
    }
    out.put_slice(octets);
    Ok(())
}

fn encode_octets(
    value: &Value,
    descriptor: &Descriptor,
    fixed: bool,
    size: usize,
    format: StrFormat,
    out: &mut BytesMut,
) -> Result<(), TypeMismatch> {
    let Value::Str(octets) = value else {
        return Err(reject(descriptor, value));
    };
    let len_ok = if fixed {
        octets.len() == size || octets.is_empty()
    } else {
        octets.len() <= size
    };
    if !len_ok || !format_allows(format, octets) {
        return Err(reject(descriptor, value));
    }
    out.put_slice(octets);
    Ok(())
}

fn encode_list(
    value: &Value,
    descriptor: &Descriptor,
    element: &Descriptor,
    size: usize,
    out: &mut BytesMut,
) -> Result<(), TypeMismatch> {
    let Value::List(items) = value else {
        return Err(reject(descriptor, value));
    };
    if items.len() > size {
        return Err(TypeMismatch::new(
            descriptor.clone(),
            Mismatch::Int(items.len() as u64),
        ));
    }
    for i in (0..list_prefix_octets(size)).rev() {
        out.put_u8((items.len() >> (8 * i)) as u8);
    }
    for item in items {
        encode_into(item, element, out).map_err(|e| TypeMismatch::wrap(descriptor.clone(), e))?;
    }
    Ok(())
}

fn encode_composite(
    value: &Value,
    descriptor: &Descriptor,
    name: Option<&'static str>,
    fields: &[Descriptor],
    out: &mut BytesMut,
) -> Result<(), TypeMismatch> {
    let values = match (name, value) {
        (Some(expected), Value::Record { name, fields }) if *name == expected => fields,
        (None, Value::Tuple(fields)) => fields,
        _ => return Err(reject(descriptor, value)),
    };
    if values.len() != fields.len() {
        return Err(reject(descriptor, value));
    }
    for (field_value, field) in values.iter().zip(fields) {
        encode_into(field_value, field, out)
            .map_err(|e| TypeMismatch::wrap(descriptor.clone(), e))?;
    }
    Ok(())
}

fn encode_union(
    value: &Value,
    descriptor: &Descriptor,
    branches: &[Descriptor],
    out: &mut BytesMut,
) -> Result<(), TypeMismatch> {
    let mut best: Option<TypeMismatch> = None;
    for branch in branches {
        // Each attempt writes to a scratch buffer so a failing branch
        // leaves no partial octets behind.
        let mut attempt = BytesMut::new();
        match encode_into(value, branch, &mut attempt) {
            Ok(()) => {
                out.unsplit(attempt);
                return Ok(());
            }
            Err(e) => {
                best = Some(match best {
                    Some(b) if e.priority() > b.priority() => e,
                    Some(b) => b,
                    None => e,
                });
            }
        }
    }
    Err(match best {
        Some(reason) => TypeMismatch::wrap(descriptor.clone(), reason),
        None => reject(descriptor, value),
    })
}

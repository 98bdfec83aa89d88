//! Descriptor-driven decoding of SMPP wire octets.

use super::descriptor::{Descriptor, StrFormat, list_prefix_octets};
use super::error::{Mismatch, TypeMismatch};
use super::value::Value;

/// Decode a prefix of `input` against `descriptor`.
///
/// On success, returns the decoded value and the unconsumed remainder. On
/// failure, nothing is consumed: the caller still holds the original input
/// and receives a [`TypeMismatch`] tree describing the deepest field that
/// rejected.
pub fn decode<'a>(
    input: &'a [u8],
    descriptor: &Descriptor,
) -> Result<(Value, &'a [u8]), TypeMismatch> {
    match descriptor {
        Descriptor::Constant(literal) => decode_constant(input, descriptor, literal),
        Descriptor::Integer { size, .. } => decode_integer(input, descriptor, *size),
        Descriptor::CString {
            fixed,
            size,
            format,
        } => {
            if *fixed {
                decode_cstring_fixed(input, descriptor, *size, *format)
            } else {
                decode_cstring_var(input, descriptor, *size, *format)
            }
        }
        Descriptor::OctetString {
            fixed,
            size,
            format,
        } => {
            if *fixed {
                decode_octets_fixed(input, descriptor, *size, *format)
            } else {
                decode_octets_var(input, descriptor, *size, *format)
            }
        }
        Descriptor::List { element, size } => decode_list(input, descriptor, element, *size),
        Descriptor::Composite { name, fields } => decode_composite(input, descriptor, *name, fields),
        Descriptor::Union(branches) => decode_union(input, descriptor, branches),
    }
}

fn decode_constant<'a>(
    input: &'a [u8],
    descriptor: &Descriptor,
    literal: &[u8],
) -> Result<(Value, &'a [u8]), TypeMismatch> {
    if input.len() < literal.len() {
        // A truncation ranks as less informative than a same-length
        // mismatch, so the detail carries everything that was seen.
        return Err(TypeMismatch::new(
            descriptor.clone(),
            Mismatch::Bytes(input.to_vec()),
        ));
    }
    let (head, tail) = input.split_at(literal.len());
    if head == literal {
        Ok((Value::Str(literal.to_vec()), tail))
    } else {
        Err(TypeMismatch::new(
            descriptor.clone(),
            Mismatch::Bytes(head.to_vec()),
        ))
    }
}

fn decode_integer<'a>(
    input: &'a [u8],
    descriptor: &Descriptor,
    size: usize,
) -> Result<(Value, &'a [u8]), TypeMismatch> {
    if input.len() < size {
        return Err(TypeMismatch::new(
            descriptor.clone(),
            Mismatch::Bytes(input.to_vec()),
        ));
    }
    let (head, tail) = input.split_at(size);
    let value = head.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
    Ok((Value::Int(value), tail))
}

fn decode_cstring_fixed<'a>(
    input: &'a [u8],
    descriptor: &Descriptor,
    size: usize,
    format: StrFormat,
) -> Result<(Value, &'a [u8]), TypeMismatch> {
    match input.first() {
        // A lone NUL is a valid fixed string regardless of the field size.
        Some(&0) => Ok((Value::Str(vec![0]), &input[1..])),
        Some(_) if input.len() >= size => {
            let (head, tail) = input.split_at(size);
            let body = &head[..size - 1];
            if head[size - 1] == 0 && body.iter().all(|&b| b != 0) {
                check_format(descriptor, format, head, body)?;
                Ok((Value::Str(head.to_vec()), tail))
            } else {
                Err(TypeMismatch::new(
                    descriptor.clone(),
                    Mismatch::Bytes(head.to_vec()),
                ))
            }
        }
        _ => Err(TypeMismatch::new(
            descriptor.clone(),
            Mismatch::Bytes(input.to_vec()),
        )),
    }
}

fn decode_cstring_var<'a>(
    input: &'a [u8],
    descriptor: &Descriptor,
    size: usize,
    format: StrFormat,
) -> Result<(Value, &'a [u8]), TypeMismatch> {
    let window = &input[..input.len().min(size)];
    match window.iter().position(|&b| b == 0) {
        Some(k) => {
            let (head, tail) = input.split_at(k + 1);
            check_format(descriptor, format, head, &head[..k])?;
            Ok((Value::Str(head.to_vec()), tail))
        }
        None => Err(TypeMismatch::new(
            descriptor.clone(),
            Mismatch::NotFound(window.to_vec()),
        )),
    }
}

fn decode_octets_fixed<'a>(
    input: &'a [u8],
    descriptor: &Descriptor,
    size: usize,
    format: StrFormat,
) -> Result<(Value, &'a [u8]), TypeMismatch> {
    if input.len() < size {
        return Err(TypeMismatch::new(
            descriptor.clone(),
            Mismatch::Bytes(input.to_vec()),
        ));
    }
    let (head, tail) = input.split_at(size);
    check_format(descriptor, format, head, head)?;
    Ok((Value::Str(head.to_vec()), tail))
}

/// Variable octet strings have no terminator and no length of their own;
/// they exist to soak up a TLV body that the outer framing already bounded.
fn decode_octets_var<'a>(
    input: &'a [u8],
    descriptor: &Descriptor,
    size: usize,
    format: StrFormat,
) -> Result<(Value, &'a [u8]), TypeMismatch> {
    let (head, tail) = input.split_at(input.len().min(size));
    check_format(descriptor, format, head, head)?;
    Ok((Value::Str(head.to_vec()), tail))
}

fn decode_list<'a>(
    input: &'a [u8],
    descriptor: &Descriptor,
    element: &Descriptor,
    size: usize,
) -> Result<(Value, &'a [u8]), TypeMismatch> {
    let prefix = list_prefix_octets(size);
    if input.len() < prefix {
        return Err(TypeMismatch::new(
            descriptor.clone(),
            Mismatch::Bytes(input.to_vec()),
        ));
    }
    let (head, mut rest) = input.split_at(prefix);
    let count = head.iter().fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
    if count > size {
        return Err(TypeMismatch::new(
            descriptor.clone(),
            Mismatch::Int(count as u64),
        ));
    }
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        let (item, tail) =
            decode(rest, element).map_err(|e| TypeMismatch::wrap(descriptor.clone(), e))?;
        items.push(item);
        rest = tail;
    }
    Ok((Value::List(items), rest))
}

fn decode_composite<'a>(
    input: &'a [u8],
    descriptor: &Descriptor,
    name: Option<&'static str>,
    fields: &[Descriptor],
) -> Result<(Value, &'a [u8]), TypeMismatch> {
    let mut rest = input;
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        let (value, tail) =
            decode(rest, field).map_err(|e| TypeMismatch::wrap(descriptor.clone(), e))?;
        values.push(value);
        rest = tail;
    }
    let value = match name {
        Some(name) => Value::Record {
            name,
            fields: values,
        },
        None => Value::Tuple(values),
    };
    Ok((value, rest))
}

fn decode_union<'a>(
    input: &'a [u8],
    descriptor: &Descriptor,
    branches: &[Descriptor],
) -> Result<(Value, &'a [u8]), TypeMismatch> {
    let mut best: Option<TypeMismatch> = None;
    for branch in branches {
        match decode(input, branch) {
            Ok(decoded) => return Ok(decoded),
            Err(e) => {
                // Strictly-greater replacement keeps the earliest of two
                // equally-ranked branch failures.
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
        None => TypeMismatch::new(descriptor.clone(), Mismatch::Bytes(input.to_vec())),
    })
}

/// Whether every byte of `digits` (the non-terminating bytes of a string)
/// satisfies the lexical constraint.
pub(super) fn format_allows(format: StrFormat, digits: &[u8]) -> bool {
    match format {
        StrFormat::Free => true,
        StrFormat::Hex => digits.iter().all(|&b| b.is_ascii_hexdigit()),
        StrFormat::Dec => digits.iter().all(|&b| b.is_ascii_digit()),
    }
}

/// Verify the digit constraint over `digits`; on failure the detail carries
/// the whole decoded string `decoded`.
fn check_format(
    descriptor: &Descriptor,
    format: StrFormat,
    decoded: &[u8],
    digits: &[u8],
) -> Result<(), TypeMismatch> {
    if format_allows(format, digits) {
        Ok(())
    } else {
        Err(TypeMismatch::new(
            descriptor.clone(),
            Mismatch::Bytes(decoded.to_vec()),
        ))
    }
}

//! Unit tests for descriptor-driven decoding.
//!
//! These cover the wire-level contract of each descriptor kind:
//! - primitives consume exactly their shape and return the remainder
//! - composites and lists thread the remainder and wrap inner failures
//! - unions pick the first success, or the highest-priority failure
//! - failures never consume input

use crate::syntax::decode;
use crate::syntax::descriptor::{Descriptor, StrFormat};
use crate::syntax::error::Mismatch;
use crate::syntax::value::Value;

#[test]
fn integer_reads_big_endian_and_returns_remainder() {
    let d = Descriptor::integer(4, 0, u32::MAX);
    let (value, rest) = decode(&[0x12, 0x34, 0x56, 0x78, 0xFF], &d).unwrap();
    assert_eq!(value, Value::Int(0x1234_5678));
    assert_eq!(rest, &[0xFF]);
}

#[test]
fn integer_width_bounds_the_value_not_the_declared_range() {
    // Range is informational at decode; the width alone bounds the value.
    let d = Descriptor::integer(1, 0, 9);
    let (value, rest) = decode(&[0xFE], &d).unwrap();
    assert_eq!(value, Value::Int(0xFE));
    assert!(rest.is_empty());
}

#[test]
fn truncated_integer_reports_the_whole_input() {
    let d = Descriptor::integer(4, 0, u32::MAX);
    let err = decode(&[0x12, 0x34], &d).unwrap_err();
    assert_eq!(err.detail, Mismatch::Bytes(vec![0x12, 0x34]));
}

#[test]
fn constant_matches_verbatim() {
    let d = Descriptor::constant_u32(0x0000_0015);
    let (value, rest) = decode(&[0x00, 0x00, 0x00, 0x15, 0xAA], &d).unwrap();
    assert_eq!(value, Value::str(vec![0x00, 0x00, 0x00, 0x15]));
    assert_eq!(rest, &[0xAA]);
}

#[test]
fn constant_mismatch_reports_actual_prefix_but_truncation_reports_all() {
    let d = Descriptor::constant(vec![0x01, 0x02]);

    let same_length = decode(&[0x01, 0xFF, 0x03], &d).unwrap_err();
    assert_eq!(same_length.detail, Mismatch::Bytes(vec![0x01, 0xFF]));

    let truncated = decode(&[0x01], &d).unwrap_err();
    assert_eq!(truncated.detail, Mismatch::Bytes(vec![0x01]));
}

#[test]
fn fixed_cstring_accepts_a_lone_nul() {
    let d = Descriptor::cstring(true, 16, StrFormat::Free);
    let (value, rest) = decode(&[0x00, 0xAA], &d).unwrap();
    assert_eq!(value, Value::str(vec![0x00]));
    assert_eq!(rest, &[0xAA]);
}

#[test]
fn fixed_cstring_accepts_the_full_width_with_trailing_nul() {
    let d = Descriptor::cstring(true, 4, StrFormat::Free);
    let (value, rest) = decode(b"abc\0rest", &d).unwrap();
    assert_eq!(value, Value::cstr("abc"));
    assert_eq!(rest, b"rest");
}

#[test]
fn fixed_cstring_rejects_an_embedded_nul() {
    let d = Descriptor::cstring(true, 4, StrFormat::Free);
    let err = decode(&[0x61, 0x00, 0x63, 0x00], &d).unwrap_err();
    assert_eq!(err.detail, Mismatch::Bytes(vec![0x61, 0x00, 0x63, 0x00]));
}

#[test]
fn fixed_cstring_rejects_a_missing_terminator() {
    let d = Descriptor::cstring(true, 4, StrFormat::Free);
    let err = decode(b"abcd", &d).unwrap_err();
    assert_eq!(err.detail, Mismatch::Bytes(b"abcd".to_vec()));
}

#[test]
fn variable_cstring_stops_at_the_first_nul() {
    let d = Descriptor::cstring(false, 8, StrFormat::Free);
    let (value, rest) = decode(b"ab\0cd", &d).unwrap();
    assert_eq!(value, Value::cstr("ab"));
    assert_eq!(rest, b"cd");
}

#[test]
fn variable_cstring_without_nul_reports_the_scanned_prefix() {
    let d = Descriptor::cstring(false, 4, StrFormat::Free);
    let err = decode(&[0x41, 0x42, 0x43, 0x44, 0x45], &d).unwrap_err();
    assert_eq!(err.detail, Mismatch::NotFound(vec![0x41, 0x42, 0x43, 0x44]));
}

#[test]
fn short_input_without_nul_scans_only_what_is_there() {
    let d = Descriptor::cstring(false, 8, StrFormat::Free);
    let err = decode(&[0x41, 0x42], &d).unwrap_err();
    assert_eq!(err.detail, Mismatch::NotFound(vec![0x41, 0x42]));
}

#[test]
fn fixed_octet_string_takes_exactly_its_size() {
    let d = Descriptor::octet_string(true, 3, StrFormat::Free);
    let (value, rest) = decode(&[1, 2, 3, 4], &d).unwrap();
    assert_eq!(value, Value::str(vec![1, 2, 3]));
    assert_eq!(rest, &[4]);
}

#[test]
fn short_fixed_octet_string_is_a_mismatch() {
    let d = Descriptor::octet_string(true, 3, StrFormat::Free);
    let err = decode(&[1, 2], &d).unwrap_err();
    assert_eq!(err.detail, Mismatch::Bytes(vec![1, 2]));
}

#[test]
fn variable_octet_string_takes_at_most_its_size() {
    let d = Descriptor::octet_string(false, 3, StrFormat::Free);

    let (value, rest) = decode(&[1, 2, 3, 4], &d).unwrap();
    assert_eq!(value, Value::str(vec![1, 2, 3]));
    assert_eq!(rest, &[4]);

    // Shorter input is swallowed whole; the outer TLV bounded it already.
    let (value, rest) = decode(&[9, 9], &d).unwrap();
    assert_eq!(value, Value::str(vec![9, 9]));
    assert!(rest.is_empty());
}

#[test]
fn hex_format_accepts_digits_of_both_cases() {
    let d = Descriptor::cstring(false, 16, StrFormat::Hex);
    let (value, _) = decode(b"0aF9\0", &d).unwrap();
    assert_eq!(value, Value::cstr("0aF9"));
}

#[test]
fn slash_is_not_a_hex_digit() {
    // 0x2F sits just below '0'; the range check must exclude it.
    let d = Descriptor::cstring(false, 16, StrFormat::Hex);
    let err = decode(b"/1\0", &d).unwrap_err();
    assert_eq!(err.detail, Mismatch::Bytes(b"/1\0".to_vec()));
}

#[test]
fn dec_format_rejects_hex_letters() {
    let d = Descriptor::cstring(false, 16, StrFormat::Dec);
    let err = decode(b"12a\0", &d).unwrap_err();
    assert_eq!(err.detail, Mismatch::Bytes(b"12a\0".to_vec()));
}

#[test]
fn lone_nul_satisfies_any_format() {
    let d = Descriptor::cstring(true, 16, StrFormat::Dec);
    let (value, _) = decode(&[0x00], &d).unwrap();
    assert_eq!(value, Value::str(vec![0x00]));
}

#[test]
fn format_applies_to_every_octet_of_an_octet_string() {
    let d = Descriptor::octet_string(true, 3, StrFormat::Dec);
    let (value, _) = decode(b"123", &d).unwrap();
    assert_eq!(value, Value::str(*b"123"));

    let err = decode(b"12x", &d).unwrap_err();
    assert_eq!(err.detail, Mismatch::Bytes(b"12x".to_vec()));
}

#[test]
fn list_reads_a_wide_prefix_when_capacity_needs_it() {
    // Capacity 300 needs a two-octet count prefix.
    let d = Descriptor::list(Descriptor::integer(1, 0, 255), 300);
    let (value, rest) = decode(&[0x00, 0x03, 0x01, 0x02, 0x03, 0xEE], &d).unwrap();
    assert_eq!(
        value,
        Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
    assert_eq!(rest, &[0xEE]);
}

#[test]
fn list_count_above_capacity_is_a_mismatch() {
    let d = Descriptor::list(Descriptor::integer(1, 0, 255), 2);
    let err = decode(&[0x03, 0x01, 0x02, 0x03], &d).unwrap_err();
    assert_eq!(err.detail, Mismatch::Int(3));
}

#[test]
fn list_element_failure_is_wrapped_with_the_list() {
    let d = Descriptor::list(Descriptor::integer(2, 0, 0xFFFF), 5);
    let err = decode(&[0x02, 0x00, 0x01, 0x00], &d).unwrap_err();
    assert_eq!(err.descriptor, d);
    let Mismatch::Nested(inner) = &err.detail else {
        panic!("expected a nested element failure, got {:?}", err.detail);
    };
    assert_eq!(inner.detail, Mismatch::Bytes(vec![0x00]));
}

#[test]
fn empty_list_is_just_its_prefix() {
    let d = Descriptor::list(Descriptor::integer(1, 0, 255), 10);
    let (value, rest) = decode(&[0x00, 0xAB], &d).unwrap();
    assert_eq!(value, Value::List(vec![]));
    assert_eq!(rest, &[0xAB]);
}

#[test]
fn named_composite_decodes_to_a_record() {
    let d = Descriptor::record(
        "pdu",
        vec![
            Descriptor::constant_u32(0x0000_0015),
            Descriptor::integer(4, 0, u32::MAX),
        ],
    );
    let (value, rest) = decode(&[0x00, 0x00, 0x00, 0x15, 0x00, 0x00, 0x00, 0x2A], &d).unwrap();
    assert_eq!(
        value,
        Value::Record {
            name: "pdu",
            fields: vec![
                Value::str(vec![0x00, 0x00, 0x00, 0x15]),
                Value::Int(42),
            ],
        }
    );
    assert!(rest.is_empty());
}

#[test]
fn anonymous_composite_decodes_to_a_tuple() {
    let d = Descriptor::composite(vec![
        Descriptor::integer(1, 0, 255),
        Descriptor::cstring(false, 4, StrFormat::Free),
    ]);
    let (value, rest) = decode(b"\x07ok\0!", &d).unwrap();
    assert_eq!(
        value,
        Value::Tuple(vec![Value::Int(7), Value::cstr("ok")])
    );
    assert_eq!(rest, b"!");
}

#[test]
fn composite_field_failure_is_wrapped_with_the_composite() {
    let d = Descriptor::record(
        "pdu",
        vec![
            Descriptor::integer(1, 0, 255),
            Descriptor::integer(2, 0, 0xFFFF),
        ],
    );
    let err = decode(&[0x01, 0x02], &d).unwrap_err();
    assert_eq!(err.descriptor, d);
    assert_eq!(err.path().len(), 2);
    assert_eq!(err.leaf().detail, Mismatch::Bytes(vec![0x02]));
}

#[test]
fn union_returns_the_first_matching_branch() {
    let d = Descriptor::union(vec![
        Descriptor::constant(vec![0x01]),
        Descriptor::integer(1, 0, 255),
    ]);
    // Both branches accept 0x01; the constant is first and wins.
    let (value, _) = decode(&[0x01], &d).unwrap();
    assert_eq!(value, Value::str(vec![0x01]));

    let (value, _) = decode(&[0x02], &d).unwrap();
    assert_eq!(value, Value::Int(2));
}

#[test]
fn union_failure_reports_the_deepest_branch() {
    let branch_a = Descriptor::record(
        "a",
        vec![Descriptor::constant(vec![0x01]), Descriptor::integer(1, 0, 255)],
    );
    let branch_b = Descriptor::record(
        "b",
        vec![Descriptor::constant(vec![0x02]), Descriptor::integer(1, 0, 255)],
    );
    let d = Descriptor::union(vec![branch_a.clone(), branch_b]);

    // Branch a clears its command id and dies on the truncated integer
    // (priority 7); branch b dies on the command id itself (priority 6).
    let err = decode(&[0x01], &d).unwrap_err();
    assert_eq!(err.descriptor, d);
    let Mismatch::Nested(reported) = &err.detail else {
        panic!("union failure must nest the chosen branch error");
    };
    assert_eq!(reported.descriptor, branch_a);
    assert_eq!(reported.priority(), 7);
    assert_eq!(reported.leaf().detail, Mismatch::Bytes(vec![]));
}

#[test]
fn union_priority_tie_keeps_the_earlier_branch() {
    let branch_a = Descriptor::record("a", vec![Descriptor::constant(vec![0x01])]);
    let branch_b = Descriptor::record("b", vec![Descriptor::constant(vec![0x02])]);
    let d = Descriptor::union(vec![branch_a.clone(), branch_b]);

    let err = decode(&[0xFF], &d).unwrap_err();
    let Mismatch::Nested(reported) = &err.detail else {
        panic!("union failure must nest the chosen branch error");
    };
    assert_eq!(reported.descriptor, branch_a);
}

#[test]
fn failed_decode_consumes_nothing() {
    let input = [0x00, 0x01, 0x02];
    let d = Descriptor::record(
        "pdu",
        vec![
            Descriptor::integer(2, 0, 0xFFFF),
            Descriptor::integer(4, 0, u32::MAX),
        ],
    );
    assert!(decode(&input, &d).is_err());
    assert_eq!(input, [0x00, 0x01, 0x02], "caller still holds the input");
}

#[test]
fn nested_pdu_shape_decodes_end_to_end() {
    // submit_multi-style body: an address count followed by c-octet string
    // destinations, then a one-octet payload.
    let dest = Descriptor::cstring(false, 21, StrFormat::Free);
    let d = Descriptor::record(
        "submit_multi",
        vec![
            Descriptor::list(dest, 254),
            Descriptor::octet_string(true, 1, StrFormat::Free),
        ],
    );

    let wire = b"\x02dest1\0dest2\0\x2A";
    let (value, rest) = decode(wire, &d).unwrap();
    assert_eq!(
        value,
        Value::Record {
            name: "submit_multi",
            fields: vec![
                Value::List(vec![Value::cstr("dest1"), Value::cstr("dest2")]),
                Value::str(vec![0x2A]),
            ],
        }
    );
    assert!(rest.is_empty());
}

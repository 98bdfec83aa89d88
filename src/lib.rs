//! Descriptor-driven codec for the SMPP 5.0 base syntax.
//!
//! Every SMPP PDU is a tree of field shapes: big-endian integers,
//! NUL-terminated and raw octet strings, length-prefixed lists, composites
//! and one-of unions. This crate expresses those shapes as a recursive
//! [`Descriptor`] and provides a single [`decode`]/[`encode`] pair that
//! walks any descriptor tree, so a PDU catalog is plain data instead of
//! hand-written parsing code.
//!
//! The engine is pure: no I/O, no logging, no shared state. Failures come
//! back as a [`TypeMismatch`] tree whose ranking points at the deepest
//! field that was actually being validated when things went wrong, which is
//! what makes union (one-of) decode errors name the offending field rather
//! than the outer envelope.
//!
//! On top of the core sit two thin layers: [`tlv`] for tag/length/value
//! optional parameters, and [`framing`] for a `tokio_util` codec that
//! splits a TCP stream on `command_length` and feeds whole frames to the
//! engine.

pub mod framing;
pub mod syntax;
pub mod tlv;

pub use syntax::{Descriptor, ListFit, Mismatch, StrFormat, TypeMismatch, Value, decode, encode};

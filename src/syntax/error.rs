//! Type-mismatch reports and their ranking.
//!
//! Every codec failure is a [`TypeMismatch`] tree: the descriptor that was
//! being applied plus either the offending data or the nested mismatch of
//! an inner field. Unions attempt every branch, so they need a way to pick
//! the report worth surfacing; [`TypeMismatch::priority`] ranks a report by
//! how much structure was validated before it failed.

use std::fmt::Write as _;

use thiserror::Error;

use super::descriptor::Descriptor;
use super::value::Value;

/// A failed decode or encode: which descriptor rejected, and why.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{}", self.render())]
pub struct TypeMismatch {
    pub descriptor: Descriptor,
    pub detail: Mismatch,
}

/// The offending data behind a [`TypeMismatch`], or the inner mismatch of a
/// composite, list or union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    /// Raw octets that did not match the descriptor.
    Bytes(Vec<u8>),
    /// An integer or count outside the accepted range.
    Int(u64),
    /// No NUL terminator within the scanned prefix.
    NotFound(Vec<u8>),
    /// A structured value rejected at encode.
    Value(Value),
    /// The failure of an inner field.
    Nested(Box<TypeMismatch>),
}

impl TypeMismatch {
    pub fn new(descriptor: Descriptor, detail: Mismatch) -> Self {
        TypeMismatch { descriptor, detail }
    }

    /// Wrap an inner field failure with the enclosing descriptor.
    pub fn wrap(descriptor: Descriptor, inner: TypeMismatch) -> Self {
        TypeMismatch {
            descriptor,
            detail: Mismatch::Nested(Box::new(inner)),
        }
    }

    /// The innermost mismatch: the field that was actually being validated
    /// when the failure happened.
    pub fn leaf(&self) -> &TypeMismatch {
        let mut node = self;
        while let Mismatch::Nested(inner) = &node.detail {
            node = inner;
        }
        node
    }

    /// Descriptors from the outermost rejection down to the ranked leaf.
    pub fn path(&self) -> Vec<&Descriptor> {
        let mut path = vec![&self.descriptor];
        let mut node = self;
        while let Mismatch::Nested(inner) = &node.detail {
            node = inner;
            path.push(&node.descriptor);
        }
        path
    }

    /// Rank of this report among competing branch failures.
    ///
    /// Deeper nesting means more structure was validated before the
    /// rejection, so deeper reports always outrank shallower ones. At equal
    /// depth a structured leaf (union, list, composite) outranks a scalar
    /// leaf, and a constant leaf ranks last: constants are the cheap
    /// sentinel check a union branch fails when the command id simply
    /// belongs to a sibling.
    pub fn priority(&self) -> u32 {
        let mut depth: u32 = 1;
        let mut node = self;
        while let Mismatch::Nested(inner) = &node.detail {
            depth += 1;
            node = inner;
        }
        let kind = match node.descriptor {
            Descriptor::Integer { .. }
            | Descriptor::CString { .. }
            | Descriptor::OctetString { .. } => 1,
            Descriptor::List { .. } | Descriptor::Composite { .. } | Descriptor::Union(_) => 2,
            Descriptor::Constant(_) => 0,
        };
        3 * depth + kind
    }
}

impl TypeMismatch {
    /// One-line rendering: the root-to-leaf descriptor path, then the
    /// offending data at the leaf.
    fn render(&self) -> String {
        let mut out = String::from("type mismatch at ");
        for (i, descriptor) in self.path().iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            out.push_str(&describe(descriptor));
        }
        match &self.leaf().detail {
            Mismatch::Bytes(octets) => {
                let _ = write!(out, ": offending octets {}", hex::encode(octets));
            }
            Mismatch::Int(v) => {
                let _ = write!(out, ": offending value {v}");
            }
            Mismatch::NotFound(octets) => {
                let _ = write!(out, ": no terminator in {}", hex::encode(octets));
            }
            Mismatch::Value(value) => {
                let _ = write!(out, ": offending value {value:?}");
            }
            // leaf() never returns a nested detail.
            Mismatch::Nested(_) => {}
        }
        out
    }
}

fn describe(descriptor: &Descriptor) -> String {
    match descriptor {
        Descriptor::Constant(literal) => format!("constant({})", hex::encode(literal)),
        Descriptor::Integer { size, .. } => format!("integer({size})"),
        Descriptor::CString { size, .. } => format!("c_octet_string({size})"),
        Descriptor::OctetString { size, .. } => format!("octet_string({size})"),
        Descriptor::List { size, .. } => format!("list({size})"),
        Descriptor::Composite { name: Some(n), .. } => format!("composite({n})"),
        Descriptor::Composite { name: None, .. } => "composite".to_string(),
        Descriptor::Union(branches) => format!("union({})", branches.len()),
    }
}

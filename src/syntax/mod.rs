pub mod descriptor;
pub mod error;
pub mod value;

mod decode;
mod encode;

pub use decode::decode;
pub use descriptor::{Descriptor, ListFit, StrFormat};
pub use encode::encode;
pub use error::{Mismatch, TypeMismatch};
pub use value::Value;

#[cfg(test)]
mod decode_tests;

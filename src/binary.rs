//! Support for serializing and deserializing tag trees in the binary wire
//! format.
//!
//! # Examples
//!
//! ```
//! use nbtree::{compound, to_binary, List, Value};
//!
//! let value = Value::Compound(compound! {
//!     "byte" => 5_i8,
//!     "string" => "hello",
//!     "list_of_float" => List::Float(vec![
//!         std::f32::consts::PI,
//!         std::f32::consts::E,
//!         1.4142
//!     ]),
//! });
//!
//! let mut buf = vec![];
//!
//! to_binary(&value, &mut buf, "").unwrap();
//! ```
//!
//! Decode a tag tree from its binary form.
//!
//! ```
//! use nbtree::{compound, from_binary, Value};
//!
//! let some_bytes = [10, 0, 0, 3, 0, 3, 105, 110, 116, 0, 0, 222, 173, 0];
//!
//! let expected_value = Value::Compound(compound! {
//!     "int" => 0xdead
//! });
//!
//! let (root_name, value) = from_binary(&mut some_bytes.as_slice()).unwrap().unwrap();
//!
//! assert_eq!(value, expected_value);
//! assert_eq!(root_name, "");
//! ```

mod decode;
mod encode;
pub(crate) mod modified_utf8;
#[cfg(test)]
mod tests;

pub use decode::*;
pub use encode::*;

#![doc = include_str!("../README.md")]

pub use binary::{from_binary, from_binary_payload, to_binary, to_binary_payload, written_size};
pub use compound::Compound;
pub use error::*;
pub use list::List;
pub use tag::*;
pub use value::{Value, ValueRef, ValueRefMut};

pub mod binary;
pub mod compound;
pub mod conv;
mod error;
pub mod list;
pub mod num;
mod tag;
pub mod value;

/// A convenience macro for constructing [`Compound`]s.
///
/// Key expressions must implement `Into<String>` while value expressions
/// must implement `Into<Value>`.
///
/// # Examples
///
/// ```
/// use nbtree::{compound, List};
///
/// let c = compound! {
///     "byte" => 123_i8,
///     "list_of_int" => List::Int(vec![3, -7, 5]),
///     "list_of_string" => List::String(vec![
///         "foo".to_owned(),
///         "bar".to_owned(),
///         "baz".to_owned()
///     ]),
///     "string" => "aé日",
///     "compound" => compound! {
///         "foo" => 1,
///         "bar" => 2,
///         "baz" => 3,
///     },
///     "int_array" => vec![5, -9, i32::MIN, 0, i32::MAX],
///     "byte_array" => vec![0_i8, 2, 3],
/// };
///
/// println!("{c:?}");
/// ```
#[macro_export]
macro_rules! compound {
    ($($key:expr => $value:expr),* $(,)?) => {
        <$crate::Compound as ::std::iter::FromIterator<(
            ::std::string::String,
            $crate::Value,
        )>>::from_iter([
            $(
                (
                    ::std::convert::Into::<::std::string::String>::into($key),
                    ::std::convert::Into::<$crate::Value>::into($value),
                ),
            )*
        ])
    };
}

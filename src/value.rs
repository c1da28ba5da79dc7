use std::borrow::Cow;

use byteorder::{BigEndian, ByteOrder};

use crate::binary::modified_utf8;
use crate::conv::u8_slice_as_i8_slice;
use crate::error::{Error, Result};
use crate::tag::Tag;
use crate::{num, Compound, List};

/// Represents an arbitrary tag value.
///
/// There is one variant per payload-carrying kind. The `End` kind carries no
/// payload and has no variant here; it only appears on the wire, as the
/// compound terminator and as the element kind of an empty list.
///
/// A value does not store its own name. Names live on the [`Compound`] key
/// the value is filed under, or are passed explicitly to the top-level
/// encode and decode calls.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
}

/// Represents a reference to an arbitrary tag value, where the payload is
/// not part of the reference.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum ValueRef<'a> {
    Byte(&'a i8),
    Short(&'a i16),
    Int(&'a i32),
    Long(&'a i64),
    Float(&'a f32),
    Double(&'a f64),
    ByteArray(&'a [i8]),
    String(&'a str),
    List(&'a List),
    Compound(&'a Compound),
    IntArray(&'a [i32]),
}

/// Represents a mutable reference to an arbitrary tag value, where the
/// payload is not part of the reference.
#[derive(PartialEq, Debug)]
pub enum ValueRefMut<'a> {
    Byte(&'a mut i8),
    Short(&'a mut i16),
    Int(&'a mut i32),
    Long(&'a mut i64),
    Float(&'a mut f32),
    Double(&'a mut f64),
    ByteArray(&'a mut Vec<i8>),
    String(&'a mut String),
    List(&'a mut List),
    Compound(&'a mut Compound),
    IntArray(&'a mut Vec<i32>),
}

macro_rules! impl_value {
    ($name:ident, $($lifetime:lifetime)?, $($reference:tt)*) => {
        impl $(<$lifetime>)? $name $(<$lifetime>)? {
            /// Returns the type of this value.
            pub fn tag(&self) -> Tag {
                match self {
                    Self::Byte(_) => Tag::Byte,
                    Self::Short(_) => Tag::Short,
                    Self::Int(_) => Tag::Int,
                    Self::Long(_) => Tag::Long,
                    Self::Float(_) => Tag::Float,
                    Self::Double(_) => Tag::Double,
                    Self::ByteArray(_) => Tag::ByteArray,
                    Self::String(_) => Tag::String,
                    Self::List(_) => Tag::List,
                    Self::Compound(_) => Tag::Compound,
                    Self::IntArray(_) => Tag::IntArray,
                }
            }

            /// Returns whether this is one of the six numeric kinds.
            pub fn is_number(&self) -> bool {
                matches!(
                    self,
                    Self::Byte(_)
                        | Self::Short(_)
                        | Self::Int(_)
                        | Self::Long(_)
                        | Self::Float(_)
                        | Self::Double(_)
                )
            }
        }

        impl $(<$lifetime>)? From<$($reference)* i8> for $name $(<$lifetime>)? {
            fn from(v: $($reference)* i8) -> Self {
                Self::Byte(v)
            }
        }

        impl $(<$lifetime>)? From<$($reference)* i16> for $name $(<$lifetime>)? {
            fn from(v: $($reference)* i16) -> Self {
                Self::Short(v)
            }
        }

        impl $(<$lifetime>)? From<$($reference)* i32> for $name $(<$lifetime>)? {
            fn from(v: $($reference)* i32) -> Self {
                Self::Int(v)
            }
        }

        impl $(<$lifetime>)? From<$($reference)* i64> for $name $(<$lifetime>)? {
            fn from(v: $($reference)* i64) -> Self {
                Self::Long(v)
            }
        }

        impl $(<$lifetime>)? From<$($reference)* f32> for $name $(<$lifetime>)? {
            fn from(v: $($reference)* f32) -> Self {
                Self::Float(v)
            }
        }

        impl $(<$lifetime>)? From<$($reference)* f64> for $name $(<$lifetime>)? {
            fn from(v: $($reference)* f64) -> Self {
                Self::Double(v)
            }
        }

        impl $(<$lifetime>)? From<$($reference)* List> for $name $(<$lifetime>)? {
            fn from(v: $($reference)* List) -> Self {
                Self::List(v)
            }
        }

        impl $(<$lifetime>)? From<$($reference)* Compound> for $name $(<$lifetime>)? {
            fn from(v: $($reference)* Compound) -> Self {
                Self::Compound(v)
            }
        }
    }
}

impl_value!(Value,,);
impl_value!(ValueRef, 'a, &'a);
impl_value!(ValueRefMut, 'a, &'a mut);

impl Value {
    /// Returns the numeric value of this tag as a double, or `None` if this
    /// is not a numeric kind.
    ///
    /// `Long` values with a magnitude above 2^53 lose precision here. That
    /// is the documented boundary of the conversion, not an error; use the
    /// `Long` payload directly for exact access.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Byte(v) => Some(*v as f64),
            Value::Short(v) => Some(*v as f64),
            Value::Int(v) => Some(*v as f64),
            Value::Long(v) => Some(*v as f64),
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Replaces the payload with a raw big-endian byte image.
    ///
    /// Numeric kinds require exactly the kind's declared width (1, 2, 4, 8,
    /// 4 and 8 bytes respectively). `ByteArray` and `String` accept any
    /// bytes (strings are decoded from modified UTF-8), and `IntArray`
    /// requires a multiple of four bytes. `List` and `Compound` cannot be
    /// assigned from raw bytes.
    ///
    /// On error the value is left unchanged.
    pub fn set_raw(&mut self, bytes: &[u8]) -> Result<()> {
        let tag = self.tag();

        let expect_width = |width: usize| {
            if bytes.len() == width {
                Ok(())
            } else {
                Err(Error::new_owned(format!(
                    "{tag} payload must be exactly {width} bytes, got {}",
                    bytes.len()
                )))
            }
        };

        match self {
            Value::Byte(v) => {
                expect_width(1)?;
                *v = bytes[0] as i8;
            }
            Value::Short(v) => {
                expect_width(2)?;
                *v = BigEndian::read_i16(bytes);
            }
            Value::Int(v) => {
                expect_width(4)?;
                *v = BigEndian::read_i32(bytes);
            }
            Value::Long(v) => {
                expect_width(8)?;
                *v = BigEndian::read_i64(bytes);
            }
            Value::Float(v) => {
                expect_width(4)?;
                *v = BigEndian::read_f32(bytes);
            }
            Value::Double(v) => {
                expect_width(8)?;
                *v = BigEndian::read_f64(bytes);
            }
            Value::ByteArray(v) => *v = u8_slice_as_i8_slice(bytes).to_vec(),
            Value::String(v) => *v = modified_utf8::decode_modified_utf8(bytes),
            Value::IntArray(v) => {
                if bytes.len() % 4 != 0 {
                    return Err(Error::new_owned(format!(
                        "int array payload of {} bytes is not a multiple of 4",
                        bytes.len()
                    )));
                }
                *v = bytes.chunks_exact(4).map(BigEndian::read_i32).collect();
            }
            Value::List(_) | Value::Compound(_) => {
                return Err(Error::new_owned(format!(
                    "cannot assign raw bytes to a {tag}"
                )));
            }
        }

        Ok(())
    }

    /// Replaces the payload of a numeric kind with the given number.
    ///
    /// Integer kinds truncate toward zero, then wrap to the kind's width:
    /// assigning `255.0` to a byte yields `-1`, and `2147483648.0` to an int
    /// yields `-2147483648`. Fails on non-numeric kinds, leaving the value
    /// unchanged.
    pub fn set_number(&mut self, value: f64) -> Result<()> {
        let tag = self.tag();

        match self {
            Value::Byte(v) => *v = num::f64_to_i64(value) as i8,
            Value::Short(v) => *v = num::f64_to_i64(value) as i16,
            Value::Int(v) => *v = num::f64_to_i64(value) as i32,
            Value::Long(v) => *v = num::f64_to_i64(value),
            Value::Float(v) => *v = value as f32,
            Value::Double(v) => *v = value,
            _ => {
                return Err(Error::new_owned(format!(
                    "cannot assign a number to a {tag}"
                )));
            }
        }

        Ok(())
    }

    /// Replaces the payload by parsing the given text.
    ///
    /// Integer kinds parse per their literal grammar (see [`crate::num`]);
    /// `Long` additionally understands the octal notation. Text that fails
    /// to parse stores zero for the integer kinds and NaN for the float
    /// kinds. `String` replaces its text verbatim. Fails on the remaining
    /// kinds, leaving the value unchanged.
    pub fn set_text(&mut self, text: &str, radix: Option<u32>) -> Result<()> {
        let tag = self.tag();

        match self {
            Value::Byte(v) => *v = num::parse_int_text(text, radix) as i8,
            Value::Short(v) => *v = num::parse_int_text(text, radix) as i16,
            Value::Int(v) => *v = num::parse_int_text(text, radix) as i32,
            Value::Long(v) => {
                *v = match radix {
                    Some(radix) => num::parse_i64_radix(text, radix),
                    None => num::parse_i64(text),
                }
            }
            Value::Float(v) => *v = text.trim().parse().unwrap_or(f32::NAN),
            Value::Double(v) => *v = text.trim().parse().unwrap_or(f64::NAN),
            Value::String(v) => {
                v.clear();
                v.push_str(text);
            }
            _ => {
                return Err(Error::new_owned(format!("cannot assign text to a {tag}")));
            }
        }

        Ok(())
    }

    /// Replaces the payload of a numeric kind with the numeric value of
    /// another tag, truncating and wrapping as in [`Value::set_number`].
    ///
    /// Long-to-long assignment copies the payload exactly rather than
    /// passing through `f64`. Fails if either side is non-numeric, leaving
    /// the value unchanged.
    pub fn set_from(&mut self, source: &Value) -> Result<()> {
        if let (Value::Long(dst), Value::Long(src)) = (&mut *self, source) {
            *dst = *src;
            return Ok(());
        }

        match source.to_f64() {
            Some(n) => self.set_number(n),
            None => Err(Error::new_owned(format!(
                "cannot assign a {} to a {}",
                source.tag(),
                self.tag()
            ))),
        }
    }
}

/// Bools are commonly represented as `0` or `1` bytes in this format.
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Byte(b as _)
    }
}

impl From<Vec<i8>> for Value {
    fn from(v: Vec<i8>) -> Self {
        Self::ByteArray(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}

impl<'a> From<&'a str> for Value {
    fn from(v: &'a str) -> Self {
        Self::String(v.to_owned())
    }
}

impl<'a> From<Cow<'a, str>> for Value {
    fn from(v: Cow<'a, str>) -> Self {
        Self::String(v.into_owned())
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Self::IntArray(v)
    }
}

impl<'a> From<&'a [i8]> for ValueRef<'a> {
    fn from(v: &'a [i8]) -> Self {
        Self::ByteArray(v)
    }
}

impl<'a> From<&'a str> for ValueRef<'a> {
    fn from(v: &'a str) -> ValueRef<'a> {
        Self::String(v)
    }
}

impl<'a> From<&'a Cow<'_, str>> for ValueRef<'a> {
    fn from(v: &'a Cow<'_, str>) -> Self {
        Self::String(v.as_ref())
    }
}

impl<'a> From<&'a [i32]> for ValueRef<'a> {
    fn from(v: &'a [i32]) -> Self {
        Self::IntArray(v)
    }
}

impl<'a> From<&'a mut Vec<i8>> for ValueRefMut<'a> {
    fn from(v: &'a mut Vec<i8>) -> Self {
        Self::ByteArray(v)
    }
}

impl<'a> From<&'a mut String> for ValueRefMut<'a> {
    fn from(v: &'a mut String) -> Self {
        Self::String(v)
    }
}

impl<'a> From<&'a mut Vec<i32>> for ValueRefMut<'a> {
    fn from(v: &'a mut Vec<i32>) -> Self {
        Self::IntArray(v)
    }
}

impl<'a> ValueRef<'a> {
    /// Clones the referenced payload into an owned [`Value`].
    pub fn to_value(self) -> Value {
        match self {
            ValueRef::Byte(v) => Value::Byte(*v),
            ValueRef::Short(v) => Value::Short(*v),
            ValueRef::Int(v) => Value::Int(*v),
            ValueRef::Long(v) => Value::Long(*v),
            ValueRef::Float(v) => Value::Float(*v),
            ValueRef::Double(v) => Value::Double(*v),
            ValueRef::ByteArray(v) => Value::ByteArray(v.to_vec()),
            ValueRef::String(v) => Value::String(v.to_owned()),
            ValueRef::List(v) => Value::List(v.clone()),
            ValueRef::Compound(v) => Value::Compound(v.clone()),
            ValueRef::IntArray(v) => Value::IntArray(v.to_vec()),
        }
    }
}

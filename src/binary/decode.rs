use byteorder::{BigEndian, ReadBytesExt};

use super::modified_utf8;
use crate::conv::u8_vec_into_i8_vec;
use crate::error::{Error, Result};
use crate::tag::Tag;
use crate::{Compound, List, Value};

/// Maximum recursion depth to prevent overflowing the call stack on
/// maliciously nested input.
const MAX_DEPTH: usize = 512;

/// Decodes a complete tag from the slice: one type byte, the name, then the
/// payload. The slice is advanced past the decoded bytes.
///
/// Returns the tag's name alongside its value, or `None` if the input
/// begins with an `End` type byte (an `End` root carries neither name nor
/// payload).
///
/// Decoding is all-or-nothing. Unknown type bytes, negative lengths,
/// truncated input and over-deep nesting abort with an error and no partial
/// tree is returned.
pub fn from_binary(slice: &mut &[u8]) -> Result<Option<(String, Value)>> {
    let mut state = DecodeState { slice, depth: 0 };

    let tag = state.read_tag()?;

    if tag == Tag::End {
        return Ok(None);
    }

    let name = state.read_string()?;
    let value = state.read_value(tag)?;

    Ok(Some((name, value)))
}

/// Decodes only a payload of the given kind, for callers that obtained the
/// type byte out of band. No type byte or name is read; this is the form
/// list elements take on the wire.
///
/// `Tag::End` has no payload, so forcing it is an error.
pub fn from_binary_payload(slice: &mut &[u8], tag: Tag) -> Result<Value> {
    let mut state = DecodeState { slice, depth: 0 };

    state.read_value(tag)
}

struct DecodeState<'a, 'b> {
    slice: &'a mut &'b [u8],
    /// Current recursion depth.
    depth: usize,
}

impl DecodeState<'_, '_> {
    #[inline]
    fn check_depth<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::new_static("reached maximum recursion depth"));
        }

        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    fn read_tag(&mut self) -> Result<Tag> {
        let byte = self.slice.read_u8()?;

        match Tag::from_u8(byte) {
            Some(tag) => Ok(tag),
            None => Err(Error::new_owned(format!("invalid tag byte of {byte:#x}"))),
        }
    }

    fn read_value(&mut self, tag: Tag) -> Result<Value> {
        match tag {
            Tag::End => Err(Error::new_static("end tag has no payload")),
            Tag::Byte => Ok(Value::Byte(self.read_byte()?)),
            Tag::Short => Ok(Value::Short(self.read_short()?)),
            Tag::Int => Ok(Value::Int(self.read_int()?)),
            Tag::Long => Ok(Value::Long(self.read_long()?)),
            Tag::Float => Ok(Value::Float(self.read_float()?)),
            Tag::Double => Ok(Value::Double(self.read_double()?)),
            Tag::ByteArray => Ok(Value::ByteArray(self.read_byte_array()?)),
            Tag::String => Ok(Value::String(self.read_string()?)),
            Tag::List => self.check_depth(|st| Ok(Value::List(st.read_any_list()?))),
            Tag::Compound => self.check_depth(|st| Ok(Value::Compound(st.read_compound()?))),
            Tag::IntArray => Ok(Value::IntArray(self.read_int_array()?)),
        }
    }

    fn read_byte(&mut self) -> Result<i8> {
        Ok(self.slice.read_i8()?)
    }

    fn read_short(&mut self) -> Result<i16> {
        Ok(self.slice.read_i16::<BigEndian>()?)
    }

    fn read_int(&mut self) -> Result<i32> {
        Ok(self.slice.read_i32::<BigEndian>()?)
    }

    fn read_long(&mut self) -> Result<i64> {
        Ok(self.slice.read_i64::<BigEndian>()?)
    }

    fn read_float(&mut self) -> Result<f32> {
        Ok(self.slice.read_f32::<BigEndian>()?)
    }

    fn read_double(&mut self) -> Result<f64> {
        Ok(self.slice.read_f64::<BigEndian>()?)
    }

    /// Takes the next `len` bytes off the slice.
    fn read_bytes(&mut self, len: usize, what: &str) -> Result<Vec<u8>> {
        if self.slice.len() < len {
            return Err(Error::new_owned(format!(
                "{what} of length {len} exceeds remainder of input"
            )));
        }

        let (bytes, rest) = self.slice.split_at(len);
        *self.slice = rest;

        Ok(bytes.to_vec())
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.slice.read_u16::<BigEndian>()?.into();
        let bytes = self.read_bytes(len, "string")?;

        Ok(modified_utf8::decode_modified_utf8(&bytes))
    }

    fn read_byte_array(&mut self) -> Result<Vec<i8>> {
        let len = self.read_int()?;

        if len < 0 {
            return Err(Error::new_owned(format!(
                "byte array length of {len} is negative"
            )));
        }

        Ok(u8_vec_into_i8_vec(
            self.read_bytes(len as usize, "byte array")?,
        ))
    }

    fn read_any_list(&mut self) -> Result<List> {
        let elem_tag = self.read_tag()?;
        let len = self.read_int()?;

        if len < 0 {
            return Err(Error::new_owned(format!(
                "{elem_tag} list length of {len} is negative"
            )));
        }

        match elem_tag {
            Tag::End => {
                if len > 0 {
                    Err(Error::new_owned(format!(
                        "list of end tags has nonzero length of {len}"
                    )))
                } else {
                    Ok(List::End)
                }
            }
            Tag::Byte => Ok(List::Byte(u8_vec_into_i8_vec(
                self.read_bytes(len as usize, "byte list")?,
            ))),
            Tag::Short => Ok(List::Short(self.read_list(len, |st| st.read_short())?)),
            Tag::Int => Ok(List::Int(self.read_list(len, |st| st.read_int())?)),
            Tag::Long => Ok(List::Long(self.read_list(len, |st| st.read_long())?)),
            Tag::Float => Ok(List::Float(self.read_list(len, |st| st.read_float())?)),
            Tag::Double => Ok(List::Double(self.read_list(len, |st| st.read_double())?)),
            Tag::ByteArray => Ok(List::ByteArray(
                self.read_list(len, |st| st.read_byte_array())?,
            )),
            Tag::String => Ok(List::String(self.read_list(len, |st| st.read_string())?)),
            Tag::List => self.check_depth(|st| {
                Ok(List::List(st.read_list(len, |st| st.read_any_list())?))
            }),
            Tag::Compound => self.check_depth(|st| {
                Ok(List::Compound(st.read_list(len, |st| st.read_compound())?))
            }),
            Tag::IntArray => Ok(List::IntArray(
                self.read_list(len, |st| st.read_int_array())?,
            )),
        }
    }

    fn read_list<T, F>(&mut self, len: i32, mut read_elem: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        // The declared length is untrusted, so cap the preallocation.
        let mut list = Vec::with_capacity(cautious_capacity::<T>(len as usize));

        for _ in 0..len {
            list.push(read_elem(self)?);
        }

        Ok(list)
    }

    fn read_compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::new();

        loop {
            let tag = self.read_tag()?;

            if tag == Tag::End {
                return Ok(compound);
            }

            let name = self.read_string()?;
            compound.insert(name, self.read_value(tag)?);
        }
    }

    fn read_int_array(&mut self) -> Result<Vec<i32>> {
        let len = self.read_int()?;

        if len < 0 {
            return Err(Error::new_owned(format!(
                "int array length of {len} is negative"
            )));
        }

        self.read_list(len, |st| st.read_int())
    }
}

fn cautious_capacity<T>(len: usize) -> usize {
    const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

    len.min(MAX_PREALLOC_BYTES / std::mem::size_of::<T>().max(1))
}

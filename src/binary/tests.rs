use pretty_assertions::assert_eq;

use crate::tag::Tag;
use crate::{
    compound, from_binary, from_binary_payload, to_binary, to_binary_payload, written_size,
    Compound, List, Value,
};

const ROOT_NAME: &str = "The root name‽";

fn example_value() -> Value {
    fn inner() -> Compound {
        compound! {
            "int" => i32::MIN,
            "long" => i64::MAX,
            "float" => 1e10_f32,
            "double" => f64::INFINITY,
        }
    }

    Value::Compound(compound! {
        "byte" => 123_i8,
        "list_of_int" => List::Int(vec![3, -7, 5]),
        "list_of_string" => List::String(vec![
            "foo".to_owned(),
            "bar".to_owned(),
            "baz".to_owned()
        ]),
        "string" => "aé日",
        "surrogate_pair_string" => "crab: 🦀",
        "nul_string" => "a\0b",
        "compound" => inner(),
        "list_of_compound" => List::Compound(vec![
            inner(),
            inner(),
            inner(),
        ]),
        "list_of_list" => List::List(vec![
            List::Byte(vec![1, 2]),
            List::Byte(vec![]),
        ]),
        "empty_list" => List::End,
        "int_array" => vec![5, -9, i32::MIN, 0, i32::MAX],
        "byte_array" => vec![0_i8, 2, 3],
    })
}

#[test]
fn round_trip() {
    let mut buf = Vec::new();

    let value = example_value();

    to_binary(&value, &mut buf, ROOT_NAME).unwrap();

    let (root_name, decoded) = from_binary(&mut buf.as_slice()).unwrap().unwrap();

    assert_eq!(root_name, ROOT_NAME);
    assert_eq!(value, decoded);
}

#[test]
fn written_size_is_exact() {
    let value = example_value();

    let mut buf = Vec::new();
    to_binary(&value, &mut buf, ROOT_NAME).unwrap();

    assert_eq!(written_size(&value, ROOT_NAME), buf.len());

    let long = Value::Long(-1);
    let mut buf = Vec::new();
    to_binary(&long, &mut buf, "lng").unwrap();

    assert_eq!(written_size(&long, "lng"), buf.len());
}

#[test]
fn known_byte_layout() {
    // "items" precedes "x" in sorted key order and in insertion order, so
    // the layout is the same under either map backing.
    let value = Value::Compound(compound! {
        "items" => List::String(vec!["a".to_owned(), "b".to_owned()]),
        "x" => 5,
    });

    let mut expected = vec![Tag::Compound as u8, 0, 4];
    expected.extend(b"root");
    expected.extend([Tag::List as u8, 0, 5]);
    expected.extend(b"items");
    expected.extend([Tag::String as u8, 0, 0, 0, 2]);
    expected.extend([0, 1, b'a', 0, 1, b'b']);
    expected.extend([Tag::Int as u8, 0, 1, b'x']);
    expected.extend([0, 0, 0, 5]);
    expected.push(Tag::End as u8);

    let mut buf = Vec::new();
    to_binary(&value, &mut buf, "root").unwrap();

    assert_eq!(buf, expected);

    let (root_name, decoded) = from_binary(&mut buf.as_slice()).unwrap().unwrap();
    assert_eq!(root_name, "root");
    assert_eq!(decoded, value);
}

#[test]
fn empty_compound_layout() {
    let value = Value::Compound(Compound::new());

    let mut buf = Vec::new();
    to_binary(&value, &mut buf, "test").unwrap();

    assert_eq!(
        buf,
        [Tag::Compound as u8, 0, 4, b't', b'e', b's', b't', Tag::End as u8]
    );

    let (root_name, decoded) = from_binary(&mut buf.as_slice()).unwrap().unwrap();
    assert_eq!(root_name, "test");
    assert_eq!(decoded, value);
}

#[test]
fn any_root_kind() {
    for value in [
        Value::Byte(-1),
        Value::Long(i64::MIN),
        Value::String("just a string".into()),
        Value::List(List::Double(vec![0.1, 0.2])),
        Value::IntArray(vec![1, 2, 3]),
    ] {
        let mut buf = Vec::new();
        to_binary(&value, &mut buf, "name").unwrap();

        let (root_name, decoded) = from_binary(&mut buf.as_slice()).unwrap().unwrap();
        assert_eq!(root_name, "name");
        assert_eq!(decoded, value);
    }
}

#[test]
fn end_root_decodes_to_none() {
    let buf = [Tag::End as u8];
    assert_eq!(from_binary(&mut buf.as_slice()).unwrap(), None);
}

#[test]
fn forced_kind_payload() {
    let value = Value::Int(0xdead);

    let mut buf = Vec::new();
    to_binary_payload(&value, &mut buf).unwrap();

    assert_eq!(buf, [0, 0, 0xde, 0xad]);

    let decoded = from_binary_payload(&mut buf.as_slice(), Tag::Int).unwrap();
    assert_eq!(decoded, value);

    // An end tag has no payload to force.
    assert!(from_binary_payload(&mut buf.as_slice(), Tag::End).is_err());
}

#[test]
fn unknown_tag_byte_is_fatal() {
    let buf = [12_u8, 0, 0];
    assert!(from_binary(&mut buf.as_slice()).is_err());

    // Also inside a compound body.
    let mut buf = vec![Tag::Compound as u8, 0, 0];
    buf.extend([0xff, 0, 0]);
    assert!(from_binary(&mut buf.as_slice()).is_err());
}

#[test]
fn truncated_input_is_fatal() {
    let mut buf = Vec::new();
    to_binary(&example_value(), &mut buf, ROOT_NAME).unwrap();

    // Chopping the buffer anywhere must produce an error, not a partial
    // tree. (Skip index 0: an empty slice still yields an honest error.)
    for len in [1, buf.len() / 2, buf.len() - 1] {
        assert!(from_binary(&mut &buf[..len]).is_err());
    }

    assert!(from_binary(&mut &b""[..]).is_err());
}

#[test]
fn negative_lengths_are_fatal() {
    // Byte array of length -1.
    let mut buf = vec![Tag::ByteArray as u8, 0, 0];
    buf.extend((-1_i32).to_be_bytes());
    assert!(from_binary(&mut buf.as_slice()).is_err());

    // Int list of length -2.
    let mut buf = vec![Tag::List as u8, 0, 0, Tag::Int as u8];
    buf.extend((-2_i32).to_be_bytes());
    assert!(from_binary(&mut buf.as_slice()).is_err());
}

#[test]
fn end_list_must_be_empty() {
    // Element kind End with a zero count is the empty list.
    let mut buf = vec![Tag::List as u8, 0, 0, Tag::End as u8];
    buf.extend(0_i32.to_be_bytes());

    let (_, decoded) = from_binary(&mut buf.as_slice()).unwrap().unwrap();
    assert_eq!(decoded, Value::List(List::End));

    // A nonzero count with element kind End is malformed.
    let mut buf = vec![Tag::List as u8, 0, 0, Tag::End as u8];
    buf.extend(3_i32.to_be_bytes());
    assert!(from_binary(&mut buf.as_slice()).is_err());
}

#[test]
fn deeply_nested_compound_decode_fails_gracefully() {
    let n = 10_000;

    let mut buf = vec![Tag::Compound as u8, 0, 0]; // Root compound
    for _ in 0..n {
        buf.extend([Tag::Compound as u8, 0, 0]);
    }
    buf.extend((0..n).map(|_| Tag::End as u8));
    buf.push(Tag::End as u8); // End root compound

    // Must not overflow the stack.
    assert!(from_binary(&mut buf.as_slice()).is_err());
}

#[test]
fn deeply_nested_list_decode_fails_gracefully() {
    let n = 10_000;

    // Root compound with one list field.
    let mut buf = vec![Tag::Compound as u8, 0, 0, Tag::List as u8, 0, 0];
    for _ in 0..n - 1 {
        buf.extend([Tag::List as u8]);
        buf.extend(1_i32.to_be_bytes()); // List of one list
    }
    buf.push(Tag::Byte as u8); // Innermost: empty list of bytes
    buf.extend(0_i32.to_be_bytes());
    buf.push(Tag::End as u8); // End root compound

    // Must not overflow the stack.
    assert!(from_binary(&mut buf.as_slice()).is_err());
}

#[test]
fn moderate_nesting_round_trips() {
    let mut list = List::Byte(vec![7]);
    for _ in 0..100 {
        list = List::List(vec![list]);
    }
    let value = Value::List(list);

    let mut buf = Vec::new();
    to_binary(&value, &mut buf, "").unwrap();

    let (_, decoded) = from_binary(&mut buf.as_slice()).unwrap().unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn crlf_is_normalized_on_encode() {
    let value = Value::String("line one\r\nline two".into());

    let mut buf = Vec::new();
    to_binary(&value, &mut buf, "").unwrap();

    assert_eq!(written_size(&value, ""), buf.len());

    let (_, decoded) = from_binary(&mut buf.as_slice()).unwrap().unwrap();
    assert_eq!(decoded, Value::String("line one\nline two".into()));
}

#[cfg(feature = "preserve_order")]
#[test]
fn preserves_order() {
    let letters = ["g", "b", "d", "e", "h", "z", "m", "a", "q"];

    let mut c = Compound::new();
    for l in letters {
        c.insert(l, 0_i8);
    }

    let mut buf = Vec::new();
    to_binary(&Value::Compound(c), &mut buf, "").unwrap();

    let (_, decoded) = from_binary(&mut buf.as_slice()).unwrap().unwrap();

    let Value::Compound(decoded) = decoded else {
        panic!("expected a compound")
    };

    for (k, l) in decoded.keys().zip(letters) {
        assert_eq!(k, l);
    }
}

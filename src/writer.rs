//! Encodes a [`Value`] tree into the binary wire format.
//!
//! Encoding is a single depth-first pass: each element is written into a
//! scratch buffer while its structural hash is computed from its children
//! bottom-up, then the caller decides between the small-list and
//! large-list framing once a list's full child count and hash are known.
//! Symbols are interned as they're encountered, so the final symbol table
//! is assembled only after the whole tree has been walked once.

use crate::error::{Error, Result};
use crate::hash;
use crate::limits::Limits;
use crate::symtab::Interner;
use crate::tag::{self, SEntryType};
use crate::value::Value;
use crate::varint;
use byteorder::{LittleEndian, WriteBytesExt};

/// Encodes `value` into a complete, self-contained buffer: version byte,
/// symbol table, then the root element.
pub fn write(value: &Value) -> Result<Vec<u8>> {
    write_with_limits(value, &Limits::default())
}

pub fn write_with_limits(value: &Value, limits: &Limits) -> Result<Vec<u8>> {
    let mut interner = Interner::new();
    let mut element_buf = Vec::new();
    write_element(value, &mut element_buf, &mut interner, limits, 0)?;

    let mut out = Vec::with_capacity(element_buf.len() + 16);
    out.push(tag::FORMAT_VERSION);
    varint::encode(&mut out, interner.len() as u64);
    for sym in interner.entries() {
        let bytes = sym.as_bytes();
        varint::encode(&mut out, bytes.len() as u64);
        out.extend_from_slice(bytes);
    }
    out.extend_from_slice(&element_buf);
    Ok(out)
}

/// Writes one element, returning its structural hash.
fn write_element(
    value: &Value,
    out: &mut Vec<u8>,
    interner: &mut Interner,
    limits: &Limits,
    depth: usize,
) -> Result<u32> {
    if depth > limits.max_depth {
        return Err(Error::Limit(format!(
            "nesting depth exceeds {}",
            limits.max_depth
        )));
    }

    match value {
        Value::Nil => {
            out.push(tag::TAG_NIL);
            Ok(0)
        }
        Value::Integer(v) => write_integer(*v, out),
        Value::Float(v) => write_float(*v, out),
        Value::Symbol(s) => write_symbol(s, out, interner, limits),
        Value::String(bytes) => write_string(bytes, out, limits),
        Value::List(items) => write_list(items, out, interner, limits, depth),
    }
}

fn write_integer(v: i64, out: &mut Vec<u8>) -> Result<u32> {
    if (tag::SMALLINT_MIN..=tag::SMALLINT_MAX).contains(&v) {
        let encoded = (v + tag::SMALLINT_BIAS) as u8;
        out.push(tag::TAG_SMALLINT | encoded);
    } else {
        out.push(tag::TAG_INTEGER);
        varint::encode(out, varint::zigzag_encode(v));
    }
    let type_hash = hash::hash_uint32(hash::INTEGER_TAG);
    let value_hash = hash::hash_int64(v);
    Ok(hash::hash_combine(type_hash, value_hash))
}

fn write_float(v: f64, out: &mut Vec<u8>) -> Result<u32> {
    out.push(tag::TAG_FLOAT);
    out.write_f64::<LittleEndian>(v).expect("Vec<u8> write cannot fail");
    let type_hash = hash::hash_uint32(hash::FLOAT_TAG);
    let value_hash = hash::hash_float64(v);
    Ok(hash::hash_combine(type_hash, value_hash))
}

fn write_symbol(
    s: &str,
    out: &mut Vec<u8>,
    interner: &mut Interner,
    limits: &Limits,
) -> Result<u32> {
    let idx = interner.intern(s, limits)?;
    out.push(tag::TAG_SYMBOL_REF);
    varint::encode(out, idx as u64);
    Ok(hash::hash_string_with_tag(hash::SYMBOL_TAG, s.as_bytes()))
}

fn write_string(bytes: &[u8], out: &mut Vec<u8>, limits: &Limits) -> Result<u32> {
    if bytes.len() > limits.max_string_len {
        return Err(Error::Limit(format!(
            "string of {} bytes exceeds {}",
            bytes.len(),
            limits.max_string_len
        )));
    }
    if bytes.len() <= tag::SHORT_STRING_MAX {
        out.push(tag::TAG_SHORT_STRING | bytes.len() as u8);
        out.extend_from_slice(bytes);
    } else {
        out.push(tag::TAG_LONG_STRING);
        varint::encode(out, bytes.len() as u64);
        out.extend_from_slice(bytes);
    }
    Ok(hash::hash_string_with_tag(hash::STRING_TAG, bytes))
}

fn write_list(
    items: &[Value],
    out: &mut Vec<u8>,
    interner: &mut Interner,
    limits: &Limits,
    depth: usize,
) -> Result<u32> {
    if items.is_empty() {
        out.push(tag::TAG_NIL);
        return Ok(0);
    }
    if items.len() > limits.max_list_len {
        return Err(Error::Limit(format!(
            "list of {} elements exceeds {}",
            items.len(),
            limits.max_list_len
        )));
    }

    let mut elements = Vec::new();
    let mut sentries = Vec::with_capacity(items.len());
    let mut child_hashes = Vec::with_capacity(items.len());

    for item in items {
        let elem_start = elements.len() as u32;
        let child_hash = write_element(item, &mut elements, interner, limits, depth + 1)?;
        child_hashes.push(child_hash);
        let sentry_ty = sentry_type_of(item);
        sentries.push(tag::sentry_make(sentry_ty, elem_start));
    }

    let count = items.len() as u32;
    let mut list_hash = hash::hash_uint32(count);
    list_hash = hash::hash_combine(list_hash, hash::hash_uint32(hash::LIST_TAG));
    for (i, &child_hash) in child_hashes.iter().enumerate() {
        list_hash = hash::combine_child(list_hash, child_hash, i);
    }

    if items.len() <= tag::SMALL_LIST_MAX {
        out.push(tag::TAG_LIST | items.len() as u8);
        varint::encode(out, elements.len() as u64);
        out.extend_from_slice(&elements);
    } else {
        out.push(tag::TAG_LIST);
        out.write_u32::<LittleEndian>(count).expect("Vec<u8> write cannot fail");
        out.write_u32::<LittleEndian>(list_hash).expect("Vec<u8> write cannot fail");
        for &entry in &sentries {
            out.write_u32::<LittleEndian>(entry).expect("Vec<u8> write cannot fail");
        }
        out.extend_from_slice(&elements);
    }

    Ok(list_hash)
}

/// An empty `Value::List` is written identically to `Value::Nil` (both are
/// the empty s-expression), so this never needs to classify one.
fn sentry_type_of(value: &Value) -> SEntryType {
    match value {
        Value::Nil => SEntryType::Nil,
        Value::Integer(_) => SEntryType::Integer,
        Value::Float(_) => SEntryType::Float,
        Value::Symbol(_) => SEntryType::Symbol,
        Value::String(_) => SEntryType::String,
        Value::List(items) if items.is_empty() => SEntryType::Nil,
        Value::List(_) => SEntryType::List,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_encodes_to_version_plus_empty_symtab_plus_nil_tag() {
        let buf = write(&Value::Nil).unwrap();
        assert_eq!(buf, vec![tag::FORMAT_VERSION, 0x00, tag::TAG_NIL]);
    }

    #[test]
    fn empty_list_equals_nil_on_the_wire() {
        assert_eq!(write(&Value::List(vec![])).unwrap(), write(&Value::Nil).unwrap());
    }

    #[test]
    fn smallint_uses_inline_encoding() {
        let buf = write(&Value::Integer(5)).unwrap();
        assert_eq!(buf[2], tag::TAG_SMALLINT | 21);
    }

    #[test]
    fn large_integer_uses_varint_encoding() {
        let buf = write(&Value::Integer(1_000_000)).unwrap();
        assert_eq!(buf[2] & tag::TAG_MASK, tag::TAG_INTEGER);
    }

    #[test]
    fn repeated_symbol_interns_once() {
        let v = Value::List(vec![Value::symbol("x"), Value::symbol("x")]);
        let buf = write(&v).unwrap();
        // symbol count varint sits right after the version byte.
        assert_eq!(buf[1], 1);
    }

    #[test]
    fn five_element_list_uses_large_framing() {
        let v = Value::List((0..5).map(Value::Integer).collect());
        let buf = write(&v).unwrap();
        let tag_byte = buf[2];
        assert_eq!(tag_byte, tag::TAG_LIST);
    }

    #[test]
    fn four_element_list_uses_small_framing() {
        let v = Value::List((0..4).map(Value::Integer).collect());
        let buf = write(&v).unwrap();
        let tag_byte = buf[2];
        assert_eq!(tag_byte & tag::TAG_MASK, tag::TAG_LIST);
        assert_eq!(tag_byte & tag::DATA_MASK, 4);
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut v = Value::Nil;
        for _ in 0..10 {
            v = Value::List(vec![v]);
        }
        let limits = Limits {
            max_depth: 5,
            ..Limits::default()
        };
        assert!(write_with_limits(&v, &limits).is_err());
    }
}

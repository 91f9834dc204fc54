//! A binary codec and query engine for S-expressions.
//!
//! A value is parsed from text with [`parse`], encoded with [`write`],
//! and then queried directly against the encoded bytes through a
//! [`Reader`] and [`Cursor`] — `car`/`cdr`/`nth` navigation, structural
//! [`equal`]ity, [`contains`]/[`contains_key`] containment, a
//! [`structural_hash::hash`] usable as a cache or index key, and
//! [`extract_index_keys`]/[`extract_query_keys`] for building an
//! inverted index over a collection of encoded values. Nothing here
//! materializes a [`Value`] tree unless the caller asks for one.

#![allow(dead_code)]

mod bloom;
mod containment;
mod equality;
mod error;
mod hash;
mod index_keys;
mod limits;
mod navigator;
mod nil;
mod parser;
mod printer;
mod reader;
mod structural_hash;
mod symtab;
mod tag;
mod value;
mod varint;
mod writer;

pub use crate::bloom::{may_contain as bloom_may_contain, signature as compute_bloom, BloomSig};
pub use crate::containment::{contains, contains_key};
pub use crate::equality::equal;
pub use crate::error::{Error, Result};
pub use crate::index_keys::{extract_index_keys, extract_query_keys, Strategy};
pub use crate::limits::Limits;
pub use crate::navigator::Cursor;
pub use crate::nil::{cursor as nil_cursor, encoded as nil_encoded};
pub use crate::parser::{parse, parse_with_limits};
pub use crate::printer::{print, print_value};
pub use crate::reader::Reader;
pub use crate::structural_hash::{hash, hash_extended};
pub use crate::tag::ValueType;
pub use crate::value::Value;
pub use crate::writer::{write, write_with_limits};

/// `true` if `a` and `b` are not [`equal`].
pub fn not_equal(a: &Cursor, b: &Cursor) -> Result<bool> {
    Ok(!equal(a, b)?)
}

/// This element's first child, if it's a non-empty list.
pub fn car<'a>(cursor: &Cursor<'a>) -> Result<Option<Cursor<'a>>> {
    cursor.car()
}

/// This element's remaining children after the first, as a list. `cdr`
/// of `nil` is absent, like `car`; `cdr` of a one-element list is a
/// present `nil` value, not absent.
pub fn cdr<'a>(cursor: &Cursor<'a>) -> Result<Option<Cursor<'a>>> {
    cursor.cdr()
}

/// The child at `idx`, if this is a list with at least `idx + 1`
/// elements.
pub fn nth<'a>(cursor: &Cursor<'a>, idx: usize) -> Result<Option<Cursor<'a>>> {
    cursor.nth(idx)
}

/// Alias for [`car`], used by the index-key extractor's "list head" key.
pub fn head<'a>(cursor: &Cursor<'a>) -> Result<Option<Cursor<'a>>> {
    cursor.head()
}

/// Number of elements if this is a list, `0` for `nil`, and an error for
/// any other atom.
pub fn length(cursor: &Cursor) -> Result<usize> {
    cursor.length()
}

/// This element's [`ValueType`].
pub fn typeof_(cursor: &Cursor) -> Result<ValueType> {
    cursor.type_of()
}

pub fn is_nil(cursor: &Cursor) -> Result<bool> {
    cursor.is_nil()
}

pub fn is_list(cursor: &Cursor) -> Result<bool> {
    cursor.is_list()
}

pub fn is_atom(cursor: &Cursor) -> Result<bool> {
    Ok(!cursor.is_list()?)
}

pub fn is_symbol(cursor: &Cursor) -> Result<bool> {
    Ok(cursor.type_of()? == ValueType::Symbol)
}

pub fn is_string(cursor: &Cursor) -> Result<bool> {
    Ok(cursor.type_of()? == ValueType::String)
}

pub fn is_number(cursor: &Cursor) -> Result<bool> {
    Ok(matches!(cursor.type_of()?, ValueType::Integer | ValueType::Float))
}

// Value-based convenience wrappers. Each encodes its argument(s) with
// `write` and delegates to the cursor-based implementation above, so the
// algorithm itself exists exactly once, over cursors. For a caller doing
// one comparison this is fine; for anything in a loop, encode once with
// `write` and reuse a `Reader` instead of calling these repeatedly.

pub fn equal_values(a: &Value, b: &Value) -> Result<bool> {
    let (buf_a, buf_b) = (write(a)?, write(b)?);
    equal(&Reader::open(&buf_a)?.root(), &Reader::open(&buf_b)?.root())
}

pub fn not_equal_values(a: &Value, b: &Value) -> Result<bool> {
    Ok(!equal_values(a, b)?)
}

pub fn contains_values(container: &Value, needle: &Value) -> Result<bool> {
    let (buf_c, buf_n) = (write(container)?, write(needle)?);
    contains(&Reader::open(&buf_c)?.root(), &Reader::open(&buf_n)?.root())
}

pub fn contains_key_values(container: &Value, needle: &Value) -> Result<bool> {
    let (buf_c, buf_n) = (write(container)?, write(needle)?);
    contains_key(&Reader::open(&buf_c)?.root(), &Reader::open(&buf_n)?.root())
}

pub fn hash_value(v: &Value) -> Result<u32> {
    hash(&Reader::open(&write(v)?)?.root())
}

pub fn hash_extended_value(v: &Value, seed: i64) -> Result<i64> {
    hash_extended(&Reader::open(&write(v)?)?.root(), seed)
}

pub fn index_keys_for_value(v: &Value) -> Result<Vec<i32>> {
    extract_index_keys(&Reader::open(&write(v)?)?.root())
}

pub fn query_keys_for_value(v: &Value, strategy: Strategy) -> Result<Vec<i32>> {
    extract_query_keys(&Reader::open(&write(v)?)?.root(), strategy)
}

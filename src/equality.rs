//! Semantic equality between two values, each possibly from an encoded
//! buffer with its own independent symbol table.
//!
//! Two encodings of the same expression don't need to agree byte-for-byte
//! — `(a)` parsed on its own and `(a)` extracted as the first element of
//! `(a b c)` carry different symbol tables (`["a"]` vs `["a", "b", "c"]`),
//! but both represent the same symbol. The byte-identical fast path is
//! only safe when both cursors share a buffer (and so a symbol table):
//! a symbol's raw encoding is a table index, not its text, so two
//! standalone symbols each interned at index 0 would otherwise look
//! byte-identical without being the same symbol. Outside that case,
//! comparison walks both trees structurally, comparing symbols by text
//! rather than table index.
//!
//! One divergence from the source on purpose: its top-level switch
//! rejects two elements as unequal the moment their *wire* tags differ,
//! which means a value written as `SMALLINT` and the same value written
//! as full `INTEGER` compare unequal — and likewise `SHORT_STRING` vs
//! `LONG_STRING` — even though both pairs are the same semantic type.
//! This crate's `type_of` already collapses those distinctions (see
//! `tag.rs`), so comparison is done by `ValueType`, not raw tag byte, and
//! the exception applies uniformly rather than only on some code paths.

use crate::error::Result;
use crate::navigator::Cursor;
use crate::tag::ValueType;

/// Structural equality: `true` if `a` and `b` denote the same value.
pub fn equal(a: &Cursor, b: &Cursor) -> Result<bool> {
    if a.same_buffer(b) {
        if let (Ok(bytes_a), Ok(bytes_b)) = (a.raw_bytes(), b.raw_bytes()) {
            if bytes_a == bytes_b {
                return Ok(true);
            }
        }
    }
    equal_semantic(a, b)
}

fn equal_semantic(a: &Cursor, b: &Cursor) -> Result<bool> {
    let ty_a = a.type_of()?;
    let ty_b = b.type_of()?;
    if ty_a != ty_b {
        return Ok(false);
    }

    match ty_a {
        ValueType::Nil => Ok(true),
        ValueType::Integer => Ok(a.as_integer()? == b.as_integer()?),
        // IEEE `==`: NaN != NaN, +0.0 == -0.0. Applied uniformly, matching
        // the hash engine's own `-0.0` normalization.
        ValueType::Float => Ok(a.as_float()? == b.as_float()?),
        ValueType::Symbol => Ok(a.as_symbol()? == b.as_symbol()?),
        ValueType::String => Ok(a.as_string()? == b.as_string()?),
        ValueType::List => {
            let children_a = a.children()?;
            let children_b = b.children()?;
            if children_a.len() != children_b.len() {
                return Ok(false);
            }
            for (ca, cb) in children_a.iter().zip(children_b.iter()) {
                if !equal(ca, cb)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

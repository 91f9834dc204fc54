//! Whole-value structural hash.
//!
//! Two values that are [`crate::equality::equal`] always hash the same
//! under [`hash`]; a large list short-circuits to the hash stored in its
//! header rather than recomputing it from scratch.

use crate::error::Result;
use crate::hash as hashfn;
use crate::navigator::Cursor;
use crate::tag::ValueType;

/// The 32-bit structural hash of `cursor`'s value.
pub fn hash(cursor: &Cursor) -> Result<u32> {
    if let Some(stored) = cursor.stored_hash() {
        return Ok(stored);
    }

    match cursor.type_of()? {
        ValueType::Nil => Ok(0),
        ValueType::Integer => {
            let v = cursor.as_integer()?.expect("ValueType::Integer implies as_integer");
            Ok(hashfn::hash_combine(
                hashfn::hash_uint32(hashfn::INTEGER_TAG),
                hashfn::hash_int64(v),
            ))
        }
        ValueType::Float => {
            let v = cursor.as_float()?.expect("ValueType::Float implies as_float");
            Ok(hashfn::hash_combine(
                hashfn::hash_uint32(hashfn::FLOAT_TAG),
                hashfn::hash_float64(v),
            ))
        }
        ValueType::Symbol => {
            let sym = cursor.as_symbol()?.expect("ValueType::Symbol implies as_symbol");
            Ok(hashfn::hash_string_with_tag(hashfn::SYMBOL_TAG, sym))
        }
        ValueType::String => {
            let s = cursor.as_string()?.expect("ValueType::String implies as_string");
            Ok(hashfn::hash_string_with_tag(hashfn::STRING_TAG, s))
        }
        ValueType::List => {
            let children = cursor.children()?;
            let mut list_hash = hashfn::hash_uint32(children.len() as u32);
            list_hash = hashfn::hash_combine(list_hash, hashfn::hash_uint32(hashfn::LIST_TAG));
            for (i, child) in children.iter().enumerate() {
                let child_hash = hash(child)?;
                list_hash = hashfn::combine_child(list_hash, child_hash, i);
            }
            Ok(list_hash)
        }
    }
}

/// A 64-bit extension of [`hash`], folding in a caller-supplied seed. With
/// `seed = 0` this is just the plain 32-bit hash, zero-extended — the same
/// value `hash_extended` and `hash` agree on, for parallel workers that
/// pass `seed = 0`. A nonzero seed is mixed in with its halves swapped,
/// multiplied by the splitmix64 constant, then folded back to 64 bits —
/// good distribution without needing a second hash family.
pub fn hash_extended(cursor: &Cursor, seed: i64) -> Result<i64> {
    let h = hash(cursor)? as u64;
    if seed == 0 {
        return Ok(h as i64);
    }
    let mixed_seed = (seed as u64).rotate_left(32);
    let mut mixed = h ^ mixed_seed;
    mixed = mixed.wrapping_mul(0x9E3779B97F4A7C15);
    mixed = (mixed >> 32) ^ mixed;
    Ok(mixed as i64)
}

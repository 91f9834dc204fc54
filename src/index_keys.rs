//! Index key extraction for inverted (GIN-style) indexing.
//!
//! Each key is a 32-bit integer with its high bit always set (so `0` is
//! never a valid key and can serve as a hash-set sentinel elsewhere) and
//! its top byte a type marker, keeping atoms of different types from
//! colliding on the same key even if their value hashes happen to match.
//!
//! Value extraction ([`extract_index_keys`]) and query extraction
//! ([`extract_query_keys`]) must stay in lockstep: every key a query could
//! produce has to be one a matching stored value would also produce, or
//! the index silently drops real matches.

use crate::error::Result;
use crate::hash;
use crate::navigator::Cursor;
use crate::tag::ValueType;

const KEY_TYPE_ATOM: u32 = 0x0100_0000;
const KEY_TYPE_LIST_HEAD: u32 = 0x0200_0000;
const KEY_TYPE_SYMBOL: u32 = 0x0300_0000;
const KEY_TYPE_STRING: u32 = 0x0400_0000;
const KEY_TYPE_INTEGER: u32 = 0x0500_0000;
const KEY_TYPE_FLOAT: u32 = 0x0600_0000;
const KEY_TYPE_PAIR: u32 = 0x0700_0000;

/// Keys are capped per value/query, matching the source's own safety
/// limit — past this many distinct keys, extraction just stops early
/// rather than growing without bound.
const MAX_KEYS: usize = 1024;

/// Which query operator the extracted keys are meant to drive a lookup
/// for. Determines whether pair keys are emitted for the query side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `@>` structural containment: the query's shape must appear intact
    /// inside the indexed value, so pair keys are safe to emit.
    Contains,
    /// `@>>` key-based containment: the query may be a strict subset of a
    /// wider list, so pair keys (which assert an exact 2-element shape)
    /// must be suppressed or they'd reject true matches.
    ContainsKey,
}

/// O(1)-amortized deduplicating set for already-emitted keys, open
/// addressed with linear probing over a fixed power-of-two table. Sized
/// well above [`MAX_KEYS`] to keep probe chains short even when every
/// key collides into one of a handful of hash buckets.
struct KeyHashSet {
    slots: Vec<i32>,
}

const HASHSET_SIZE: usize = 8192;
const HASHSET_MASK: usize = HASHSET_SIZE - 1;
const HASHSET_EMPTY: i32 = 0x7FFF_FFFF;

impl KeyHashSet {
    fn new() -> Self {
        KeyHashSet {
            slots: vec![HASHSET_EMPTY; HASHSET_SIZE],
        }
    }

    /// Returns `true` if `key` was not already present (and is now
    /// recorded); `false` if it was a duplicate.
    fn insert(&mut self, key: i32) -> bool {
        let mut idx = (key as u32 as usize) & HASHSET_MASK;
        for _ in 0..HASHSET_SIZE {
            if self.slots[idx] == HASHSET_EMPTY {
                self.slots[idx] = key;
                return true;
            }
            if self.slots[idx] == key {
                return false;
            }
            idx = (idx + 1) & HASHSET_MASK;
        }
        false
    }
}

fn make_atom_key(type_marker: u32, value_hash: u32) -> i32 {
    let combined = type_marker ^ value_hash;
    (combined | 0x8000_0000) as i32
}

fn add_key(keys: &mut Vec<i32>, seen: &mut KeyHashSet, key: i32) {
    if keys.len() >= MAX_KEYS {
        return;
    }
    if seen.insert(key) {
        keys.push(key);
    }
}

/// An element's raw value hash, untagged by type — used only to seed key
/// material, never compared against [`crate::structural_hash::hash`].
fn element_hash(cursor: &Cursor) -> Result<u32> {
    Ok(match cursor.type_of()? {
        ValueType::Nil => hash::hash_uint32(0),
        ValueType::Integer => hash::hash_int64(cursor.as_integer()?.expect("Integer")),
        ValueType::Float => hash::hash_float64(cursor.as_float()?.expect("Float")),
        ValueType::Symbol => hash::hash_bytes(cursor.as_symbol()?.expect("Symbol")),
        ValueType::String => hash::hash_bytes(cursor.as_string()?.expect("String")),
        ValueType::List => {
            let children = cursor.children()?;
            match children.first() {
                Some(head) => element_hash(head)?,
                None => hash::hash_uint32(0),
            }
        }
    })
}

/// A 2-element list whose head is a symbol — `(name value)` — gets a
/// dedicated pair key combining both elements, which is more selective
/// than a bare list-head key for the common key-value shape.
fn is_pair_list(children: &[Cursor]) -> Result<bool> {
    if children.len() != 2 {
        return Ok(false);
    }
    Ok(children[0].type_of()? == ValueType::Symbol)
}

fn extract_recursive(
    cursor: &Cursor,
    keys: &mut Vec<i32>,
    seen: &mut KeyHashSet,
    emit_pair_keys: bool,
) -> Result<()> {
    if keys.len() >= MAX_KEYS {
        return Ok(());
    }

    match cursor.type_of()? {
        ValueType::Nil => add_key(keys, seen, make_atom_key(KEY_TYPE_ATOM, hash::hash_uint32(0))),
        ValueType::Integer => {
            let h = hash::hash_int64(cursor.as_integer()?.expect("Integer"));
            add_key(keys, seen, make_atom_key(KEY_TYPE_INTEGER, h));
        }
        ValueType::Float => {
            let h = hash::hash_float64(cursor.as_float()?.expect("Float"));
            add_key(keys, seen, make_atom_key(KEY_TYPE_FLOAT, h));
        }
        ValueType::Symbol => {
            let h = hash::hash_bytes(cursor.as_symbol()?.expect("Symbol"));
            add_key(keys, seen, make_atom_key(KEY_TYPE_SYMBOL, h));
        }
        ValueType::String => {
            let h = hash::hash_bytes(cursor.as_string()?.expect("String"));
            add_key(keys, seen, make_atom_key(KEY_TYPE_STRING, h));
        }
        ValueType::List => {
            let children = cursor.children()?;
            if children.is_empty() {
                // Matches the source's value-side behavior: an empty list
                // contributes no key of its own (the query side still
                // emits an atom key for an empty-list query, handled by
                // its caller).
                return Ok(());
            }

            let pair = is_pair_list(&children)?;
            let head_hash = element_hash(&children[0])?;

            if pair && emit_pair_keys {
                let second_hash = element_hash(&children[1])?;
                let mut pair_hash = hash::hash_combine(KEY_TYPE_PAIR, head_hash);
                pair_hash = hash::hash_combine(pair_hash, second_hash);
                add_key(keys, seen, make_atom_key(KEY_TYPE_PAIR, pair_hash));
            } else if !pair {
                add_key(keys, seen, make_atom_key(KEY_TYPE_LIST_HEAD, head_hash));
            }

            for child in &children {
                extract_recursive(child, keys, seen, emit_pair_keys)?;
            }
        }
    }
    Ok(())
}

/// Extracts the index keys a stored value should be indexed under.
pub fn extract_index_keys(cursor: &Cursor) -> Result<Vec<i32>> {
    let mut keys = Vec::new();
    let mut seen = KeyHashSet::new();
    extract_recursive(cursor, &mut keys, &mut seen, true)?;
    if keys.is_empty() {
        keys.push(make_atom_key(KEY_TYPE_ATOM, 0));
    }
    Ok(keys)
}

/// Extracts the keys a query value should probe the index for, under the
/// given containment strategy.
pub fn extract_query_keys(cursor: &Cursor, strategy: Strategy) -> Result<Vec<i32>> {
    let emit_pair_keys = strategy != Strategy::ContainsKey;
    let mut keys = Vec::new();
    let mut seen = KeyHashSet::new();

    // An empty-list query still needs a probe key, unlike an empty-list
    // value, which is folded into the overall empty-extraction fallback
    // instead: an empty list nested in a query position must still
    // produce a key standing in for "an empty list occurred here".
    if cursor.type_of()? == ValueType::List && cursor.children()?.is_empty() {
        keys.push(make_atom_key(KEY_TYPE_ATOM, 0));
        return Ok(keys);
    }

    extract_recursive(cursor, &mut keys, &mut seen, emit_pair_keys)?;
    Ok(keys)
}

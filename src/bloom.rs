//! 64-bit Bloom signature for fast containment rejection.
//!
//! Every element's signature sets `k = 4` bits, derived from its semantic
//! hash by rotation; a parent's signature is the bitwise union of its own
//! shape contribution and all its children's signatures. `may_contain`
//! rejects candidates whose needle signature carries a bit the container
//! doesn't have — a false "maybe" is possible (k=4 over 64 bits gives
//! roughly 6% false-positive rate at 10 elements), a false "no" never is.

use crate::error::Result;
use crate::hash;
use crate::navigator::Cursor;
use crate::structural_hash;
use crate::tag::ValueType;

const BLOOM_K: u32 = 4;

/// A 64-bit Bloom signature.
pub type BloomSig = u64;

/// Derives `BLOOM_K` bit positions from an element's hash and sets them.
pub fn compute_sig(elem_hash: u32) -> BloomSig {
    let mut sig: BloomSig = 0;
    for i in 0..BLOOM_K {
        let rotated = hash::rotl32(elem_hash, i * 8);
        let bit_pos = rotated & 63;
        sig |= 1u64 << bit_pos;
    }
    sig
}

/// Unions a child's signature into a parent's.
pub fn combine(parent: BloomSig, child: BloomSig) -> BloomSig {
    parent | child
}

/// The signature a list contributes for its own shape, independent of its
/// children — folded into the union alongside each child's own signature so
/// that two lists of different lengths don't get identical signatures just
/// because their elements happen to match.
pub fn list_shape_sig(count: u32) -> BloomSig {
    let elem_hash = hash::hash_combine(hash::hash_uint32(count), hash::hash_uint32(hash::LIST_TAG));
    compute_sig(elem_hash)
}

/// The signature a `nil` atom contributes. `Nil`'s semantic hash is plain
/// zero, which would contribute nothing to a Bloom filter, so the
/// signature is computed from `nil`'s type tag instead — a container that
/// holds a `nil` element is then distinguishable, by Bloom test alone,
/// from one that doesn't.
pub fn nil_sig() -> BloomSig {
    compute_sig(hash::hash_uint32(hash::NIL_TAG))
}

/// Returns `true` if `needle` might be contained in `container` (Bloom says
/// maybe); `false` means definitely not contained.
pub fn may_contain(container: BloomSig, needle: BloomSig) -> bool {
    (needle & !container) == 0
}

/// The Bloom signature of an entire value: the union of every atom's
/// signature plus a shape contribution at every list level. Unlike the
/// structural hash, there's nothing to short-circuit on for a large list —
/// no signature is stored in its header — so this always walks every
/// descendant.
pub fn signature(cursor: &Cursor) -> Result<BloomSig> {
    match cursor.type_of()? {
        ValueType::Nil => Ok(nil_sig()),
        ValueType::List => {
            let children = cursor.children()?;
            let mut sig = list_shape_sig(children.len() as u32);
            for child in &children {
                sig = combine(sig, signature(child)?);
            }
            Ok(sig)
        }
        _ => Ok(compute_sig(structural_hash::hash(cursor)?)),
    }
}

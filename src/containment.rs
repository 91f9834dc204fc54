//! Containment queries: structural (`@>`) and key-based (`@>>`).
//!
//! Both start with a Bloom rejection (see [`crate::bloom`]) before falling
//! back to a real recursive search, since the Bloom test can only prove
//! absence, never presence.

use crate::bloom;
use crate::equality::equal;
use crate::error::Result;
use crate::navigator::Cursor;
use crate::tag::ValueType;

/// `true` if some subexpression of `container`, at any depth, is
/// structurally [`equal`] to `needle`.
///
/// Grounded on `contains_fast_scan`: a value contains itself, and a list
/// contains whatever any of its elements (recursively) contains.
pub fn contains(container: &Cursor, needle: &Cursor) -> Result<bool> {
    let container_sig = bloom::signature(container)?;
    let needle_sig = bloom::signature(needle)?;
    if !bloom::may_contain(container_sig, needle_sig) {
        return Ok(false);
    }
    contains_scan(container, needle)
}

fn contains_scan(container: &Cursor, needle: &Cursor) -> Result<bool> {
    if equal(container, needle)? {
        return Ok(true);
    }
    if container.is_list()? {
        for child in container.children()? {
            if contains_scan(&child, needle)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Key-based containment: `true` if `needle` matches `container` at some
/// depth under key semantics.
///
/// An atomic `needle` matches like [`contains`]. A list `needle`
/// `(head x y ...)` matches a list `(head a b c ...)` when both heads are
/// [`equal`] and every element of the needle's tail has a distinct match
/// somewhere in the container's tail, in any order — `(k 1 2)` is
/// contained in `(k 2 1 3)` but not in `(k 1)`, and two needle elements
/// cannot both claim the same container element.
///
/// Grounded on `contains_key_search`/`key_contains_recursive`, with one
/// fix: the source's tail search marks no container position as used, so
/// a single container element can satisfy more than one needle element
/// (e.g. `(k 1 1)` would wrongly match `(k 1 2)`). This implementation
/// tracks claimed positions explicitly.
pub fn contains_key(container: &Cursor, needle: &Cursor) -> Result<bool> {
    let container_sig = bloom::signature(container)?;
    let needle_sig = bloom::signature(needle)?;
    if !bloom::may_contain(container_sig, needle_sig) {
        return Ok(false);
    }
    contains_key_scan(container, needle)
}

fn contains_key_scan(container: &Cursor, needle: &Cursor) -> Result<bool> {
    if needle.type_of()? != ValueType::List {
        if equal(container, needle)? {
            return Ok(true);
        }
    } else if container.type_of()? == ValueType::List && key_matches(container, needle)? {
        return Ok(true);
    }

    if container.is_list()? {
        for child in container.children()? {
            if needle.type_of()? == ValueType::List && child.type_of()? != ValueType::List {
                continue;
            }
            if contains_key_scan(&child, needle)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Whether list `needle` key-matches list `container` at this exact
/// level: equal heads, and every tail element of `needle` claims a
/// distinct tail element of `container`.
fn key_matches(container: &Cursor, needle: &Cursor) -> Result<bool> {
    let container_children = container.children()?;
    let needle_children = needle.children()?;

    if needle_children.is_empty() {
        return Ok(true);
    }
    if container_children.len() < needle_children.len() {
        return Ok(false);
    }
    if !equal(&container_children[0], &needle_children[0])? {
        return Ok(false);
    }
    if needle_children.len() == 1 {
        return Ok(true);
    }

    let mut used = vec![false; container_children.len()];
    used[0] = true;

    'needle: for n in &needle_children[1..] {
        for (i, c) in container_children.iter().enumerate().skip(1) {
            if used[i] {
                continue;
            }
            if element_key_matches(c, n)? {
                used[i] = true;
                continue 'needle;
            }
        }
        return Ok(false);
    }
    Ok(true)
}

/// An atom needle matches by equality; a list needle matches by
/// [`key_matches`] against a list candidate.
fn element_key_matches(candidate: &Cursor, needle: &Cursor) -> Result<bool> {
    if needle.type_of()? != ValueType::List {
        equal(candidate, needle)
    } else if candidate.type_of()? == ValueType::List {
        key_matches(candidate, needle)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use crate::value::Value;
    use crate::writer::write;

    fn contains_values(container: &Value, needle: &Value) -> bool {
        let cb = write(container).unwrap();
        let nb = write(needle).unwrap();
        let cr = Reader::open(&cb).unwrap();
        let nr = Reader::open(&nb).unwrap();
        contains(&cr.root(), &nr.root()).unwrap()
    }

    fn contains_key_values(container: &Value, needle: &Value) -> bool {
        let cb = write(container).unwrap();
        let nb = write(needle).unwrap();
        let cr = Reader::open(&cb).unwrap();
        let nr = Reader::open(&nb).unwrap();
        contains_key(&cr.root(), &nr.root()).unwrap()
    }

    #[test]
    fn container_contains_nested_atom() {
        let container = Value::List(vec![
            Value::Integer(1),
            Value::List(vec![Value::Integer(2), Value::Integer(3)]),
        ]);
        assert!(contains_values(&container, &Value::Integer(3)));
        assert!(!contains_values(&container, &Value::Integer(4)));
    }

    #[test]
    fn container_contains_itself() {
        let v = Value::List(vec![Value::Integer(1)]);
        assert!(contains_values(&v, &v));
    }

    #[test]
    fn key_containment_matches_by_head_and_order_independent_tail() {
        let container = Value::List(vec![
            Value::symbol("k"),
            Value::Integer(2),
            Value::Integer(1),
            Value::Integer(3),
        ]);
        let needle = Value::List(vec![Value::symbol("k"), Value::Integer(1), Value::Integer(2)]);
        assert!(contains_key_values(&container, &needle));
    }

    #[test]
    fn key_containment_needs_distinct_positions() {
        let container = Value::List(vec![Value::symbol("k"), Value::Integer(1), Value::Integer(2)]);
        let needle = Value::List(vec![Value::symbol("k"), Value::Integer(1), Value::Integer(1)]);
        assert!(!contains_key_values(&container, &needle));
    }

    #[test]
    fn key_containment_rejects_mismatched_head() {
        let container = Value::List(vec![Value::symbol("k"), Value::Integer(1)]);
        let needle = Value::List(vec![Value::symbol("other"), Value::Integer(1)]);
        assert!(!contains_key_values(&container, &needle));
    }

    #[test]
    fn key_containment_searches_nested_lists() {
        let container = Value::List(vec![
            Value::symbol("outer"),
            Value::List(vec![Value::symbol("k"), Value::Integer(1), Value::Integer(2)]),
        ]);
        let needle = Value::List(vec![Value::symbol("k"), Value::Integer(2)]);
        assert!(contains_key_values(&container, &needle));
    }
}

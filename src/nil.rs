//! A process-wide cached encoding of `nil`.
//!
//! `nil`'s binary encoding never varies — no symbols, a single tag byte —
//! so there is no reason to pay for `write(&Value::Nil)` more than once.

use crate::navigator::Cursor;
use crate::reader::Reader;
use crate::symtab::SymbolTable;
use crate::tag;
use std::sync::OnceLock;

static NIL_ENCODING: OnceLock<[u8; 3]> = OnceLock::new();

/// The canonical three-byte encoding of `nil`: version, zero symbols,
/// `TAG_NIL`.
pub fn encoded() -> &'static [u8] {
    NIL_ENCODING.get_or_init(|| [tag::FORMAT_VERSION, 0x00, tag::TAG_NIL])
}

/// A cursor over the cached `nil` encoding, for callers that want a
/// ready-made nil without constructing a [`crate::value::Value`] first.
pub fn cursor() -> Cursor<'static> {
    Cursor::new(encoded(), SymbolTable::new(), 2)
}

/// Same cursor, obtained the ordinary way, for callers that would rather
/// not depend on `nil`'s internal layout.
pub fn reader() -> Reader<'static> {
    Reader::open(encoded()).expect("the cached nil encoding is always valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::ValueType;

    #[test]
    fn cached_encoding_matches_a_freshly_written_nil() {
        use crate::value::Value;
        use crate::writer::write;
        assert_eq!(encoded(), write(&Value::Nil).unwrap().as_slice());
    }

    #[test]
    fn cursor_reads_back_as_nil() {
        assert_eq!(cursor().type_of().unwrap(), ValueType::Nil);
        assert_eq!(reader().root().type_of().unwrap(), ValueType::Nil);
    }

    #[test]
    fn repeated_calls_return_the_same_backing_bytes() {
        assert_eq!(encoded().as_ptr(), encoded().as_ptr());
    }
}

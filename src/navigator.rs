//! Zero-copy structural navigation over an encoded buffer.
//!
//! The source always returns `car`/`cdr`/`nth` as a fresh, independently
//! storable value, because a Postgres `varlena` datum has to be
//! self-contained. This library has no such requirement — there is one
//! buffer, held for as long as the caller wants to navigate it — so every
//! operation here returns a [`Cursor`] that borrows from it instead of
//! re-encoding a new buffer. `cdr` is the one operation this changes
//! materially: since there is no wire-format "list minus its head", a
//! `cdr` cursor holds the resolved byte ranges of its remaining children
//! directly, and a `cdr` of a `cdr` is then an O(1) slice-drop instead of
//! a second resolve pass.

use crate::error::{Error, Result};
use crate::symtab::SymbolTable;
use crate::tag::{self, SEntryType, ValueType};
use crate::varint;
use byteorder::{ByteOrder, LittleEndian};

#[derive(Clone)]
enum Repr {
    /// A real element: `data[offset]` is its tag byte.
    Tag(usize),
    /// The resolved byte ranges of a virtual list's children — the result
    /// of a `cdr`, holding no tag byte of its own.
    Resolved(Vec<(usize, usize)>),
}

/// A position within a decoded buffer, from which every navigation
/// operation reads directly, without building an intermediate [`Value`].
///
/// [`Value`]: crate::value::Value
#[derive(Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    symbols: SymbolTable<'a>,
    repr: Repr,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8], symbols: SymbolTable<'a>, offset: usize) -> Cursor<'a> {
        Cursor {
            data,
            symbols,
            repr: Repr::Tag(offset),
        }
    }

    fn at(&self, offset: usize) -> Cursor<'a> {
        Cursor {
            data: self.data,
            symbols: self.symbols.clone(),
            repr: Repr::Tag(offset),
        }
    }

    fn tag_byte(&self, offset: usize) -> Result<u8> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| Error::Corrupted("cursor offset runs past buffer end".into()))
    }

    /// The element's logical type. A resolved (post-`cdr`) list with zero
    /// remaining children is `Nil`, matching the rule that the empty list
    /// and `nil` are the same value.
    pub fn type_of(&self) -> Result<ValueType> {
        match &self.repr {
            Repr::Tag(offset) => {
                let byte = self.tag_byte(*offset)?;
                tag::ValueType::from_tag_byte(byte)
                    .ok_or_else(|| Error::Corrupted("unrecognized tag byte".into()))
            }
            Repr::Resolved(elems) => {
                if elems.is_empty() {
                    Ok(ValueType::Nil)
                } else {
                    Ok(ValueType::List)
                }
            }
        }
    }

    pub fn is_nil(&self) -> Result<bool> {
        Ok(self.type_of()? == ValueType::Nil)
    }

    /// `nil` counts as a list (the empty one), matching the source's
    /// `sexp_is_list`.
    pub fn is_list(&self) -> Result<bool> {
        Ok(matches!(self.type_of()?, ValueType::List | ValueType::Nil))
    }

    /// Number of elements: `0` for `nil`, `1` for any atom, the element
    /// count for a list.
    pub fn length(&self) -> Result<usize> {
        match &self.repr {
            Repr::Tag(offset) => {
                let byte = self.tag_byte(*offset)?;
                match byte & tag::TAG_MASK {
                    tag::TAG_NIL => Ok(0),
                    tag::TAG_LIST => {
                        let count = (byte & tag::DATA_MASK) as usize;
                        if count == 0 {
                            Ok(self.read_large_count(*offset)? as usize)
                        } else {
                            Ok(count)
                        }
                    }
                    _ => Ok(1),
                }
            }
            Repr::Resolved(elems) => Ok(elems.len()),
        }
    }

    fn read_large_count(&self, list_offset: usize) -> Result<u32> {
        let start = list_offset + 1;
        let bytes = self
            .data
            .get(start..start + 4)
            .ok_or_else(|| Error::Corrupted("truncated large-list count".into()))?;
        Ok(LittleEndian::read_u32(bytes))
    }

    /// The large list's stored structural hash, bypassing a recursive
    /// recompute — only meaningful for a real `Tag`-backed large list.
    pub(crate) fn stored_hash(&self) -> Option<u32> {
        if let Repr::Tag(offset) = &self.repr {
            let byte = self.data.get(*offset).copied()?;
            if byte & tag::TAG_MASK == tag::TAG_LIST && byte & tag::DATA_MASK == 0 {
                let start = offset + 5;
                let bytes = self.data.get(start..start + 4)?;
                return Some(LittleEndian::read_u32(bytes));
            }
        }
        None
    }

    /// Decodes a list's header, returning the child count, an optional
    /// SEntry table (large lists only), and the offset of the first
    /// child's data.
    fn list_header(&self, list_offset: usize) -> Result<(usize, Option<Vec<u32>>, usize)> {
        let byte = self.tag_byte(list_offset)?;
        if byte & tag::TAG_MASK != tag::TAG_LIST {
            return Err(Error::Type("not a list".into()));
        }
        let small_count = (byte & tag::DATA_MASK) as usize;
        if small_count != 0 {
            let (_, data_start) = varint::decode(self.data, list_offset + 1)?;
            Ok((small_count, None, data_start))
        } else {
            let count = self.read_large_count(list_offset)? as usize;
            let sentry_start = list_offset + 9;
            let data_start = sentry_start + count * 4;
            let mut sentries = Vec::with_capacity(count);
            for i in 0..count {
                let off = sentry_start + i * 4;
                let bytes = self
                    .data
                    .get(off..off + 4)
                    .ok_or_else(|| Error::Corrupted("truncated SEntry table".into()))?;
                sentries.push(LittleEndian::read_u32(bytes));
            }
            Ok((count, Some(sentries), data_start))
        }
    }

    /// Byte range `[start, end)` of child `idx` within a list whose header
    /// has already been decoded. `list_end` bounds the last child when no
    /// SEntry table is available to give an exact end.
    fn child_bounds(
        &self,
        count: usize,
        sentries: &Option<Vec<u32>>,
        data_start: usize,
        idx: usize,
    ) -> Result<(usize, usize)> {
        if let Some(sentries) = sentries {
            let start = data_start + tag::sentry_offset(sentries[idx]) as usize;
            let end = if idx + 1 < count {
                data_start + tag::sentry_offset(sentries[idx + 1]) as usize
            } else {
                self.data.len()
            };
            Ok((start, end))
        } else {
            // Small list: scan from the start, skipping `idx` elements.
            let mut pos = data_start;
            for _ in 0..idx {
                pos = self.skip_at(pos)?;
            }
            let end = self.skip_at(pos)?;
            Ok((pos, end))
        }
    }

    /// Resolves every child's byte range for a real list, in order.
    fn all_children(&self, list_offset: usize) -> Result<Vec<(usize, usize)>> {
        let (count, sentries, data_start) = self.list_header(list_offset)?;
        (0..count)
            .map(|idx| self.child_bounds(count, &sentries, data_start, idx))
            .collect()
    }

    /// Advances past one element starting at `offset`, returning the
    /// offset just past it. The one case this isn't O(1) is a large list
    /// with no stored total size: skipping it means jumping to its last
    /// child via the SEntry table and skipping only that one child, which
    /// is O(depth of the rightmost spine) rather than the source's O(n)
    /// full child walk.
    fn skip_at(&self, offset: usize) -> Result<usize> {
        let byte = self.tag_byte(offset)?;
        match byte & tag::TAG_MASK {
            tag::TAG_NIL => Ok(offset + 1),
            tag::TAG_SMALLINT => Ok(offset + 1),
            tag::TAG_INTEGER => {
                let (_, next) = varint::decode(self.data, offset + 1)?;
                Ok(next)
            }
            tag::TAG_FLOAT => Ok(offset + 9),
            tag::TAG_SYMBOL_REF => {
                let (_, next) = varint::decode(self.data, offset + 1)?;
                Ok(next)
            }
            tag::TAG_SHORT_STRING => Ok(offset + 1 + (byte & tag::DATA_MASK) as usize),
            tag::TAG_LONG_STRING => {
                let (len, next) = varint::decode(self.data, offset + 1)?;
                Ok(next + len as usize)
            }
            tag::TAG_LIST => {
                let small_count = (byte & tag::DATA_MASK) as usize;
                if small_count != 0 {
                    let (payload_size, data_start) = varint::decode(self.data, offset + 1)?;
                    Ok(data_start + payload_size as usize)
                } else {
                    let count = self.read_large_count(offset)? as usize;
                    if count == 0 {
                        Ok(offset + 9)
                    } else {
                        let (_, sentries, data_start) = self.list_header(offset)?;
                        let sentries = sentries.expect("large list always has a SEntry table");
                        let last_start = data_start + tag::sentry_offset(sentries[count - 1]) as usize;
                        self.skip_at(last_start)
                    }
                }
            }
            _ => Err(Error::Corrupted("unrecognized tag byte".into())),
        }
    }

    /// The first element of a list, or `None` for `nil`.
    pub fn car(&self) -> Result<Option<Cursor<'a>>> {
        match &self.repr {
            Repr::Tag(offset) => {
                let byte = self.tag_byte(*offset)?;
                if byte & tag::TAG_MASK == tag::TAG_NIL {
                    return Ok(None);
                }
                if byte & tag::TAG_MASK != tag::TAG_LIST {
                    return Err(Error::Type("car requires a list".into()));
                }
                let (count, sentries, data_start) = self.list_header(*offset)?;
                if count == 0 {
                    return Ok(None);
                }
                let (start, _) = self.child_bounds(count, &sentries, data_start, 0)?;
                Ok(Some(self.at(start)))
            }
            Repr::Resolved(elems) => Ok(elems.first().map(|&(start, _)| self.at(start))),
        }
    }

    /// Alias for `car`, used where the code is asking specifically for a
    /// list's head element (the index extractor's pair/list-head keys).
    pub fn head(&self) -> Result<Option<Cursor<'a>>> {
        self.car()
    }

    /// All elements but the first. `nil`'s cdr is absent, exactly like
    /// its `car` — not a present `nil` value. This differs from the cdr
    /// of a genuine one-element list, which legitimately produces a
    /// *stored* nil (present, zero children), not an absence.
    pub fn cdr(&self) -> Result<Option<Cursor<'a>>> {
        if self.is_nil()? {
            return Ok(None);
        }
        match &self.repr {
            Repr::Tag(offset) => {
                let byte = self.tag_byte(*offset)?;
                if byte & tag::TAG_MASK != tag::TAG_LIST {
                    return Err(Error::Type("cdr requires a list".into()));
                }
                let children = self.all_children(*offset)?;
                let rest = if children.len() <= 1 {
                    Vec::new()
                } else {
                    children[1..].to_vec()
                };
                Ok(Some(Cursor {
                    data: self.data,
                    symbols: self.symbols.clone(),
                    repr: Repr::Resolved(rest),
                }))
            }
            Repr::Resolved(elems) => {
                let rest = if elems.len() <= 1 {
                    Vec::new()
                } else {
                    elems[1..].to_vec()
                };
                Ok(Some(Cursor {
                    data: self.data,
                    symbols: self.symbols.clone(),
                    repr: Repr::Resolved(rest),
                }))
            }
        }
    }

    /// The `idx`-th element (0-based). `Ok(None)` if out of range.
    pub fn nth(&self, idx: usize) -> Result<Option<Cursor<'a>>> {
        match &self.repr {
            Repr::Tag(offset) => {
                let byte = self.tag_byte(*offset)?;
                if byte & tag::TAG_MASK == tag::TAG_NIL {
                    return Ok(None);
                }
                if byte & tag::TAG_MASK != tag::TAG_LIST {
                    return Err(Error::Type("nth requires a list".into()));
                }
                let (count, sentries, data_start) = self.list_header(*offset)?;
                if idx >= count {
                    return Ok(None);
                }
                let (start, _) = self.child_bounds(count, &sentries, data_start, idx)?;
                Ok(Some(self.at(start)))
            }
            Repr::Resolved(elems) => Ok(elems.get(idx).map(|&(start, _)| self.at(start))),
        }
    }

    /// This element's symbol text, if it is a symbol.
    pub fn as_symbol(&self) -> Result<Option<&'a [u8]>> {
        let offset = match &self.repr {
            Repr::Tag(offset) => *offset,
            Repr::Resolved(_) => return Ok(None),
        };
        let byte = self.tag_byte(offset)?;
        if byte & tag::TAG_MASK != tag::TAG_SYMBOL_REF {
            return Ok(None);
        }
        let (idx, _) = varint::decode(self.data, offset + 1)?;
        Ok(self.symbols.get(idx as usize))
    }

    /// This element's string bytes, if it is a string (short or long).
    pub fn as_string(&self) -> Result<Option<&'a [u8]>> {
        let offset = match &self.repr {
            Repr::Tag(offset) => *offset,
            Repr::Resolved(_) => return Ok(None),
        };
        let byte = self.tag_byte(offset)?;
        match byte & tag::TAG_MASK {
            tag::TAG_SHORT_STRING => {
                let len = (byte & tag::DATA_MASK) as usize;
                Ok(self.data.get(offset + 1..offset + 1 + len))
            }
            tag::TAG_LONG_STRING => {
                let (len, start) = varint::decode(self.data, offset + 1)?;
                Ok(self.data.get(start..start + len as usize))
            }
            _ => Ok(None),
        }
    }

    /// This element's integer value, if it is a smallint or full integer.
    pub fn as_integer(&self) -> Result<Option<i64>> {
        let offset = match &self.repr {
            Repr::Tag(offset) => *offset,
            Repr::Resolved(_) => return Ok(None),
        };
        let byte = self.tag_byte(offset)?;
        match byte & tag::TAG_MASK {
            tag::TAG_SMALLINT => {
                let v = (byte & tag::DATA_MASK) as i64 - tag::SMALLINT_BIAS;
                Ok(Some(v))
            }
            tag::TAG_INTEGER => {
                let (encoded, _) = varint::decode(self.data, offset + 1)?;
                Ok(Some(varint::zigzag_decode(encoded)))
            }
            _ => Ok(None),
        }
    }

    /// This element's float value, if it is a float.
    pub fn as_float(&self) -> Result<Option<f64>> {
        let offset = match &self.repr {
            Repr::Tag(offset) => *offset,
            Repr::Resolved(_) => return Ok(None),
        };
        let byte = self.tag_byte(offset)?;
        if byte & tag::TAG_MASK != tag::TAG_FLOAT {
            return Ok(None);
        }
        let bytes = self
            .data
            .get(offset + 1..offset + 9)
            .ok_or_else(|| Error::Corrupted("truncated float".into()))?;
        Ok(Some(LittleEndian::read_f64(bytes)))
    }

    /// Iterates a list's children as cursors, in order. Empty for atoms
    /// and `nil`.
    pub fn children(&self) -> Result<Vec<Cursor<'a>>> {
        match &self.repr {
            Repr::Tag(offset) => {
                let byte = self.tag_byte(*offset)?;
                if byte & tag::TAG_MASK != tag::TAG_LIST {
                    return Ok(Vec::new());
                }
                Ok(self
                    .all_children(*offset)?
                    .into_iter()
                    .map(|(start, _)| self.at(start))
                    .collect())
            }
            Repr::Resolved(elems) => Ok(elems.iter().map(|&(start, _)| self.at(start)).collect()),
        }
    }

    /// Raw bytes of this element's encoding, `[start, end)` into the
    /// underlying buffer — used by equality's byte-wise shortcut.
    pub(crate) fn raw_bytes(&self) -> Result<&'a [u8]> {
        match &self.repr {
            Repr::Tag(offset) => {
                let end = self.skip_at(*offset)?;
                Ok(&self.data[*offset..end])
            }
            Repr::Resolved(_) => Err(Error::Type("a resolved cdr view has no contiguous raw encoding".into())),
        }
    }

    /// Whether `self` and `other` read from the same backing buffer — and
    /// therefore, critically, the same symbol table. A symbol's raw
    /// encoding is just `[TAG_SYMBOL_REF, varint(index)]`, an index with
    /// no meaning outside the buffer it was resolved from, so comparing
    /// raw bytes across two different buffers can't be trusted to mean
    /// the same symbol even when the bytes match.
    pub(crate) fn same_buffer(&self, other: &Cursor) -> bool {
        std::ptr::eq(self.data, other.data)
    }
}

//! Opens a binary buffer and positions a [`Cursor`] at its root element.
//!
//! Opening validates the version byte and decodes the per-value symbol
//! table once; every subsequent navigation or query runs directly over the
//! byte buffer through [`crate::navigator::Cursor`], never materializing a
//! [`crate::value::Value`] tree.

use crate::error::{Error, Result};
use crate::navigator::Cursor;
use crate::symtab::SymbolTable;
use crate::tag;
use crate::varint;

/// A validated, decoded binary buffer ready for navigation.
pub struct Reader<'a> {
    data: &'a [u8],
    symbols: SymbolTable<'a>,
    root_offset: usize,
}

impl<'a> Reader<'a> {
    /// Validates `buf`'s version byte, decodes its symbol table, and
    /// returns a `Reader` positioned at the root element.
    pub fn open(buf: &'a [u8]) -> Result<Reader<'a>> {
        let version = *buf
            .first()
            .ok_or_else(|| Error::Corrupted("buffer is empty".into()))?;
        if version > tag::FORMAT_VERSION {
            return Err(Error::Corrupted(format!(
                "version {} exceeds supported version {}",
                version,
                tag::FORMAT_VERSION
            )));
        }

        let mut pos = 1;
        let (sym_count, next) = varint::decode(buf, pos)?;
        pos = next;

        let mut symbols = SymbolTable::new();
        for _ in 0..sym_count {
            let (len, next) = varint::decode(buf, pos)?;
            pos = next;
            let len = len as usize;
            let end = pos
                .checked_add(len)
                .filter(|&e| e <= buf.len())
                .ok_or_else(|| Error::Corrupted("symbol table entry runs past buffer end".into()))?;
            symbols.push(&buf[pos..end]);
            pos = end;
        }

        if pos >= buf.len() {
            return Err(Error::Corrupted("buffer has no root element".into()));
        }

        Ok(Reader {
            data: buf,
            symbols,
            root_offset: pos,
        })
    }

    /// A cursor positioned at the root element.
    pub fn root(&self) -> Cursor<'a> {
        Cursor::new(self.data, self.symbols.clone(), self.root_offset)
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }
}

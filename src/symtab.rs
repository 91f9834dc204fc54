//! Per-value symbol table: writer-side interning and reader-side lookup.
//!
//! Every encoded value carries its own symbol table — there is no
//! cross-value interning. The writer builds it with an open-addressing
//! hash table so repeated symbols intern in amortized O(1) instead of
//! O(n) linear scan; the reader just holds the decoded symbol slices with
//! their hashes precomputed, since by the time it sees the table every
//! symbol is already unique.

use crate::error::{Error, Result};
use crate::hash;
use crate::limits::Limits;

const INITIAL_HASH_SIZE: usize = 64;
const EMPTY: i32 = -1;

/// Writer-side symbol interner. Assigns a stable index to each distinct
/// symbol text, in first-use order, so the writer can emit `SYMBOL_REF`
/// indices immediately without a second pass.
pub struct Interner {
    symbols: Vec<String>,
    hashes: Vec<u32>,
    table: Vec<i32>,
    mask: usize,
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            symbols: Vec::new(),
            hashes: Vec::new(),
            table: vec![EMPTY; INITIAL_HASH_SIZE],
            mask: INITIAL_HASH_SIZE - 1,
        }
    }

    /// Interns `sym`, returning its index. Calling this with the same text
    /// twice returns the same index both times.
    pub fn intern(&mut self, sym: &str, limits: &Limits) -> Result<usize> {
        let h = hash::hash_bytes(sym.as_bytes());
        let mut slot = (h as usize) & self.mask;
        loop {
            let idx = self.table[slot];
            if idx == EMPTY {
                break;
            }
            let idx = idx as usize;
            if self.hashes[idx] == h && self.symbols[idx] == sym {
                return Ok(idx);
            }
            slot = (slot + 1) & self.mask;
        }

        if self.symbols.len() >= limits.max_symbols {
            return Err(Error::Limit(format!(
                "symbol table exceeds {} entries",
                limits.max_symbols
            )));
        }

        if self.symbols.len() * 2 >= self.table.len() {
            self.grow();
            slot = (h as usize) & self.mask;
            while self.table[slot] != EMPTY {
                slot = (slot + 1) & self.mask;
            }
        }

        let idx = self.symbols.len();
        self.symbols.push(sym.to_string());
        self.hashes.push(h);
        self.table[slot] = idx as i32;
        Ok(idx)
    }

    fn grow(&mut self) {
        let new_size = self.table.len() * 2;
        let new_mask = new_size - 1;
        let mut new_table = vec![EMPTY; new_size];
        for (idx, &h) in self.hashes.iter().enumerate() {
            let mut slot = (h as usize) & new_mask;
            while new_table[slot] != EMPTY {
                slot = (slot + 1) & new_mask;
            }
            new_table[slot] = idx as i32;
        }
        self.table = new_table;
        self.mask = new_mask;
    }

    /// Number of distinct symbols interned so far.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in assigned-index order, ready for writing into the binary
    /// symbol table section.
    pub fn entries(&self) -> &[String] {
        &self.symbols
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader-side view of a decoded symbol table: borrowed byte slices plus
/// their precomputed hashes, so repeated `SYMBOL_REF` comparisons never
/// rehash the same bytes twice. Cheap to clone — each clone just copies
/// the slice/hash vectors, not the underlying bytes — so every [`Cursor`]
/// can carry its own independent of the [`Reader`] that produced it.
///
/// [`Cursor`]: crate::navigator::Cursor
/// [`Reader`]: crate::reader::Reader
#[derive(Clone)]
pub struct SymbolTable<'a> {
    symbols: Vec<&'a [u8]>,
    hashes: Vec<u32>,
}

impl<'a> SymbolTable<'a> {
    pub fn new() -> Self {
        SymbolTable {
            symbols: Vec::new(),
            hashes: Vec::new(),
        }
    }

    pub fn push(&mut self, sym: &'a [u8]) {
        self.hashes.push(hash::hash_bytes(sym));
        self.symbols.push(sym);
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a [u8]> {
        self.symbols.get(index).copied()
    }

    pub fn hash_at(&self, index: usize) -> Option<u32> {
        self.hashes.get(index).copied()
    }
}

impl<'a> Default for SymbolTable<'a> {
    fn default() -> Self {
        Self::new()
    }
}

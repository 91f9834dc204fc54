//! Resource limits enforced during parsing, writing, and decoding.

/// Bounds an operation is checked against so that adversarial or
/// accidentally huge input cannot exhaust memory or blow the stack.
///
/// The reference values match the source implementation's compiled-in
/// constants; callers with different needs (a fuzzer wanting a tiny depth
/// bound, say) can construct their own.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth of lists.
    pub max_depth: usize,
    /// Maximum number of distinct symbols in one value's symbol table.
    pub max_symbols: usize,
    /// Maximum number of elements in a single list.
    pub max_list_len: usize,
    /// Maximum length in bytes of a single string or symbol.
    pub max_string_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: 1000,
            max_symbols: 65536,
            max_list_len: 1_048_576,
            max_string_len: 100 * 1024 * 1024,
        }
    }
}

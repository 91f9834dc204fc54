//! The owned, in-memory S-expression tree.
//!
//! [`Value`] is what [`crate::parser::parse`] produces and what
//! [`crate::writer::write`] consumes — callers build or inspect trees with
//! this type, while the binary format's cursor-based operations
//! ([`crate::navigator`], [`crate::equality`], [`crate::containment`]) work
//! directly on an encoded buffer without ever materializing one.

use std::fmt;

/// An S-expression value: one of six variants, matching the six element
/// types the binary format distinguishes.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Nil,
    Symbol(String),
    String(Vec<u8>),
    Integer(i64),
    Float(f64),
    List(Vec<Value>),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// `Nil` counts as a list (the empty one), matching the binary
    /// format's own `sexp_is_list`.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_) | Value::Nil)
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// String values are arbitrary bytes, not necessarily valid UTF-8.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// The string's bytes decoded as UTF-8, or `None` if it isn't valid
    /// UTF-8 (the binary format places no text-encoding requirement on
    /// string payloads; only the parser's string literals and the
    /// printer's output are guaranteed UTF-8).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    /// Constructs a symbol value from anything convertible to `String`.
    pub fn symbol(s: impl Into<String>) -> Value {
        Value::Symbol(s.into())
    }

    /// Constructs a string value from anything convertible to bytes.
    pub fn string(s: impl Into<Vec<u8>>) -> Value {
        Value::String(s.into())
    }
}

macro_rules! impl_value_from {
    ($t:ty, $variant:ident) => {
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_value_from!(i64, Integer);
impl_value_from!(f64, Float);
impl_value_from!(Vec<Value>, List);

impl TryFrom<Value> for i64 {
    type Error = Value;

    fn try_from(v: Value) -> Result<Self, Value> {
        match v {
            Value::Integer(n) => Ok(n),
            other => Err(other),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = Value;

    fn try_from(v: Value) -> Result<Self, Value> {
        match v {
            Value::Float(n) => Ok(n),
            other => Err(other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", crate::printer::print_value(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_the_constructed_variant() {
        assert!(Value::Nil.is_nil());
        assert!(Value::Integer(5).is_number());
        assert!(Value::Float(1.5).is_number());
        assert_eq!(Value::symbol("foo").as_symbol(), Some("foo"));
        assert_eq!(Value::Integer(5).as_integer(), Some(5));
        assert_eq!(Value::Integer(5).as_float(), None);
    }

    #[test]
    fn list_accessors() {
        let v = Value::List(vec![Value::Nil, Value::Integer(1)]);
        assert_eq!(v.as_list().unwrap().len(), 2);
    }

    #[test]
    fn string_bytes_need_not_be_utf8() {
        let v = Value::string(vec![0xffu8, 0xfe]);
        assert_eq!(v.as_bytes(), Some(&[0xff, 0xfe][..]));
        assert_eq!(v.as_str(), None);
    }

    #[test]
    fn from_and_try_from_round_trip() {
        let v: Value = 42i64.into();
        assert_eq!(i64::try_from(v), Ok(42));
        let v: Value = 1.5f64.into();
        assert_eq!(f64::try_from(v), Ok(1.5));
    }
}

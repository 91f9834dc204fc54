//! Parses the textual surface syntax — `(foo 1 2.5 "bar")` — into a
//! [`Value`] tree. Binary framing is entirely [`crate::writer`]'s job;
//! this module only tokenizes and builds the tree.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::value::Value;

/// Parses `text` into a single value, using [`Limits::default`].
pub fn parse(text: &str) -> Result<Value> {
    parse_with_limits(text, Limits::default())
}

/// Parses `text` into a single value, enforcing `limits`.
pub fn parse_with_limits(text: &str, limits: Limits) -> Result<Value> {
    let mut p = Parser {
        bytes: text.as_bytes(),
        pos: 0,
        depth: 0,
        limits,
    };
    p.skip_whitespace();
    let value = p.parse_value()?;
    p.skip_whitespace();
    if p.pos < p.bytes.len() {
        return Err(Error::Input("trailing data after expression".into()));
    }
    Ok(value)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    limits: Limits,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b';') => {
                    while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(Error::Input("unexpected end of input".into())),
            Some(b'(') => self.parse_list(),
            Some(b'"') => self.parse_string(),
            _ => self.parse_atom(),
        }
    }

    fn parse_list(&mut self) -> Result<Value> {
        if self.depth >= self.limits.max_depth {
            return Err(Error::Limit(format!(
                "nesting depth exceeds {}",
                self.limits.max_depth
            )));
        }
        self.depth += 1;
        self.pos += 1; // '('
        self.skip_whitespace();

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(Error::Input("unterminated list".into())),
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                _ => {
                    if items.len() >= self.limits.max_list_len {
                        return Err(Error::Limit(format!(
                            "list length exceeds {}",
                            self.limits.max_list_len
                        )));
                    }
                    items.push(self.parse_value()?);
                }
            }
        }

        self.depth -= 1;
        Ok(Value::List(items))
    }

    fn parse_string(&mut self) -> Result<Value> {
        self.pos += 1; // opening quote
        let mut out = Vec::new();
        loop {
            match self.peek() {
                None => return Err(Error::Input("unterminated string".into())),
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    let escaped = self
                        .peek()
                        .ok_or_else(|| Error::Input("unterminated string escape".into()))?;
                    out.push(match escaped {
                        b'n' => b'\n',
                        b't' => b'\t',
                        b'r' => b'\r',
                        b'\\' => b'\\',
                        b'"' => b'"',
                        other => other,
                    });
                    self.pos += 1;
                }
                Some(b) => {
                    out.push(b);
                    self.pos += 1;
                }
            }
        }
        if out.len() > self.limits.max_string_len {
            return Err(Error::Limit(format!(
                "string length exceeds {}",
                self.limits.max_string_len
            )));
        }
        Ok(Value::string(out))
    }

    /// A bare token: a number if it's made of digits with at most one
    /// leading sign and at most one `.`, a symbol otherwise. `nil` is the
    /// one reserved word.
    fn parse_atom(&mut self) -> Result<Value> {
        let start = self.pos;
        let mut is_number = true;
        let mut has_dot = false;
        let mut has_digit = false;

        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b'(' || b == b')' || b == b'"' || b == b';' {
                break;
            }
            match b {
                b'-' | b'+' => {
                    if self.pos != start {
                        is_number = false;
                    }
                }
                b'.' => {
                    if has_dot {
                        is_number = false;
                    }
                    has_dot = true;
                }
                b if b.is_ascii_digit() => has_digit = true,
                _ => is_number = false,
            }
            self.pos += 1;
        }

        if self.pos == start {
            return Err(Error::Input("empty atom".into()));
        }

        let token = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| Error::Input("atom is not valid UTF-8".into()))?;

        if token == "nil" {
            return Ok(Value::Nil);
        }

        is_number = is_number && has_digit;

        if is_number && has_dot {
            if let Ok(v) = token.parse::<f64>() {
                return Ok(Value::Float(v));
            }
        } else if is_number {
            if let Ok(v) = token.parse::<i64>() {
                return Ok(Value::Integer(v));
            }
        }

        Ok(Value::symbol(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nil() {
        assert_eq!(parse("nil").unwrap(), Value::Nil);
        assert_eq!(parse("()").unwrap(), Value::Nil);
    }

    #[test]
    fn parses_integers_and_negative_numbers() {
        assert_eq!(parse("42").unwrap(), Value::Integer(42));
        assert_eq!(parse("-7").unwrap(), Value::Integer(-7));
    }

    #[test]
    fn parses_floats() {
        assert_eq!(parse("3.5").unwrap(), Value::Float(3.5));
        assert_eq!(parse("-0.5").unwrap(), Value::Float(-0.5));
    }

    #[test]
    fn parses_symbols() {
        assert_eq!(parse("hello-world").unwrap(), Value::symbol("hello-world"));
        assert_eq!(parse("1.2.3").unwrap(), Value::symbol("1.2.3"));
        assert_eq!(parse("1-2").unwrap(), Value::symbol("1-2"));
    }

    #[test]
    fn parses_strings_with_escapes() {
        let v = parse(r#""a\nb\tc\"d""#).unwrap();
        assert_eq!(v, Value::string("a\nb\tc\"d".as_bytes()));
    }

    #[test]
    fn parses_nested_lists() {
        let v = parse("(1 (2 3) nil)").unwrap();
        assert_eq!(
            v,
            Value::List(vec![
                Value::Integer(1),
                Value::List(vec![Value::Integer(2), Value::Integer(3)]),
                Value::Nil,
            ])
        );
    }

    #[test]
    fn skips_comments() {
        let v = parse("(1 ; a comment\n 2)").unwrap();
        assert_eq!(v, Value::List(vec![Value::Integer(1), Value::Integer(2)]));
    }

    #[test]
    fn rejects_unterminated_list() {
        assert!(parse("(1 2").is_err());
    }

    #[test]
    fn rejects_unterminated_string() {
        assert!(parse("\"abc").is_err());
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse("1 2").is_err());
    }

    #[test]
    fn enforces_depth_limit() {
        let limits = Limits {
            max_depth: 2,
            ..Limits::default()
        };
        assert!(parse_with_limits("(1)", limits).is_ok());
        assert!(parse_with_limits("((1))", limits).is_ok());
        assert!(parse_with_limits("(((1)))", limits).is_err());
    }
}

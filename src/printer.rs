//! Renders a value back to the textual surface syntax.
//!
//! [`print`] walks a [`Cursor`] directly, the same way every other query
//! in this crate does; [`print_value`] is the materialized-tree
//! equivalent, used by [`crate::value::Value`]'s `Display` impl where
//! there's no buffer to walk.

use crate::error::Result;
use crate::navigator::Cursor;
use crate::tag::ValueType;
use crate::value::Value;

/// Renders `cursor`'s value as surface syntax.
pub fn print(cursor: &Cursor) -> Result<String> {
    let mut out = String::new();
    print_into(cursor, &mut out)?;
    Ok(out)
}

fn print_into(cursor: &Cursor, out: &mut String) -> Result<()> {
    match cursor.type_of()? {
        ValueType::Nil => out.push_str("()"),
        ValueType::Integer => {
            let v = cursor.as_integer()?.expect("Integer");
            out.push_str(&v.to_string());
        }
        ValueType::Float => push_float(out, cursor.as_float()?.expect("Float")),
        ValueType::Symbol => {
            out.push_str(&String::from_utf8_lossy(cursor.as_symbol()?.expect("Symbol")))
        }
        ValueType::String => push_quoted_string(out, cursor.as_string()?.expect("String")),
        ValueType::List => {
            out.push('(');
            for (i, child) in cursor.children()?.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                print_into(child, out)?;
            }
            out.push(')');
        }
    }
    Ok(())
}

/// Renders `value` as surface syntax, without going through a binary
/// buffer at all.
pub fn print_value(value: &Value) -> String {
    let mut out = String::new();
    print_value_into(value, &mut out);
    out
}

fn print_value_into(value: &Value, out: &mut String) {
    match value {
        Value::Nil => out.push_str("()"),
        Value::Integer(v) => out.push_str(&v.to_string()),
        Value::Float(v) => push_float(out, *v),
        Value::Symbol(s) => out.push_str(s),
        Value::String(bytes) => push_quoted_string(out, bytes),
        Value::List(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                print_value_into(item, out);
            }
            out.push(')');
        }
    }
}

/// `nan`/`inf`/`-inf` literals for non-finite values; otherwise Rust's own
/// shortest round-tripping decimal representation. This isn't the
/// source's literal `%.17g` — it serves the same purpose (a textual float
/// that reads back to the exact same bits) without carrying %g's
/// trailing-zero and fixed/scientific-notation switchover quirks.
fn push_float(out: &mut String, v: f64) {
    if v.is_nan() {
        out.push_str("nan");
    } else if v.is_infinite() {
        out.push_str(if v > 0.0 { "inf" } else { "-inf" });
    } else {
        out.push_str(&v.to_string());
    }
}

/// Bytes that aren't valid UTF-8 are lossily replaced — the surface
/// syntax is text, and a `Value::String` is allowed to hold arbitrary
/// bytes the binary format has no trouble carrying.
fn push_quoted_string(out: &mut String, bytes: &[u8]) {
    out.push('"');
    for c in String::from_utf8_lossy(bytes).chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
}

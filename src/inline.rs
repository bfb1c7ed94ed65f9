//! The inline form: a single line of `key:value` / `key=value` tokens.
//!
//! Single objects skip the tabular machinery entirely. Nesting is preserved
//! structurally with `{...}` (recursively rendered) and arrays with `[...]`,
//! so no flattening happens on this path.
//!
//! The separator is part of the type information: `=` introduces a string,
//! `:` introduces everything else (`~` null, `y`/`n` booleans, numeric
//! literals, brackets, braces). The decoder is a hand-written scanner over the
//! line; delimiters are all ASCII, so byte indexing is safe on UTF-8 input.

use crate::tabular::{array_token, escape_spaces, restore_spaces};
use crate::{Number, Value, ZoonMap};

/// Renders an object as one line of space-joined `key<sep>value` tokens in
/// key encounter order.
pub(crate) fn encode_inline(obj: &ZoonMap) -> String {
    let mut parts = Vec::with_capacity(obj.len());

    for (key, value) in obj.iter() {
        let safe_key = escape_spaces(key);
        let part = match value {
            Value::Null => format!("{}:~", safe_key),
            Value::Bool(b) => format!("{}:{}", safe_key, if *b { "y" } else { "n" }),
            Value::Number(n) => format!("{}:{}", safe_key, n),
            Value::String(s) => format!("{}={}", safe_key, escape_spaces(s)),
            Value::Array(items) => format!("{}:{}", safe_key, array_token(items)),
            Value::Object(nested) => format!("{}:{{{}}}", safe_key, encode_inline(nested)),
        };
        parts.push(part);
    }

    parts.join(" ")
}

/// Scans an inline document back into an object.
///
/// Total over arbitrary input: a trailing key with no separator is dropped,
/// unterminated braces and brackets consume to end of input.
pub(crate) fn parse_inline(input: &str) -> ZoonMap {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut result = ZoonMap::new();
    let mut i = 0usize;

    while i < len {
        while i < len && bytes[i] == b' ' {
            i += 1;
        }
        if i >= len {
            break;
        }

        let key_start = i;
        let mut key_end = i;
        while key_end < len && bytes[key_end] != b':' && bytes[key_end] != b'=' {
            key_end += 1;
        }
        if key_end >= len {
            break;
        }

        let key = restore_spaces(&input[key_start..key_end]);
        let sep = bytes[key_end];
        i = key_end + 1;

        if i < len && bytes[i] == b'{' {
            let mut depth = 1usize;
            let start = i + 1;
            i += 1;
            while i < len && depth > 0 {
                match bytes[i] {
                    b'{' => depth += 1,
                    b'}' => depth -= 1,
                    _ => {}
                }
                i += 1;
            }
            let end = if i > start { i - 1 } else { start };
            result.insert(key, Value::Object(parse_inline(&input[start..end])));
        } else if i < len && bytes[i] == b'[' {
            let mut end = i + 1;
            while end < len && bytes[end] != b']' {
                end += 1;
            }
            let inner = &input[i + 1..end];
            let items = if inner.is_empty() {
                Vec::new()
            } else {
                inner
                    .split(',')
                    .map(|item| Value::String(restore_spaces(item)))
                    .collect()
            };
            result.insert(key, Value::Array(items));
            i = end + 1;
        } else {
            let value_start = i;
            let mut value_end = i;
            while value_end < len && bytes[value_end] != b' ' {
                value_end += 1;
            }
            let token = &input[value_start..value_end];
            i = value_end;

            let value = if sep == b'=' {
                Value::String(restore_spaces(token))
            } else {
                scalar_value(token)
            };
            result.insert(key, value);
        }
    }

    result
}

/// Classifies a bare `:`-separated token: null, boolean, number, or string.
fn scalar_value(token: &str) -> Value {
    match token {
        "~" => Value::Null,
        "y" => Value::Bool(true),
        "n" => Value::Bool(false),
        _ => {
            if let Ok(i) = token.parse::<i64>() {
                Value::Number(Number::Integer(i))
            } else if let Ok(f) = token.parse::<f64>() {
                Value::Number(Number::Float(f))
            } else {
                Value::String(restore_spaces(token))
            }
        }
    }
}

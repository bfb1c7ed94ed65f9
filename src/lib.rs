//! # serde_zoon
//!
//! A Serde-compatible codec for the ZOON (Zero Overhead Object Notation) format.
//!
//! ## What is ZOON?
//!
//! ZOON is a compact, line-oriented text format for structured data, designed
//! to minimize token count when feeding records to Large Language Models. A
//! batch of records becomes a typed `#` header plus one space-joined line per
//! record; a single object becomes one `key:value` line. On top of that, an
//! optimizer squeezes out structural repetition:
//!
//! - **Constant hoisting**: fields every record agrees on move into the
//!   header as `@name:value` and vanish from the body
//! - **Auto-increment detection**: `1, 2, 3, ...` columns are declared `i+`
//!   and their body values omitted entirely
//! - **Enum fields**: low-cardinality string columns declare their option
//!   list in the header (`role=Admin|User`)
//! - **Prefix aliasing**: repeated dotted-path prefixes from nested objects
//!   get short `%xx` tokens when the substitution saves characters
//!
//! Decoding reconstructs full records from all of this, so the optimizer
//! changes the cost of a document, never its meaning.
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! serde_zoon = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Encoding a batch of records
//!
//! ```rust
//! use serde::Serialize;
//! use serde_zoon::to_string;
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let users = vec![
//!     User { id: 1, name: "Alice".to_string(), active: true },
//!     User { id: 2, name: "Bob".to_string(), active: false },
//! ];
//!
//! let zoon = to_string(&users).unwrap();
//! assert_eq!(zoon, "# id:i+ name:s active:b\nAlice 1\nBob 0");
//! ```
//!
//! ### Decoding
//!
//! ```rust
//! use serde_zoon::{decode, Value};
//!
//! let rows = decode("# id:i+ name:s active:b\nAlice 1\nBob 0").unwrap();
//! assert_eq!(rows.len(), 2);
//!
//! let alice = rows[0].as_object().unwrap();
//! assert_eq!(alice.get("id"), Some(&Value::from(1)));
//! assert_eq!(alice.get("name"), Some(&Value::from("Alice")));
//! assert_eq!(alice.get("active"), Some(&Value::Bool(true)));
//! ```
//!
//! ### Dynamic values with the zoon! macro
//!
//! ```rust
//! use serde_zoon::{encode, zoon};
//!
//! let config = zoon!({
//!     "host": "localhost",
//!     "port": 8080,
//!     "debug": true,
//! });
//!
//! // Single objects use the inline form.
//! assert_eq!(encode(&config), "host=localhost port:8080 debug:y");
//! ```
//!
//! ## Format limitations
//!
//! Values are space-delimited, so spaces inside strings are rewritten to
//! underscores on encode and back to spaces on decode. Strings that already
//! contain underscores therefore do not round-trip exactly. Decoding is
//! deliberately lenient: the only fatal error is a malformed header, and
//! damaged body tokens degrade to placeholder values instead of failing.

pub mod error;
pub mod flatten;
pub mod macros;
pub mod map;
pub mod optimize;
pub mod options;
pub mod schema;
pub mod ser;
pub mod value;

mod inline;
mod tabular;

pub use error::{Error, Result};
pub use flatten::{flatten, merge_into, unflatten};
pub use map::ZoonMap;
pub use optimize::{optimize, AliasTable, Optimized};
pub use options::EncodeOptions;
pub use schema::{FieldKind, FieldSpec, Schema};
pub use ser::ValueSerializer;
pub use value::{Number, Value};

use serde::Serialize;

/// Encode a [`Value`] as a ZOON document with default options.
///
/// The shape of the value picks the form:
///
/// - an array of objects encodes as a tabular document
/// - a single object encodes as one inline line
/// - an array of scalars encodes as a single `value:s` column
/// - `null` and lone scalars encode as degenerate one-row documents
///
/// Encoding is infallible; shapes the format cannot carry (like objects
/// inside arrays) degrade to placeholder text rather than failing.
#[must_use]
pub fn encode(value: &Value) -> String {
    encode_with_options(value, &EncodeOptions::default())
}

/// Encode a [`Value`] with explicit [`EncodeOptions`] (a caller-provided
/// schema, or tuned enum inference).
#[must_use]
pub fn encode_with_options(value: &Value, options: &EncodeOptions) -> String {
    match value {
        Value::Null => "#\n~".to_string(),
        Value::Object(obj) => inline::encode_inline(obj),
        Value::Array(items) => {
            if items.is_empty() {
                return "# (empty)".to_string();
            }

            if !items[0].is_object() {
                let rows: Vec<String> = items
                    .iter()
                    .map(|item| tabular::escape_spaces(&tabular::plain_text(item)))
                    .collect();
                return format!("# value:s\n{}", rows.join("\n"));
            }

            let flat: Vec<ZoonMap> = items
                .iter()
                .map(|item| match item {
                    Value::Object(obj) => flatten(obj),
                    _ => ZoonMap::new(),
                })
                .collect();

            let schema = match &options.schema {
                Some(schema) => schema.clone(),
                None => Schema::infer(&flat, options),
            };

            tabular::encode_records(&flat, &schema)
        }
        other => format!(
            "# value:s\n{}",
            tabular::escape_spaces(&tabular::plain_text(other))
        ),
    }
}

/// Decode a ZOON document into records.
///
/// A tabular document yields one [`Value::Object`] per row; an inline
/// document yields a single-element vector. Decoding is lenient everywhere
/// except the header line itself.
///
/// # Errors
///
/// Returns [`Error::MalformedHeader`] when a line starts with `#` but is not
/// a well-formed header (the `#` must stand alone as the first token).
pub fn decode(input: &str) -> Result<Vec<Value>> {
    let lines: Vec<&str> = input.trim().split('\n').map(str::trim).collect();

    let mut aliases = AliasTable::new();

    for (index, line) in lines.iter().enumerate() {
        if line.starts_with('%') {
            for part in line.split(' ') {
                if let Some((token, prefix)) = part.split_once('=') {
                    let token = token.trim_start_matches('%');
                    if !token.is_empty() && !prefix.is_empty() {
                        aliases.insert(token.to_string(), prefix.to_string());
                    }
                }
            }
        } else if line.starts_with('#') {
            return tabular::decode_tabular(&lines[index..], &aliases);
        } else if !line.is_empty() {
            // Data before any header: the whole document is inline.
            return Ok(vec![Value::Object(inline::parse_inline(&lines.join(" ")))]);
        }
    }

    Ok(vec![Value::Object(inline::parse_inline(&lines.join(" ")))])
}

/// Convert any `T: Serialize` into a [`Value`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for shapes the ZOON value domain cannot
/// hold, such as non-string map keys or enum variants with payloads.
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Serialize any `T: Serialize` straight to a ZOON string.
///
/// # Errors
///
/// Fails only if the conversion to [`Value`] fails; see [`to_value`].
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Ok(encode(&to_value(value)?))
}

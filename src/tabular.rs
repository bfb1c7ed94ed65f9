//! The tabular form: one `#` header line plus one line per record.
//!
//! Encoding runs the optimizer first, so the header carries alias definitions,
//! hoisted constants (`@name:value`), and typed field tokens; rows are
//! space-joined values in field order with auto-increment columns omitted
//! entirely. Decoding parses whatever the header declares and is lenient about
//! body tokens: unparseable numbers become NaN, missing tokens degrade to
//! empty values, and nothing in a body row can fail the decode.

use crate::flatten::{merge_into, unflatten};
use crate::optimize::{optimize, AliasTable};
use crate::schema::{FieldKind, FieldSpec, Schema};
use crate::{Error, Number, Result, Value, ZoonMap};

/// Replaces spaces with underscores so a value fits in one space-delimited
/// token. Not reversible when the value already contains underscores; this is
/// a documented format limitation.
pub(crate) fn escape_spaces(text: &str) -> String {
    text.replace(' ', "_")
}

/// Restores underscores to spaces on decode. See [`escape_spaces`].
pub(crate) fn restore_spaces(token: &str) -> String {
    token.replace('_', " ")
}

/// Stringifies a leaf value the way the format's untyped positions do
/// (single-column listings, array items, fallback renderings).
pub(crate) fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(plain_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "object".to_string(),
    }
}

/// Renders an array value as a bracketed token: `[v1,v2,...]`, string items
/// space-escaped.
pub(crate) fn array_token(items: &[Value]) -> String {
    let encoded: Vec<String> = items
        .iter()
        .map(|item| match item {
            Value::String(s) => escape_spaces(s),
            other => plain_text(other),
        })
        .collect();
    format!("[{}]", encoded.join(","))
}

/// Encodes a batch of flat records as an optimized tabular document.
pub(crate) fn encode_records(records: &[ZoonMap], schema: &Schema) -> String {
    let optimized = optimize(schema, records);
    let fields = &optimized.schema.fields;

    let mut out = String::new();

    if !optimized.aliases.is_empty() {
        out.push_str(&optimized.aliases.definition_line());
        out.push('\n');
    }

    out.push('#');

    for (name, value) in optimized.constants.iter() {
        let safe = escape_spaces(&optimized.aliases.apply(name));
        match value {
            Value::Bool(b) => out.push_str(&format!(" @{}:{}", safe, if *b { "y" } else { "n" })),
            Value::Number(n) => out.push_str(&format!(" @{}:{}", safe, n)),
            Value::Null => out.push_str(&format!(" @{}:~", safe)),
            other => out.push_str(&format!(" @{}={}", safe, escape_spaces(&plain_text(other)))),
        }
    }

    for field in fields {
        let safe = escape_spaces(&optimized.aliases.apply(&field.name));
        match &field.kind {
            FieldKind::Enum(options) => {
                let safe_options: Vec<String> =
                    options.iter().map(|o| escape_spaces(o)).collect();
                out.push_str(&format!(" {}={}", safe, safe_options.join("|")));
            }
            kind => out.push_str(&format!(" {}:{}", safe, kind.code())),
        }
    }

    // With no value-consuming fields there is no body; the row count has to
    // travel in the header instead.
    let has_consuming = fields.iter().any(|f| f.kind.consumes_value());
    if !has_consuming && !records.is_empty() {
        out.push_str(&format!(" +{}", records.len()));
    }

    if has_consuming {
        for record in records {
            out.push('\n');
            let mut parts = Vec::new();
            for field in fields {
                if !field.kind.consumes_value() {
                    continue;
                }
                parts.push(body_token(record.get(&field.name), &field.kind));
            }
            out.push_str(&parts.join(" "));
        }
    }

    out
}

/// Renders one body token for a field, by declared kind.
fn body_token(value: Option<&Value>, kind: &FieldKind) -> String {
    let value = match value {
        None | Some(Value::Null) => return "~".to_string(),
        Some(value) => value,
    };

    match (kind, value) {
        (FieldKind::Boolean, Value::Bool(b)) => if *b { "1" } else { "0" }.to_string(),
        (FieldKind::Array, Value::Array(items)) => array_token(items),
        _ => escape_spaces(&plain_text(value)),
    }
}

/// Decodes a tabular document. `lines[0]` must be the header line; alias
/// definitions have already been parsed off by the dispatcher.
pub(crate) fn decode_tabular(lines: &[&str], aliases: &AliasTable) -> Result<Vec<Value>> {
    let header = lines
        .first()
        .ok_or_else(|| Error::malformed_header("empty document"))?;

    let mut header_parts = header.split(' ');
    if header_parts.next() != Some("#") {
        return Err(Error::malformed_header(
            "tabular document must start with a '#' token",
        ));
    }

    let mut fields: Vec<FieldSpec> = Vec::new();
    let mut constants = ZoonMap::new();
    let mut explicit_row_count = 0usize;

    for part in header_parts {
        if part.is_empty() {
            continue;
        }

        if let Some(count) = part.strip_prefix('+').and_then(|n| n.parse().ok()) {
            explicit_row_count = count;
            continue;
        }

        match parse_header_token(part) {
            Some(HeaderToken::Constant { name, value }) => {
                constants.insert(resolve_name(&name, aliases), value);
            }
            Some(HeaderToken::Field { name, kind }) => {
                fields.push(FieldSpec::new(resolve_name(&name, aliases), kind));
            }
            None => {}
        }
    }

    let constants_nested = unflatten(&constants);

    let mut data = Vec::new();

    if explicit_row_count > 0 {
        for position in 0..explicit_row_count {
            data.push(build_row(&fields, None, position, &constants_nested));
        }
    } else {
        // Blank lines are skipped without consuming a row position, so
        // synthesized auto-increment values stay contiguous.
        let mut position = 0usize;
        for line in lines.iter().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let tokens: Vec<&str> = line.split(' ').collect();
            data.push(build_row(&fields, Some(&tokens), position, &constants_nested));
            position += 1;
        }
    }

    Ok(data)
}

enum HeaderToken {
    Constant { name: String, value: Value },
    Field { name: String, kind: FieldKind },
}

/// Classifies one header token: `@name:literal` / `@name=string` constants,
/// `name=opt1|opt2` enums, `name:type` typed fields. Tokens matching none of
/// these (like the `(empty)` sentinel) are ignored.
fn parse_header_token(part: &str) -> Option<HeaderToken> {
    if let Some(rest) = part.strip_prefix('@') {
        if let Some((name, literal)) = rest.split_once('=') {
            if name.is_empty() {
                return None;
            }
            return Some(HeaderToken::Constant {
                name: name.to_string(),
                value: Value::String(restore_spaces(literal)),
            });
        }
        if let Some((name, literal)) = rest.split_once(':') {
            if name.is_empty() {
                return None;
            }
            return Some(HeaderToken::Constant {
                name: name.to_string(),
                value: constant_literal(literal),
            });
        }
        return None;
    }

    if let Some((name, options)) = part.split_once('=') {
        if name.is_empty() {
            return None;
        }
        let options = options.split('|').map(str::to_string).collect();
        return Some(HeaderToken::Field {
            name: name.to_string(),
            kind: FieldKind::Enum(options),
        });
    }

    if let Some((name, code)) = part.split_once(':') {
        if name.is_empty() {
            return None;
        }
        return Some(HeaderToken::Field {
            name: name.to_string(),
            kind: FieldKind::from_code(code),
        });
    }

    None
}

/// Types a `:`-separated constant from its literal form: `y`/`n` booleans,
/// `~` null, anything else numeric (lenient).
fn constant_literal(literal: &str) -> Value {
    match literal {
        "y" => Value::Bool(true),
        "n" => Value::Bool(false),
        "~" => Value::Null,
        other => Value::Number(Number::parse_lenient(other)),
    }
}

/// Expands `%tok.rest` (or a bare `%tok`) through the alias table. Unknown
/// tokens pass through unchanged; decode stays total.
fn resolve_name(name: &str, aliases: &AliasTable) -> String {
    let Some(rest) = name.strip_prefix('%') else {
        return name.to_string();
    };

    match rest.split_once('.') {
        Some((token, suffix)) => match aliases.resolve(token) {
            Some(prefix) => format!("{}.{}", prefix, suffix),
            None => name.to_string(),
        },
        None => match aliases.resolve(rest) {
            Some(prefix) => prefix.to_string(),
            None => name.to_string(),
        },
    }
}

/// Builds one decoded record: consumes body tokens positionally, synthesizes
/// auto-increment values from the row position, unflattens, and folds the
/// header constants back in.
fn build_row(
    fields: &[FieldSpec],
    tokens: Option<&[&str]>,
    position: usize,
    constants_nested: &ZoonMap,
) -> Value {
    let mut row = ZoonMap::new();
    let mut token_idx = 0usize;

    for field in fields {
        if !field.kind.consumes_value() {
            row.insert(
                field.name.clone(),
                Value::Number(Number::Integer(position as i64 + 1)),
            );
            continue;
        }

        let token = tokens.and_then(|t| t.get(token_idx).copied());
        token_idx += 1;

        row.insert(field.name.clone(), body_value(token, &field.kind));
    }

    let mut nested = unflatten(&row);
    merge_into(&mut nested, constants_nested);
    Value::Object(nested)
}

/// Maps one body token to a value per the declared kind. A missing token
/// degrades per kind (NaN, false, empty) rather than failing.
fn body_value(token: Option<&str>, kind: &FieldKind) -> Value {
    if token == Some("~") {
        return Value::Null;
    }

    match kind {
        FieldKind::Integer => Value::Number(Number::parse_lenient(token.unwrap_or(""))),
        FieldKind::Boolean => Value::Bool(token == Some("1")),
        FieldKind::Array => {
            let inner = token
                .map(|t| {
                    let t = t.strip_prefix('[').unwrap_or(t);
                    t.strip_suffix(']').unwrap_or(t)
                })
                .unwrap_or("");
            if inner.is_empty() {
                Value::Array(Vec::new())
            } else {
                Value::Array(inner.split(',').map(|s| Value::String(restore_spaces(s))).collect())
            }
        }
        _ => Value::String(restore_spaces(token.unwrap_or(""))),
    }
}

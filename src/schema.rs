//! Field schema for the tabular form, and inference over flat records.
//!
//! A [`Schema`] is an ordered list of [`FieldSpec`]s describing one column of
//! the tabular body each. Schemas are normally inferred from the records being
//! encoded ([`Schema::infer`]), but callers can supply one through
//! [`crate::EncodeOptions::with_schema`] to bypass inference entirely.
//!
//! Inference is deterministic and never fails: unknown shapes degrade to
//! string fields.

use crate::{EncodeOptions, ZoonMap};
use std::collections::BTreeSet;

/// The classified kind of a tabular field.
///
/// Wire codes: `i` (integer), `i+` (auto-increment), `s` (string), `b`
/// (boolean), `a` (array); enum fields carry their option list in the header
/// (`name=opt1|opt2`) instead of a type code.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldKind {
    Integer,
    /// Values are exactly the sequence 1..N. Carries no body token; the value
    /// is reconstructed purely from row position on decode.
    AutoIncrement,
    String,
    Boolean,
    /// A string field with a small closed set of observed values, kept in
    /// lexicographic order.
    Enum(Vec<String>),
    Array,
}

impl FieldKind {
    /// The header type code for this kind. Enum fields are rendered from
    /// their option list instead.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            FieldKind::Integer => "i",
            FieldKind::AutoIncrement => "i+",
            FieldKind::String => "s",
            FieldKind::Boolean => "b",
            FieldKind::Enum(_) => "e",
            FieldKind::Array => "a",
        }
    }

    /// Resolves a header type code. Unknown codes degrade to `String`, which
    /// keeps decode total over arbitrary headers.
    #[must_use]
    pub fn from_code(code: &str) -> FieldKind {
        match code {
            "i" => FieldKind::Integer,
            "i+" => FieldKind::AutoIncrement,
            "b" => FieldKind::Boolean,
            "a" => FieldKind::Array,
            _ => FieldKind::String,
        }
    }

    /// Whether this field consumes a positional token in each body row.
    /// Auto-increment fields do not; their value is the row position.
    #[must_use]
    pub fn consumes_value(&self) -> bool {
        !matches!(self, FieldKind::AutoIncrement)
    }
}

/// One named, typed column of a tabular document.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    /// Dot-joined path of the field within the flattened record.
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Creates a field spec.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldSpec {
            name: name.into(),
            kind,
        }
    }
}

/// An ordered field list for the tabular form.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Schema {
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Creates a schema from a field list.
    #[must_use]
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Schema { fields }
    }

    /// Infers a schema from a batch of flat records.
    ///
    /// The first record's keys define the field list in encounter order;
    /// later records are assumed to conform (a missing key decodes as null and
    /// still gets a positional placeholder on encode). Classification uses the
    /// first record's value, refined by the whole population:
    ///
    /// - booleans become `Boolean`
    /// - integers whose values across the batch are exactly 1..N become
    ///   `AutoIncrement`, other numbers `Integer`
    /// - arrays become `Array`
    /// - strings become `Enum` when inference is enabled and the distinct
    ///   value count is at most `enum_threshold` and strictly less than the
    ///   record count; options are sorted lexicographically
    /// - anything else degrades to `String`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_zoon::{flatten, zoon, EncodeOptions, FieldKind, Schema};
    ///
    /// let records: Vec<_> = [1i64, 2, 3]
    ///     .iter()
    ///     .map(|id| {
    ///         let obj = zoon!({ "id": (*id), "active": true });
    ///         flatten(obj.as_object().unwrap())
    ///     })
    ///     .collect();
    ///
    /// let schema = Schema::infer(&records, &EncodeOptions::new());
    /// assert_eq!(schema.fields[0].kind, FieldKind::AutoIncrement);
    /// assert_eq!(schema.fields[1].kind, FieldKind::Boolean);
    /// ```
    #[must_use]
    pub fn infer(records: &[ZoonMap], options: &EncodeOptions) -> Schema {
        let sample = match records.first() {
            Some(sample) => sample,
            None => return Schema::default(),
        };

        let mut fields = Vec::with_capacity(sample.len());

        for (key, value) in sample.iter() {
            let kind = match value {
                crate::Value::Bool(_) => FieldKind::Boolean,
                crate::Value::Number(n) => {
                    if n.as_i64().is_some() && is_auto_increment(records, key) {
                        FieldKind::AutoIncrement
                    } else {
                        FieldKind::Integer
                    }
                }
                crate::Value::Array(_) => FieldKind::Array,
                crate::Value::String(_) if options.infer_enums => {
                    match enum_options(records, key, options.enum_threshold) {
                        Some(opts) => FieldKind::Enum(opts),
                        None => FieldKind::String,
                    }
                }
                _ => FieldKind::String,
            };
            fields.push(FieldSpec::new(key.clone(), kind));
        }

        Schema { fields }
    }
}

/// Checks whether the field's values across the batch are exactly 1,2,...,N.
fn is_auto_increment(records: &[ZoonMap], key: &str) -> bool {
    let mut expected = 1i64;
    for record in records {
        match record.get(key).and_then(|v| v.as_i64()) {
            Some(v) if v == expected => expected += 1,
            _ => return false,
        }
    }
    true
}

/// Returns the sorted distinct string values of the field when they qualify as
/// an enum option set: at most `threshold` distinct values and strictly fewer
/// distinct values than records, so a column of all-unique strings never
/// qualifies.
fn enum_options(records: &[ZoonMap], key: &str, threshold: usize) -> Option<Vec<String>> {
    let mut distinct = BTreeSet::new();
    for record in records {
        if let Some(crate::Value::String(s)) = record.get(key) {
            distinct.insert(s.clone());
        }
    }

    if distinct.len() <= threshold && distinct.len() < records.len() {
        Some(distinct.into_iter().collect())
    } else {
        None
    }
}

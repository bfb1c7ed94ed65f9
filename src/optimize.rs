//! Structural compression over an inferred schema and its record batch.
//!
//! Three independent passes run before tabular encoding, in this order:
//!
//! 1. **Constant extraction**: fields on which every record agrees move out
//!    of the row body and into the header (`@name:value`).
//! 2. **Enum option pruning**: declared option lists shrink to the values the
//!    batch actually uses.
//! 3. **Alias detection**: repeated dotted-path prefixes get short `%xx`
//!    tokens when the substitution saves characters.
//!
//! All of this is a compression heuristic: it changes how many characters the
//! encoding costs, never what a decode of the output reconstructs. The alias
//! pass is a greedy approximation, not a global optimum; candidates are
//! visited in deterministic order so the same input always yields the same
//! document.

use crate::schema::{FieldKind, FieldSpec, Schema};
use crate::{Value, ZoonMap};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Fixed per-alias overhead in the definition line: `%`, `=`, and the
/// two-letter token itself.
const ALIAS_DEF_OVERHEAD: i64 = 4;

/// Alias token length the savings model assumes (and the tokens guarantee).
const ALIAS_LEN: i64 = 2;

/// Maximum number of aliases per document.
const MAX_ALIASES: usize = 10;

/// Mapping from short alias tokens to the dotted path prefixes they stand for.
///
/// Tokens are 2+ lowercase letters, unique within a document. Iteration order
/// is acceptance order, which is also the order of the `%tok=prefix`
/// definition line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AliasTable {
    entries: IndexMap<String, String>,
}

impl AliasTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no aliases were accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of accepted aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The prefix a token stands for, if the token is defined.
    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    /// Iterates `(token, prefix)` pairs in acceptance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, p)| (t.as_str(), p.as_str()))
    }

    pub(crate) fn insert(&mut self, token: String, prefix: String) {
        self.entries.insert(token, prefix);
    }

    /// Rewrites a field name, replacing the longest-standing matching prefix
    /// with its `%token` form. Names without an aliased prefix pass through.
    #[must_use]
    pub fn apply(&self, name: &str) -> String {
        for (token, prefix) in self.iter() {
            if let Some(rest) = name.strip_prefix(prefix) {
                if rest.is_empty() {
                    return format!("%{}", token);
                }
                if rest.starts_with('.') {
                    return format!("%{}{}", token, rest);
                }
            }
        }
        name.to_string()
    }

    /// Renders the `%tok1=prefix1 %tok2=prefix2 ...` definition line.
    #[must_use]
    pub fn definition_line(&self) -> String {
        self.iter()
            .map(|(token, prefix)| format!("%{}={}", token, prefix))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The result of the optimizer passes: a rewritten field list, the hoisted
/// constants (flat path -> value, in extraction order), and the alias table.
#[derive(Clone, Debug)]
pub struct Optimized {
    pub schema: Schema,
    pub constants: ZoonMap,
    pub aliases: AliasTable,
}

/// Runs the three optimizer passes over a field list and the full batch.
///
/// Pure: the inputs are untouched and the same inputs always produce the same
/// output.
#[must_use]
pub fn optimize(schema: &Schema, records: &[ZoonMap]) -> Optimized {
    let (fields, constants) = extract_constants(&schema.fields, records);
    let fields = prune_enum_options(fields, records);
    let aliases = detect_aliases(&fields);

    Optimized {
        schema: Schema::new(fields),
        constants,
        aliases,
    }
}

/// Moves fields whose value is identical across all records into the constant
/// set. Only applies to batches with more than one record; auto-increment and
/// array fields never hoist. Fields are walked in reverse, so the constant map
/// iterates in reverse field order.
fn extract_constants(fields: &[FieldSpec], records: &[ZoonMap]) -> (Vec<FieldSpec>, ZoonMap) {
    let mut constants = ZoonMap::new();

    if records.len() > 1 {
        for field in fields.iter().rev() {
            if field.kind == FieldKind::AutoIncrement {
                continue;
            }

            let first = records[0].get(&field.name);
            if matches!(first, None | Some(Value::Array(_))) {
                continue;
            }

            let constant = records.iter().all(|record| {
                let value = record.get(&field.name);
                value == first || (is_null_like(value) && is_null_like(first))
            });

            if constant {
                if let Some(value) = first {
                    constants.insert(field.name.clone(), value.clone());
                }
            }
        }
    }

    let fields = fields
        .iter()
        .filter(|f| !constants.contains_key(&f.name))
        .cloned()
        .collect();

    (fields, constants)
}

fn is_null_like(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Shrinks declared enum option lists to the values the batch actually uses.
/// The replacement is sorted, so the header stays deterministic; decode reads
/// literals against whatever list is declared, so this never affects it.
fn prune_enum_options(fields: Vec<FieldSpec>, records: &[ZoonMap]) -> Vec<FieldSpec> {
    fields
        .into_iter()
        .map(|field| {
            let options = match &field.kind {
                FieldKind::Enum(options) if !options.is_empty() => options,
                _ => return field,
            };

            let mut used = BTreeSet::new();
            for record in records {
                if let Some(Value::String(s)) = record.get(&field.name) {
                    used.insert(s.clone());
                }
            }

            if used.len() < options.len() {
                FieldSpec::new(field.name, FieldKind::Enum(used.into_iter().collect()))
            } else {
                field
            }
        })
        .collect()
}

/// Greedy alias selection over shared dotted-path prefixes.
///
/// Every prefix shared by two or more field names is a candidate. Its worth is
/// `(len(prefix) - 2) * occurrences - (len(prefix) + 4)`: characters saved per
/// substitution times uses, minus the definition-line overhead. Candidates are
/// visited in descending net savings (stable, encounter order breaks ties) and
/// accepted while the savings are positive and at least two not-yet-aliased
/// fields would use the prefix, up to ten aliases.
fn detect_aliases(fields: &[FieldSpec]) -> AliasTable {
    let mut prefix_counts: IndexMap<String, i64> = IndexMap::new();

    for field in fields {
        let parts: Vec<&str> = field.name.split('.').collect();
        for i in 1..parts.len() {
            let prefix = parts[..i].join(".");
            *prefix_counts.entry(prefix).or_insert(0) += 1;
        }
    }

    let mut candidates: Vec<(String, i64)> = prefix_counts
        .into_iter()
        .map(|(prefix, count)| {
            let len = prefix.len() as i64;
            let net = (len - ALIAS_LEN) * count - (len + ALIAS_DEF_OVERHEAD);
            (prefix, net)
        })
        .collect();
    candidates.sort_by(|a, b| b.1.cmp(&a.1));

    let mut aliases = AliasTable::new();
    let mut used_tokens: BTreeSet<String> = BTreeSet::new();
    let mut aliased_fields: BTreeSet<&str> = BTreeSet::new();
    let mut fallback = TokenSequence::new();

    for (prefix, net) in candidates {
        if net <= 0 {
            continue;
        }

        let would_alias: Vec<&str> = fields
            .iter()
            .map(|f| f.name.as_str())
            .filter(|name| {
                name.starts_with(&format!("{}.", prefix)) && !aliased_fields.contains(name)
            })
            .collect();
        if would_alias.len() < 2 {
            continue;
        }

        let mut token = initials(&prefix);
        while token.len() < 2 || used_tokens.contains(&token) {
            token = fallback.next_token();
        }

        used_tokens.insert(token.clone());
        aliases.insert(token, prefix);
        aliased_fields.extend(would_alias);

        if aliases.len() >= MAX_ALIASES {
            break;
        }
    }

    aliases
}

/// First letter of each prefix segment, lowercased. Non-letter leading
/// characters are dropped, which forces the fallback sequence.
fn initials(prefix: &str) -> String {
    prefix
        .split('.')
        .filter_map(|segment| segment.chars().next())
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Deterministic two-letter token sequence: `aa`, `ab`, ..., `az`, `ba`, ...
struct TokenSequence {
    index: usize,
}

impl TokenSequence {
    fn new() -> Self {
        TokenSequence { index: 0 }
    }

    fn next_token(&mut self) -> String {
        let first = (b'a' + (self.index / 26 % 26) as u8) as char;
        let second = (b'a' + (self.index % 26) as u8) as char;
        self.index += 1;
        format!("{}{}", first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{flatten, zoon, EncodeOptions};

    fn records(values: Value) -> Vec<ZoonMap> {
        match values {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(obj) => flatten(&obj),
                    other => panic!("expected object, got {:?}", other),
                })
                .collect(),
            other => panic!("expected array, got {:?}", other),
        }
    }

    fn field(name: &str) -> FieldSpec {
        FieldSpec::new(name, FieldKind::String)
    }

    #[test]
    fn test_constant_extraction() {
        let data = records(zoon!([
            { "id": 1, "status": "ok" },
            { "id": 2, "status": "ok" }
        ]));
        let schema = Schema::infer(&data, &EncodeOptions::new());
        let optimized = optimize(&schema, &data);

        assert_eq!(optimized.constants.get("status"), Some(&Value::from("ok")));
        assert!(optimized
            .schema
            .fields
            .iter()
            .all(|f| f.name != "status"));
    }

    #[test]
    fn test_no_constants_for_single_record() {
        let data = records(zoon!([{ "status": "ok" }]));
        let schema = Schema::infer(&data, &EncodeOptions::new());
        let optimized = optimize(&schema, &data);

        assert!(optimized.constants.is_empty());
        assert_eq!(optimized.schema.fields.len(), 1);
    }

    #[test]
    fn test_null_field_hoists_as_null_constant() {
        let data = records(zoon!([{ "a": 1, "x": null }, { "a": 2, "x": null }]));
        let schema = Schema::infer(&data, &EncodeOptions::new());
        let optimized = optimize(&schema, &data);

        assert_eq!(optimized.constants.get("x"), Some(&Value::Null));
    }

    #[test]
    fn test_equal_arrays_do_not_hoist() {
        let data = records(zoon!([
            { "a": 1, "tags": ["x"] },
            { "a": 2, "tags": ["x"] }
        ]));
        let schema = Schema::infer(&data, &EncodeOptions::new());
        let optimized = optimize(&schema, &data);

        assert!(optimized.constants.is_empty());
    }

    #[test]
    fn test_enum_pruning_keeps_only_used_options() {
        let fields = vec![FieldSpec::new(
            "role",
            FieldKind::Enum(vec![
                "Admin".to_string(),
                "Guest".to_string(),
                "User".to_string(),
            ]),
        )];
        let data = records(zoon!([
            { "role": "User" },
            { "role": "Admin" },
            { "role": "User" }
        ]));

        let pruned = prune_enum_options(fields, &data);
        assert_eq!(
            pruned[0].kind,
            FieldKind::Enum(vec!["Admin".to_string(), "User".to_string()])
        );
    }

    #[test]
    fn test_alias_detection_basic() {
        let fields = vec![
            field("customer.name"),
            field("customer.email"),
            field("customer.phone"),
            field("total"),
        ];
        let aliases = detect_aliases(&fields);

        assert_eq!(aliases.len(), 1);
        // "customer" is one segment; its 1-letter initial forces the fallback.
        assert_eq!(aliases.resolve("aa"), Some("customer"));
        assert_eq!(aliases.apply("customer.name"), "%aa.name");
        assert_eq!(aliases.apply("total"), "total");
    }

    #[test]
    fn test_alias_token_from_segment_initials() {
        let fields = vec![
            field("shipping.address.street"),
            field("shipping.address.city"),
            field("shipping.address.zip"),
        ];
        let aliases = detect_aliases(&fields);

        assert_eq!(aliases.resolve("sa"), Some("shipping.address"));
    }

    #[test]
    fn test_short_prefix_with_negative_savings_is_rejected() {
        // prefix "ab" (len 2): net = (2-2)*2 - (2+4) = -6
        let fields = vec![field("ab.x"), field("ab.y")];
        let aliases = detect_aliases(&fields);
        assert!(aliases.is_empty());
    }

    #[test]
    fn test_alias_needs_two_unaliased_fields() {
        let fields = vec![field("configuration.value"), field("other")];
        let aliases = detect_aliases(&fields);
        assert!(aliases.is_empty());
    }

    #[test]
    fn test_definition_line_format() {
        let fields = vec![
            field("shipping.address.street"),
            field("shipping.address.city"),
        ];
        let aliases = detect_aliases(&fields);
        assert_eq!(aliases.definition_line(), "%sa=shipping.address");
    }

    #[test]
    fn test_determinism() {
        let fields = vec![
            field("customer.billing.name"),
            field("customer.billing.email"),
            field("customer.shipping.name"),
            field("customer.shipping.email"),
        ];
        let a = detect_aliases(&fields);
        let b = detect_aliases(&fields);
        assert_eq!(a, b);
    }

    #[test]
    fn test_token_sequence() {
        let mut seq = TokenSequence::new();
        assert_eq!(seq.next_token(), "aa");
        assert_eq!(seq.next_token(), "ab");
        for _ in 2..26 {
            seq.next_token();
        }
        assert_eq!(seq.next_token(), "ba");
    }
}

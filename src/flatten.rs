//! Bidirectional transform between nested objects and dot-path flat records.
//!
//! The tabular codec works over *flat records*: ordered maps whose keys are
//! dot-joined paths (`"server.host"`) and whose values are non-container
//! leaves. [`flatten`] produces them from nested objects, [`unflatten`]
//! rebuilds the nesting on decode, and [`merge_into`] folds header constants
//! back into decoded records.
//!
//! Arrays are leaves: the flattener never recurses into them, so
//! `{"tags": [1, 2]}` flattens to a single `tags` entry.

use crate::{Value, ZoonMap};

/// Flattens a nested object into a dot-path keyed record.
///
/// Every nested object value is replaced by its leaf values keyed by the
/// dot-joined path. Arrays and primitives at any depth stay single entries.
///
/// # Examples
///
/// ```rust
/// use serde_zoon::{flatten, zoon, Value};
///
/// let obj = zoon!({ "a": { "b": 1 }, "c": true });
/// let flat = flatten(obj.as_object().unwrap());
///
/// assert_eq!(flat.get("a.b"), Some(&Value::from(1)));
/// assert_eq!(flat.get("c"), Some(&Value::Bool(true)));
/// ```
#[must_use]
pub fn flatten(obj: &ZoonMap) -> ZoonMap {
    let mut result = ZoonMap::new();
    flatten_into(obj, "", &mut result);
    result
}

fn flatten_into(obj: &ZoonMap, prefix: &str, result: &mut ZoonMap) {
    for (key, value) in obj.iter() {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Object(nested) => flatten_into(nested, &path, result),
            leaf => {
                result.insert(path, leaf.clone());
            }
        }
    }
}

/// Rebuilds a nested object from a dot-path keyed record.
///
/// Each key is split on `.` and the intermediate objects are created or
/// merged. When two keys imply conflicting structure at the same path (a path
/// that is both a leaf and a prefix, e.g. keys `a` and `a.b` in one record),
/// precedence is deterministic last-writer-wins in iteration order: a later
/// entry that needs an object where a leaf sits replaces the leaf, and a later
/// leaf replaces an object.
///
/// # Examples
///
/// ```rust
/// use serde_zoon::{unflatten, Value, ZoonMap};
///
/// let mut flat = ZoonMap::new();
/// flat.insert("a.b".to_string(), Value::from(1));
/// let nested = unflatten(&flat);
///
/// let inner = nested.get("a").and_then(|v| v.as_object()).unwrap();
/// assert_eq!(inner.get("b"), Some(&Value::from(1)));
/// ```
#[must_use]
pub fn unflatten(flat: &ZoonMap) -> ZoonMap {
    let mut result = ZoonMap::new();

    for (key, value) in flat.iter() {
        let mut parts = key.split('.').collect::<Vec<_>>();
        let last = match parts.pop() {
            Some(last) => last,
            None => continue,
        };

        let mut current = &mut result;
        for part in parts {
            current = child_object(current, part);
        }
        current.insert(last.to_string(), value.clone());
    }

    result
}

/// Returns the object stored under `key`, replacing whatever leaf was there.
fn child_object<'a>(map: &'a mut ZoonMap, key: &str) -> &'a mut ZoonMap {
    if !matches!(map.get(key), Some(Value::Object(_))) {
        map.insert(key.to_string(), Value::Object(ZoonMap::new()));
    }
    match map.get_mut(key) {
        Some(Value::Object(child)) => child,
        _ => unreachable!("entry was just set to an object"),
    }
}

/// Deep-merges `source` into `target`.
///
/// Precedence is part of the format contract, not an implementation detail:
/// on an object/object conflict the merge recurses; on any other conflict the
/// source value overwrites the target. Arrays are treated as scalars.
///
/// The tabular decoder uses this to fold unflattened header constants back
/// into each decoded record.
pub fn merge_into(target: &mut ZoonMap, source: &ZoonMap) {
    for (key, value) in source.iter() {
        match value {
            Value::Object(nested) => {
                let child = child_object(target, key);
                merge_into(child, nested);
            }
            leaf => {
                target.insert(key.clone(), leaf.clone());
            }
        }
    }
}

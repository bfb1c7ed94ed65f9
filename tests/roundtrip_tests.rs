//! End-to-end decode(encode(x)) tests over the value domain the format
//! round-trips exactly: uniform flat records, nested objects, nulls, and the
//! serde bridge.

use serde::Serialize;
use serde_zoon::{decode, encode, to_string, to_value, zoon, Value};

fn roundtrip_records(data: Value) -> Vec<Value> {
    let text = encode(&data);
    decode(&text).unwrap_or_else(|e| panic!("decode failed: {}\ndocument was:\n{}", e, text))
}

#[test]
fn test_flat_records_roundtrip_exactly() {
    let data = zoon!([
        { "sku": "A100", "qty": 4, "price": 250, "backorder": false },
        { "sku": "B200", "qty": 1, "price": 990, "backorder": true }
    ]);

    let rows = roundtrip_records(data.clone());
    assert_eq!(Value::Array(rows), data);
}

#[test]
fn test_auto_increment_regenerates_from_position() {
    let data = zoon!([
        { "id": 1, "name": "north" },
        { "id": 2, "name": "south" },
        { "id": 3, "name": "east" },
        { "id": 4, "name": "west" }
    ]);

    let rows = roundtrip_records(data.clone());
    assert_eq!(Value::Array(rows), data);
}

#[test]
fn test_hoisted_constant_restored_on_every_record() {
    let data = zoon!([
        { "host": "a", "env": "prod" },
        { "host": "b", "env": "prod" },
        { "host": "c", "env": "prod" }
    ]);

    let rows = roundtrip_records(data.clone());
    assert_eq!(Value::Array(rows), data);
}

#[test]
fn test_nested_records_roundtrip_through_flattening() {
    let data = zoon!([
        { "order": 100, "customer": { "contact": { "name": "Ada", "city": "London" } } },
        { "order": 200, "customer": { "contact": { "name": "Bo", "city": "Oslo" } } }
    ]);

    let rows = roundtrip_records(data.clone());
    assert_eq!(Value::Array(rows), data);
}

#[test]
fn test_null_fields_roundtrip() {
    let data = zoon!([
        { "a": 5, "note": "first" },
        { "a": null, "note": "second" },
        { "a": 9, "note": "third" }
    ]);

    let rows = roundtrip_records(data.clone());
    assert_eq!(Value::Array(rows), data);
}

#[test]
fn test_missing_key_encodes_tilde_and_decodes_null() {
    // The first record defines the field list; a later record lacking a key
    // still gets a positional placeholder in its row.
    let data = zoon!([
        { "a": 1, "b": "x" },
        { "a": 2 }
    ]);

    let text = encode(&data);
    assert_eq!(text, "# a:i+ b=x\nx\n~");

    let rows = decode(&text).unwrap();
    assert_eq!(
        rows[0].as_object().unwrap().get("b"),
        Some(&Value::from("x"))
    );
    let second = rows[1].as_object().unwrap();
    assert_eq!(second.get("a"), Some(&Value::from(2)));
    assert_eq!(second.get("b"), Some(&Value::Null));
}

#[test]
fn test_inline_object_roundtrip() {
    let data = zoon!({
        "title": "report",
        "pages": 14,
        "draft": false,
        "owner": { "name": "Ada", "id": 7 },
    });

    let rows = roundtrip_records(data.clone());
    assert_eq!(rows, vec![data]);
}

#[test]
fn test_space_escaping_is_lossy_for_underscores() {
    // Documented limitation: an original underscore comes back as a space.
    let data = zoon!([
        { "k": 1, "s": "snake_case" },
        { "k": 2, "s": "kebab-case" }
    ]);

    let rows = roundtrip_records(data);
    assert_eq!(
        rows[0].as_object().unwrap().get("s"),
        Some(&Value::from("snake case"))
    );
}

#[test]
fn test_enum_field_roundtrip() {
    let data = zoon!([
        { "job": "w1", "state": "queued" },
        { "job": "w2", "state": "running" },
        { "job": "w3", "state": "queued" },
        { "job": "w4", "state": "queued" }
    ]);

    let text = encode(&data);
    assert!(text.contains("state=queued|running"));

    let rows = decode(&text).unwrap();
    assert_eq!(Value::Array(rows), data);
}

#[test]
fn test_serde_batch_roundtrip() {
    #[derive(Serialize, Clone)]
    struct Sensor {
        id: u32,
        label: String,
        online: bool,
    }

    let sensors = vec![
        Sensor { id: 1, label: "north".to_string(), online: true },
        Sensor { id: 2, label: "south".to_string(), online: false },
    ];

    let text = to_string(&sensors).unwrap();
    let rows = decode(&text).unwrap();

    assert_eq!(Value::Array(rows), to_value(&sensors).unwrap());
}

#[test]
fn test_decode_is_total_over_inline_garbage() {
    // No header means the inline parser runs, and it never fails.
    for input in ["", "just some words", "a:{b:{c:{", "x:[1,2", "trailing key"] {
        let rows = decode(input).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_object());
    }
}

#[test]
fn test_decode_degrades_damaged_body_tokens() {
    use serde_zoon::Number;

    let rows = decode("# a:i b:b c:s\nnot-a-number 1").unwrap();
    let obj = rows[0].as_object().unwrap();

    match obj.get("a") {
        Some(Value::Number(Number::Float(f))) => assert!(f.is_nan()),
        other => panic!("expected NaN, got {:?}", other),
    }
    assert_eq!(obj.get("b"), Some(&Value::Bool(true)));
    // Missing token for c degrades to an empty string.
    assert_eq!(obj.get("c"), Some(&Value::from("")));
}

#[test]
fn test_encode_is_deterministic() {
    let data = zoon!([
        { "id": 1, "shipping": { "address": { "city": "Oslo", "zip": "0150" } }, "status": "ok" },
        { "id": 2, "shipping": { "address": { "city": "Bergen", "zip": "5003" } }, "status": "ok" }
    ]);

    let first = encode(&data);
    for _ in 0..5 {
        assert_eq!(encode(&data), first);
    }
}

//! Exact wire-format tests: these pin down the document text byte for byte,
//! so any change to header layout, optimizer output, or row rendering shows
//! up here first.

use serde_zoon::{decode, encode, encode_with_options, zoon, EncodeOptions, Value};

#[test]
fn test_user_listing_document() {
    let data = zoon!([
        { "id": 1, "name": "Alice", "role": "Admin", "active": true },
        { "id": 2, "name": "Bob", "role": "User", "active": true },
        { "id": 3, "name": "Carol", "role": "User", "active": false }
    ]);

    let text = encode(&data);
    assert_eq!(
        text,
        "# id:i+ name:s role=Admin|User active:b\nAlice Admin 1\nBob User 1\nCarol User 0"
    );

    let rows = decode(&text).unwrap();
    assert_eq!(rows.len(), 3);

    let carol = rows[2].as_object().unwrap();
    assert_eq!(carol.get("id"), Some(&Value::from(3)));
    assert_eq!(carol.get("name"), Some(&Value::from("Carol")));
    assert_eq!(carol.get("role"), Some(&Value::from("User")));
    assert_eq!(carol.get("active"), Some(&Value::Bool(false)));
}

#[test]
fn test_constant_hoisting_document() {
    let data = zoon!([
        { "id": 1, "status": "ok", "region": "eu" },
        { "id": 2, "status": "ok", "region": "eu" },
        { "id": 3, "status": "ok", "region": "eu" }
    ]);

    // Constants are collected walking the field list in reverse, and every
    // field hoists here, so the body disappears entirely.
    let text = encode(&data);
    assert_eq!(text, "# @region=eu @status=ok id:i+ +3");

    let rows = decode(&text).unwrap();
    assert_eq!(rows.len(), 3);
    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().unwrap();
        assert_eq!(obj.get("id"), Some(&Value::from(i as i64 + 1)));
        assert_eq!(obj.get("status"), Some(&Value::from("ok")));
        assert_eq!(obj.get("region"), Some(&Value::from("eu")));
    }
}

#[test]
fn test_alias_definition_line() {
    let data = zoon!([
        { "customer": { "contact": { "name": "Ada", "email": "ada@x.io" } }, "total": 10 },
        { "customer": { "contact": { "name": "Bo", "email": "bo@x.io" } }, "total": 20 }
    ]);

    let text = encode(&data);
    let first_line = text.lines().next().unwrap();
    assert_eq!(first_line, "%cc=customer.contact");
    assert!(text.lines().nth(1).unwrap().contains("%cc.name:s"));
}

#[test]
fn test_alias_saves_characters() {
    // Removing the alias must never yield a shorter document.
    let data = zoon!([
        { "shipping": { "address": { "street": "A St", "city": "Oslo" } } },
        { "shipping": { "address": { "street": "B Rd", "city": "Bergen" } } }
    ]);

    let aliased = encode(&data);
    assert!(aliased.starts_with("%sa=shipping.address\n"));

    let unaliased_header_len = "# shipping.address.street:s shipping.address.city:s".len();
    let aliased_header_len = aliased.lines().take(2).map(str::len).sum::<usize>() + 1;
    assert!(aliased_header_len < unaliased_header_len + 1 + "A_St Oslo".len());
}

#[test]
fn test_boolean_body_tokens_differ_from_header_tokens() {
    // Booleans are y/n in header constants but 1/0 in body rows.
    let data = zoon!([
        { "name": "a", "flag": true, "beta": true },
        { "name": "b", "flag": false, "beta": true }
    ]);

    let text = encode(&data);
    assert_eq!(text, "# @beta:y name:s flag:b\na 1\nb 0");
}

#[test]
fn test_null_body_token() {
    let data = zoon!([
        { "a": 7, "b": "p" },
        { "a": null, "b": "q" }
    ]);

    let text = encode(&data);
    assert_eq!(text, "# a:i b:s\n7 p\n~ q");

    let rows = decode(&text).unwrap();
    assert_eq!(rows[1].as_object().unwrap().get("a"), Some(&Value::Null));
}

#[test]
fn test_array_field_rendering() {
    let data = zoon!([
        { "x": 3, "tags": ["red", "deep blue"] },
        { "x": 9, "tags": [] }
    ]);

    let text = encode(&data);
    assert_eq!(text, "# x:i tags:a\n3 [red,deep_blue]\n9 []");

    let rows = decode(&text).unwrap();
    assert_eq!(
        rows[0].as_object().unwrap().get("tags"),
        Some(&Value::Array(vec![
            Value::from("red"),
            Value::from("deep blue")
        ]))
    );
    assert_eq!(
        rows[1].as_object().unwrap().get("tags"),
        Some(&Value::Array(Vec::new()))
    );
}

#[test]
fn test_enum_options_pruned_to_used_values() {
    use serde_zoon::{FieldKind, FieldSpec, Schema};

    let schema = Schema::new(vec![
        FieldSpec::new("name", FieldKind::String),
        FieldSpec::new(
            "state",
            FieldKind::Enum(vec![
                "closed".to_string(),
                "open".to_string(),
                "pending".to_string(),
            ]),
        ),
    ]);
    let options = EncodeOptions::new().with_schema(schema);

    let data = zoon!([
        { "name": "a", "state": "open" },
        { "name": "b", "state": "closed" },
        { "name": "c", "state": "open" }
    ]);

    let text = encode_with_options(&data, &options);
    assert_eq!(text, "# name:s state=closed|open\na open\nb closed\nc open");
}

#[test]
fn test_inline_document_format() {
    let data = zoon!({
        "name": "Ada Lovelace",
        "age": 36,
        "admin": true,
        "nickname": null,
        "langs": ["math", "prose"],
        "address": { "city": "London" },
    });

    let text = encode(&data);
    assert_eq!(
        text,
        "name=Ada_Lovelace age:36 admin:y nickname:~ langs:[math,prose] address:{city=London}"
    );

    let rows = decode(&text).unwrap();
    let obj = rows[0].as_object().unwrap();
    assert_eq!(obj.get("name"), Some(&Value::from("Ada Lovelace")));
    assert_eq!(obj.get("age"), Some(&Value::from(36)));
    assert_eq!(obj.get("nickname"), Some(&Value::Null));
    let address = obj.get("address").and_then(|v| v.as_object()).unwrap();
    assert_eq!(address.get("city"), Some(&Value::from("London")));
}

#[test]
fn test_degenerate_documents() {
    assert_eq!(encode(&Value::Null), "#\n~");
    assert_eq!(encode(&zoon!(true)), "# value:s\ntrue");
    assert_eq!(encode(&zoon!([])), "# (empty)");
    assert_eq!(encode(&zoon!([1, 2, 3])), "# value:s\n1\n2\n3");
}

#[test]
fn test_explicit_empty_schema_encodes_header_only() {
    use serde_zoon::Schema;

    let options = EncodeOptions::new().with_schema(Schema::default());
    let data = zoon!([{ "a": 1 }, { "a": 2 }]);
    assert_eq!(encode_with_options(&data, &options), "# +2");
}

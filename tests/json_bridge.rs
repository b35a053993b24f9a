use avrodyn::json::{value_from_json, value_to_json, JsonError};
use avrodyn::{from_avro, to_avro, AvroSchema, PrimitiveKind, Schema, TargetType, Value};
use serde_json::json;

#[test]
fn json_document_follows_schema_types() {
    let schema = Schema::record(
        "Event",
        [
            ("id", Schema::Long),
            ("ratio", Schema::Double),
            ("kind", Schema::enumeration("Kind", ["CLICK", "VIEW"])),
            ("payload", Schema::Bytes),
            ("tags", Schema::array(Schema::String)),
            ("note", Schema::nullable(Schema::String)),
        ],
    );
    let doc = json!({
        "id": 7,
        "ratio": 0.5,
        "kind": "VIEW",
        "payload": "AQID",
        "tags": ["x"],
        "note": null
    });

    let value = value_from_json(&doc, &schema).expect("from json");
    assert_eq!(
        value,
        Value::record([
            ("id", Value::Int(7)),
            ("ratio", Value::Float(0.5)),
            ("kind", Value::symbol("VIEW")),
            ("payload", Value::Bytes(vec![1, 2, 3])),
            ("tags", Value::sequence([Value::from("x")])),
            ("note", Value::Null),
        ])
    );
}

#[test]
fn union_members_are_tried_in_order() {
    let schema = Schema::union([Schema::Null, Schema::Long, Schema::String]);
    assert_eq!(value_from_json(&json!(3), &schema).expect("long"), Value::Int(3));
    assert_eq!(value_from_json(&json!("3"), &schema).expect("string"), Value::from("3"));
    assert_eq!(value_from_json(&json!(null), &schema).expect("null"), Value::Null);
    assert!(matches!(
        value_from_json(&json!(true), &schema),
        Err(JsonError::Union { .. })
    ));
}

#[test]
fn mismatches_report_path() {
    let schema = Schema::record("R", [("xs", Schema::array(Schema::Int))]);
    let err = value_from_json(&json!({"xs": [1, "two"]}), &schema).expect_err("bad item");
    match err {
        JsonError::Mismatch { path, .. } => assert_eq!(path, "$.xs[1]"),
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn invalid_base64_is_rejected() {
    assert!(matches!(
        value_from_json(&json!("not base64!"), &Schema::Bytes),
        Err(JsonError::Base64 { .. })
    ));
}

#[test]
fn value_to_json_renders_bytes_as_base64() {
    let value = Value::record([
        ("b", Value::Bytes(vec![1, 2, 3])),
        ("s", Value::symbol("A")),
        ("m", Value::map([("k", Value::Float(1.5))])),
        ("n", Value::Null),
    ]);
    assert_eq!(
        value_to_json(&value),
        json!({"b": "AQID", "s": "A", "m": {"k": 1.5}, "n": null})
    );
}

#[test]
fn non_finite_floats_render_as_null() {
    let value = Value::sequence([
        Value::Float(f64::NAN),
        Value::Float(f64::INFINITY),
        Value::Float(f64::NEG_INFINITY),
        Value::Float(2.5),
    ]);
    assert_eq!(value_to_json(&value), json!([null, null, null, 2.5]));

    // The null does not read back as a double.
    assert!(value_from_json(&json!(null), &Schema::Double).is_err());
}

#[test]
fn json_to_datum_and_back() {
    let schema = AvroSchema::parse_str(
        r#"{"type": "record", "name": "P", "fields": [
            {"name": "x", "type": "int"},
            {"name": "label", "type": ["null", "string"]}
        ]}"#,
    )
    .expect("schema");
    let doc = json!({"x": 12, "label": "pt"});

    let value = value_from_json(&doc, schema.model()).expect("from json");
    let bytes = to_avro(&schema, &value).expect("encode");
    let back = from_avro(&schema, &bytes, &TargetType::Any).expect("decode");
    assert_eq!(value_to_json(&back), doc);
}

#[test]
fn target_descriptor_loads_from_json() {
    let target: TargetType = serde_json::from_value(json!({
        "wrapped": {
            "inner": {"record": {"fields": [
                {"name": "id", "ty": {"primitive": "int"}},
                {"name": "tags", "ty": {"array": {"element": {"primitive": "symbol"}}}},
                {"name": "blob", "ty": "bytes"},
                {"name": "extra", "ty": "any"}
            ]}},
            "readonly": true
        }
    }))
    .expect("target");

    assert!(target.is_readonly());
    assert_eq!(target.field("id"), Some(&TargetType::Primitive(PrimitiveKind::Int)));
    assert_eq!(target.field("tags"), Some(&TargetType::array(TargetType::symbol())));
    assert_eq!(target.field("blob"), Some(&TargetType::Bytes));
    assert_eq!(target.field("extra"), Some(&TargetType::Any));
}

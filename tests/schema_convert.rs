use avrodyn::{AvroSchema, Schema, SchemaError};

#[test]
fn named_references_are_inlined() {
    let schema = AvroSchema::parse_str(
        r#"{
            "type": "record", "name": "Route", "namespace": "geo",
            "fields": [
                {"name": "from", "type": {"type": "record", "name": "Point", "fields": [
                    {"name": "lat", "type": "double"},
                    {"name": "lon", "type": "double"}
                ]}},
                {"name": "to", "type": "Point"},
                {"name": "via", "type": {"type": "array", "items": "geo.Point"}}
            ]
        }"#,
    )
    .expect("schema");

    let point = Schema::record("geo.Point", [("lat", Schema::Double), ("lon", Schema::Double)]);
    assert_eq!(
        schema.model(),
        &Schema::record(
            "geo.Route",
            [
                ("from", point.clone()),
                ("to", point.clone()),
                ("via", Schema::array(point)),
            ]
        )
    );
}

#[test]
fn recursive_schema_is_rejected() {
    let err = AvroSchema::parse_str(
        r#"{
            "type": "record", "name": "Node",
            "fields": [
                {"name": "value", "type": "long"},
                {"name": "next", "type": ["null", "Node"]}
            ]
        }"#,
    )
    .expect_err("recursive");
    assert!(matches!(err, SchemaError::Recursive(name) if name == "Node"));
}

#[test]
fn decimal_is_unsupported() {
    let err = AvroSchema::parse_str(
        r#"{"type": "bytes", "logicalType": "decimal", "precision": 4, "scale": 2}"#,
    )
    .expect_err("decimal");
    assert!(matches!(err, SchemaError::Unsupported(_)));
}

#[test]
fn invalid_json_is_a_parse_error() {
    let err = AvroSchema::parse_str("{ not json").expect_err("parse");
    assert!(matches!(err, SchemaError::Parse(_)));
}

#[test]
fn enums_and_fixed_keep_their_shape() {
    let schema = AvroSchema::parse_str(
        r#"{
            "type": "record", "name": "Blob",
            "fields": [
                {"name": "kind", "type": {"type": "enum", "name": "Kind", "symbols": ["A", "B"]}},
                {"name": "digest", "type": {"type": "fixed", "name": "Md5", "size": 16}},
                {"name": "other", "type": "Kind"}
            ]
        }"#,
    )
    .expect("schema");

    let fields = schema.model().fields().expect("record");
    assert_eq!(fields[0].schema, Schema::enumeration("Kind", ["A", "B"]));
    assert_eq!(fields[1].schema, Schema::fixed("Md5", 16));
    assert_eq!(fields[2].schema, fields[0].schema);
}

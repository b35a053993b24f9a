use avrodyn::{decode, encode, GenericNode, Schema, TargetType, Value};

fn roundtrip(schema: &Schema, value: &Value, target: &TargetType) -> Value {
    let node = encode(schema, value).expect("encode");
    decode(schema, &node, target).expect("decode")
}

#[test]
fn roundtrip_primitives() {
    let cases = vec![
        (Schema::Null, Value::Null),
        (Schema::Boolean, Value::Bool(true)),
        (Schema::Int, Value::Int(-42)),
        (Schema::Long, Value::Int(9_223_372_036_854_775_000)),
        (Schema::Float, Value::Float(3.5)),
        (Schema::Double, Value::Float(-1.25)),
        (Schema::String, Value::from("hello")),
        (Schema::Bytes, Value::Bytes(vec![0, 1, 2, 255])),
        (Schema::fixed("Id", 4), Value::Bytes(vec![9, 8, 7, 6])),
        (Schema::enumeration("Suit", ["HEARTS", "SPADES"]), Value::symbol("SPADES")),
    ];

    for (schema, value) in cases {
        assert_eq!(roundtrip(&schema, &value, &TargetType::Any), value, "schema {schema}");
    }
}

#[test]
fn narrow_types_use_32_bit_nodes() {
    let node = encode(&Schema::Int, &Value::Int(7)).expect("encode");
    assert_eq!(node, GenericNode::Int(7));

    let node = encode(&Schema::Float, &Value::Float(0.25)).expect("encode");
    assert_eq!(node, GenericNode::Float(0.25));

    let node = encode(&Schema::Long, &Value::Int(7)).expect("encode");
    assert_eq!(node, GenericNode::Long(7));
}

#[test]
fn bytes_are_copied_into_a_fresh_buffer() {
    let source = vec![1u8, 2, 3];
    let value = Value::Bytes(source.clone());
    let node = encode(&Schema::Bytes, &value).expect("encode");

    match node {
        GenericNode::Bytes(bytes) => {
            assert_eq!(bytes, source);
            assert_ne!(bytes.as_ptr(), value.as_bytes().expect("bytes").as_ptr());
        }
        other => panic!("expected bytes node, got {other:?}"),
    }
}

#[test]
fn record_fields_follow_schema_order() {
    let schema = Schema::record(
        "Row",
        [("a", Schema::Int), ("b", Schema::array(Schema::String))],
    );
    let value = Value::record([
        ("b", Value::sequence([Value::from("x"), Value::from("y")])),
        ("a", Value::Int(5)),
    ]);

    let node = encode(&schema, &value).expect("encode");
    match &node {
        GenericNode::Record(fields) => {
            let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();
            assert_eq!(names, vec!["a", "b"]);
        }
        other => panic!("expected record node, got {other:?}"),
    }

    let decoded = decode(&schema, &node, &TargetType::Any).expect("decode");
    let expected = Value::record([
        ("a", Value::Int(5)),
        ("b", Value::sequence([Value::from("x"), Value::from("y")])),
    ]);
    assert_eq!(decoded, expected);
    let names: Vec<_> = decoded.as_record().expect("record").names().collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn absent_record_field_binds_null() {
    let schema = Schema::record(
        "User",
        [("id", Schema::Long), ("nick", Schema::nullable(Schema::String))],
    );
    let value = Value::record([("id", Value::Int(1))]);

    let decoded = roundtrip(&schema, &value, &TargetType::Any);
    let record = decoded.as_record().expect("record");
    assert_eq!(record.get("id"), Some(&Value::Int(1)));
    assert_eq!(record.get("nick"), Some(&Value::Null));
}

#[test]
fn absent_field_with_non_null_schema_fails() {
    let schema = Schema::record("User", [("id", Schema::Long)]);
    assert!(encode(&schema, &Value::record(Vec::<(String, Value)>::new())).is_err());
}

#[test]
fn map_of_records_preserves_all_keys() {
    let point = Schema::record("Point", [("x", Schema::Int), ("y", Schema::Int)]);
    let schema = Schema::map(point);
    let value = Value::map([
        ("k1", Value::record([("x", Value::Int(1)), ("y", Value::Int(2))])),
        ("k2", Value::record([("x", Value::Int(3)), ("y", Value::Int(4))])),
    ]);

    let target = TargetType::map(TargetType::record([
        ("x", TargetType::int()),
        ("y", TargetType::int()),
    ]));
    let decoded = roundtrip(&schema, &value, &target);

    let map = decoded.as_map().expect("map");
    assert_eq!(map.len(), 2);
    assert_eq!(
        map.get("k1").and_then(|v| v.as_record()).and_then(|r| r.get("y")),
        Some(&Value::Int(2))
    );
    assert_eq!(decoded, value);
}

#[test]
fn record_value_encodes_under_map_schema() {
    let schema = Schema::map(Schema::Long);
    let value = Value::record([("a", Value::Int(1)), ("b", Value::Int(2))]);

    let decoded = roundtrip(&schema, &value, &TargetType::Any);
    assert_eq!(decoded, Value::map([("a", Value::Int(1)), ("b", Value::Int(2))]));
}

#[test]
fn nested_arrays_roundtrip() {
    let schema = Schema::array(Schema::array(Schema::Double));
    let value = Value::sequence([
        Value::sequence([Value::Float(1.0), Value::Float(2.5)]),
        Value::sequence(Vec::new()),
    ]);

    let target = TargetType::array(TargetType::array(TargetType::float()));
    assert_eq!(roundtrip(&schema, &value, &target), value);
}

#[test]
fn float_widening_is_exact_for_representable_values() {
    let decoded = roundtrip(&Schema::Float, &Value::Float(0.1), &TargetType::float());
    assert_eq!(decoded, Value::Float(f64::from(0.1f32)));
}

#[test]
fn kind_mismatch_fails() {
    assert!(encode(&Schema::Bytes, &Value::from("text")).is_err());
    assert!(encode(&Schema::String, &Value::Bytes(vec![1])).is_err());
    assert!(encode(&Schema::Long, &Value::Float(1.0)).is_err());
    assert!(encode(&Schema::array(Schema::Int), &Value::Int(1)).is_err());
    assert!(encode(&Schema::record("R", [("a", Schema::Int)]), &Value::Int(1)).is_err());
}

#[test]
fn unknown_enum_symbol_is_rejected_on_encode() {
    let schema = Schema::enumeration("Suit", ["HEARTS"]);
    let err = encode(&schema, &Value::from("CLUBS")).expect_err("unknown symbol");
    assert!(err.to_string().contains("CLUBS"));
}

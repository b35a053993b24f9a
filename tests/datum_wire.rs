use avrodyn::{
    from_avro, to_avro, AvroSchema, Codec, CodecError, CodecOptions, DeserializationError, Limits,
    Schema, SchemaKind, SerializationError, SizePolicy, TargetType, Value,
};

const USER_SCHEMA: &str = r#"{
    "type": "record",
    "name": "User",
    "namespace": "com.example",
    "fields": [
        {"name": "id", "type": "long"},
        {"name": "score", "type": "float"},
        {"name": "nick", "type": ["null", "string"]},
        {"name": "role", "type": {"type": "enum", "name": "Role", "symbols": ["ADMIN", "USER"]}},
        {"name": "tags", "type": {"type": "array", "items": "string"}},
        {"name": "limits", "type": {"type": "map", "values": "int"}},
        {"name": "avatar", "type": "bytes"}
    ]
}"#;

fn user() -> Value {
    Value::record([
        ("id", Value::Int(42)),
        ("score", Value::Float(9.5)),
        ("nick", Value::from("ada")),
        ("role", Value::symbol("ADMIN")),
        ("tags", Value::sequence([Value::from("a"), Value::from("b")])),
        ("limits", Value::map([("daily", Value::Int(10))])),
        ("avatar", Value::Bytes(vec![0xde, 0xad])),
    ])
}

#[test]
fn record_roundtrips_through_wire_bytes() {
    let schema = AvroSchema::parse_str(USER_SCHEMA).expect("schema");
    let bytes = to_avro(&schema, &user()).expect("to_avro");
    let decoded = from_avro(&schema, &bytes, &TargetType::Any).expect("from_avro");
    assert_eq!(decoded, user());
}

#[test]
fn nullable_string_wire_layout() {
    let schema = AvroSchema::parse_str(r#"["null", "string"]"#).expect("schema");

    let bytes = to_avro(&schema, &Value::from("hello")).expect("encode");
    assert_eq!(bytes, vec![0x02, 0x0a, b'h', b'e', b'l', b'l', b'o']);

    let bytes = to_avro(&schema, &Value::Null).expect("encode");
    assert_eq!(bytes, vec![0x00]);
    assert_eq!(
        from_avro(&schema, &bytes, &TargetType::Any).expect("decode"),
        Value::Null
    );
}

#[test]
fn top_level_null_uses_single_zero_byte() {
    let schema = AvroSchema::parse_str(r#""null""#).expect("schema");
    assert_eq!(to_avro(&schema, &Value::Null).expect("encode"), vec![0x00]);

    assert_eq!(from_avro(&schema, &[0x00], &TargetType::Any).expect("sentinel"), Value::Null);
    assert_eq!(from_avro(&schema, &[], &TargetType::Any).expect("empty"), Value::Null);

    assert!(matches!(
        from_avro(&schema, &[0x00, 0x00], &TargetType::Any),
        Err(DeserializationError::TrailingBytes { remaining: 1 })
    ));
    assert!(to_avro(&schema, &Value::Int(0)).is_err());
}

#[test]
fn top_level_null_rejects_other_leading_byte() {
    let schema = AvroSchema::parse_str(r#""null""#).expect("schema");

    for bytes in [&[0x01][..], &[0x02, 0x00][..]] {
        let err = from_avro(&schema, bytes, &TargetType::Any).expect_err("not a sentinel");
        match err {
            DeserializationError::Codec(CodecError::SchemaMismatch { expected, found, .. }) => {
                assert_eq!(expected, SchemaKind::Null);
                assert!(found.starts_with("sentinel byte 0x0"), "{found}");
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }
}

const EVENT_SCHEMA: &str = r#"{
    "type": "record",
    "name": "Event",
    "fields": [
        {"name": "day", "type": {"type": "int", "logicalType": "date"}},
        {"name": "at", "type": {"type": "long", "logicalType": "timestamp-millis"}},
        {"name": "at_ns", "type": {"type": "long", "logicalType": "timestamp-nanos"}},
        {"name": "id", "type": {"type": "string", "logicalType": "uuid"}},
        {"name": "seen", "type": {"type": "array", "items": {"type": "long", "logicalType": "timestamp-micros"}}},
        {"name": "ref", "type": ["null", {"type": "string", "logicalType": "uuid"}]}
    ]
}"#;

#[test]
fn logical_types_round_trip_as_primitives() {
    let schema = AvroSchema::parse_str(EVENT_SCHEMA).expect("schema");
    let fields = schema.model().fields().expect("record");
    assert_eq!(fields[0].schema, Schema::Int);
    assert_eq!(fields[1].schema, Schema::Long);
    assert_eq!(fields[2].schema, Schema::Long);
    assert_eq!(fields[3].schema, Schema::String);

    let value = Value::record([
        ("day", Value::Int(19_700)),
        ("at", Value::Int(1_700_000_000_123)),
        ("at_ns", Value::Int(1_700_000_000_123_456_789)),
        ("id", Value::from("67e55044-10b1-426f-9247-bb680e5fe0c8")),
        ("seen", Value::sequence([Value::Int(1), Value::Int(2_000_000)])),
        ("ref", Value::from("a8098c1a-f86e-11da-bd1a-00112444be1e")),
    ]);

    let bytes = to_avro(&schema, &value).expect("encode");
    let back = from_avro(&schema, &bytes, &TargetType::Any).expect("decode");
    assert_eq!(back, value);
}

#[test]
fn malformed_uuid_is_rejected_with_path() {
    let schema = AvroSchema::parse_str(EVENT_SCHEMA).expect("schema");
    let value = Value::record([
        ("day", Value::Int(1)),
        ("at", Value::Int(2)),
        ("at_ns", Value::Int(3)),
        ("id", Value::from("67e55044-10b1-426f-9247-bb680e5fe0c8")),
        ("seen", Value::sequence(Vec::new())),
        ("ref", Value::from("not-a-uuid")),
    ]);

    let err = to_avro(&schema, &value).expect_err("malformed uuid");
    match err {
        SerializationError::Codec(err @ CodecError::SchemaMismatch { .. }) => {
            assert_eq!(err.path().to_string(), "$.ref<1>");
        }
        other => panic!("expected schema mismatch, got {other:?}"),
    }
}

#[test]
fn top_level_fixed_bypasses_wire_codec() {
    let schema = AvroSchema::parse_str(r#"{"type": "fixed", "name": "Hash", "size": 4}"#).expect("schema");

    let bytes = to_avro(&schema, &Value::Bytes(vec![1, 2, 3, 4])).expect("encode");
    assert_eq!(bytes, vec![1, 2, 3, 4]);

    let decoded = from_avro(&schema, &bytes, &TargetType::bytes()).expect("decode");
    assert_eq!(decoded, Value::Bytes(vec![1, 2, 3, 4]));
}

#[test]
fn fixed_length_mismatch_is_rejected_by_default() {
    let schema = AvroSchema::parse_str(r#"{"type": "fixed", "name": "Hash", "size": 4}"#).expect("schema");

    let err = to_avro(&schema, &Value::Bytes(vec![1, 2, 3])).expect_err("strict");
    assert!(matches!(
        err,
        SerializationError::Codec(CodecError::FixedSize { expected: 4, actual: 3, .. })
    ));

    let err = from_avro(&schema, &[1, 2, 3, 4, 5], &TargetType::Any).expect_err("strict");
    assert!(matches!(
        err,
        DeserializationError::Codec(CodecError::FixedSize { expected: 4, actual: 5, .. })
    ));
}

#[test]
fn fixed_length_mismatch_passes_through_when_lenient() {
    let schema = AvroSchema::parse_str(r#"{"type": "fixed", "name": "Hash", "size": 4}"#).expect("schema");
    let codec = Codec::new(CodecOptions::default().with_fixed_size(SizePolicy::Lenient));

    let bytes = codec.to_avro(&schema, &Value::Bytes(vec![1, 2, 3])).expect("lenient");
    assert_eq!(bytes, vec![1, 2, 3]);

    let decoded = codec
        .from_avro(&schema, &[9, 9, 9, 9, 9], &TargetType::Any)
        .expect("lenient");
    assert_eq!(decoded, Value::Bytes(vec![9, 9, 9, 9, 9]));
}

#[test]
fn trailing_bytes_are_rejected() {
    let schema = AvroSchema::parse_str(r#""long""#).expect("schema");
    let mut bytes = to_avro(&schema, &Value::Int(1)).expect("encode");
    assert_eq!(bytes, vec![0x02]);
    bytes.push(0xff);

    assert!(matches!(
        from_avro(&schema, &bytes, &TargetType::Any),
        Err(DeserializationError::TrailingBytes { remaining: 1 })
    ));
}

#[test]
fn truncated_datum_is_a_wire_error() {
    let schema = AvroSchema::parse_str(r#""string""#).expect("schema");
    assert!(matches!(
        from_avro(&schema, &[0x0a, b'h'], &TargetType::Any),
        Err(DeserializationError::Wire(_))
    ));
}

#[test]
fn oversized_buffer_is_rejected_before_decoding() {
    let schema = AvroSchema::parse_str(r#""bytes""#).expect("schema");
    let limits = Limits {
        max_buffer_size: 4,
        ..Limits::default()
    };
    let codec = Codec::new(CodecOptions::default().with_limits(limits));

    let err = codec
        .from_avro(&schema, &[0x08, 1, 2, 3, 4], &TargetType::Any)
        .expect_err("too large");
    assert!(matches!(
        err,
        DeserializationError::BufferTooLarge { size: 5, limit: 4 }
    ));
}

#[test]
fn readonly_target_freezes_decoded_datum() {
    let schema = AvroSchema::parse_str(USER_SCHEMA).expect("schema");
    let bytes = to_avro(&schema, &user()).expect("encode");

    let decoded = from_avro(&schema, &bytes, &TargetType::readonly(TargetType::Any)).expect("decode");
    assert!(decoded.is_frozen());
}

#[test]
fn fingerprint_ignores_namespace_and_name() {
    let a = AvroSchema::parse_str(USER_SCHEMA).expect("schema");
    let b = AvroSchema::parse_str(&USER_SCHEMA.replace("\"User\"", "\"Account\"")).expect("schema");
    assert_eq!(a.fingerprint(), b.fingerprint());
}

// Copyright 2026 HIL Test Platform Team

//! Schema and data frames round-trip through encode/decode unchanged, with
//! no broker or network dependency. These are the broker-independent
//! scenario tests the wire format promises: what a subscriber decodes is
//! exactly what a publisher encoded.

use hiltest_codec::{decode_data, decode_schema, encode_data, encode_schema};
use hiltest_core::{DataType, SourceId, StreamData, StreamField, StreamSchema, Value};
use proptest::prelude::*;

fn sample_schema() -> StreamSchema {
    StreamSchema::new(
        SourceId::from("dmm-1"),
        vec![StreamField::new("voltage", DataType::F32, "V"), StreamField::new("current", DataType::F32, "A")],
    )
}

#[test]
fn schema_round_trips() {
    let schema = sample_schema();
    let bytes = encode_schema(&schema).unwrap();
    let decoded = decode_schema(&bytes).unwrap();
    assert_eq!(schema, decoded);
}

#[test]
fn data_round_trips() {
    let schema = sample_schema();
    let data = StreamData {
        schema_id: schema.schema_id(),
        base_timestamp_ns: 1_000_000_000,
        period_ns: 1_000_000,
        samples: vec![vec![Value::F32(5.0), Value::F32(0.5)], vec![Value::F32(5.1), Value::F32(0.6)]],
    };
    let bytes = encode_data(&data, &schema).unwrap();
    let decoded = decode_data(&bytes, &schema).unwrap();
    assert_eq!(decoded, data);
    assert_eq!(decoded.timestamp_at(1), 1_001_000_000);
}

#[test]
fn schema_then_data_round_trips_together() {
    let schema = sample_schema();
    let schema_bytes = encode_schema(&schema).unwrap();
    let data = StreamData {
        schema_id: schema.schema_id(),
        base_timestamp_ns: 0,
        period_ns: 500_000,
        samples: vec![vec![Value::F32(1.0), Value::F32(2.0)]],
    };
    let data_bytes = encode_data(&data, &schema).unwrap();

    let decoded_schema = decode_schema(&schema_bytes).unwrap();
    let decoded_data = decode_data(&data_bytes, &decoded_schema).unwrap();
    assert_eq!(decoded_data, data);
}

proptest! {
    /// Property: any sample batch encodes and decodes back to itself under
    /// a fixed two-field schema, regardless of timestamp, period, or
    /// sample count.
    #[test]
    fn prop_data_round_trips(
        base_timestamp_ns in any::<u64>(),
        period_ns in any::<u64>(),
        samples in prop::collection::vec((-1e6f32..1e6f32, -1e6f32..1e6f32), 0..16),
    ) {
        let schema = sample_schema();
        let data = StreamData {
            schema_id: schema.schema_id(),
            base_timestamp_ns,
            period_ns,
            samples: samples.into_iter().map(|(v, c)| vec![Value::F32(v), Value::F32(c)]).collect(),
        };
        let bytes = encode_data(&data, &schema).unwrap();
        let decoded = decode_data(&bytes, &schema).unwrap();
        prop_assert_eq!(decoded, data);
    }
}

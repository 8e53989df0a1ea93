// Copyright 2026 HIL Test Platform Team

//! Data frame (message type `0x02`) encode/decode.
//!
//! Wire layout: `u8 msg_type | u32 schema_id | u64 base_timestamp_ns |
//! u64 period_ns | u16 sample_count | sample*` where each sample packs
//! one value per schema field, in field order, using that field's
//! `DataType` wire size, big-endian.

use bytes::{Buf, BufMut, BytesMut};
use hiltest_core::{DataType, StreamData, StreamSchema, Value};

use crate::error::{Error, Result};

/// Wire message type byte for a data frame.
pub const MSG_TYPE_DATA: u8 = 0x02;

fn put_value(buf: &mut BytesMut, dtype: DataType, value: Value) -> Result<()> {
    match (dtype, value) {
        (DataType::I8, Value::I8(v)) => buf.put_i8(v),
        (DataType::I16, Value::I16(v)) => buf.put_i16(v),
        (DataType::I32, Value::I32(v)) => buf.put_i32(v),
        (DataType::I64, Value::I64(v)) => buf.put_i64(v),
        (DataType::U8, Value::U8(v)) => buf.put_u8(v),
        (DataType::U16, Value::U16(v)) => buf.put_u16(v),
        (DataType::U32, Value::U32(v)) => buf.put_u32(v),
        (DataType::U64, Value::U64(v)) => buf.put_u64(v),
        (DataType::F32, Value::F32(v)) => buf.put_f32(v),
        (DataType::F64, Value::F64(v)) => buf.put_f64(v),
        _ => return Err(Error::ValueTypeMismatch),
    }
    Ok(())
}

fn get_value(buf: &mut impl Buf, dtype: DataType) -> Result<Value> {
    if buf.remaining() < dtype.size() {
        return Err(Error::Truncated { needed: dtype.size() - buf.remaining() });
    }
    Ok(match dtype {
        DataType::I8 => Value::I8(buf.get_i8()),
        DataType::I16 => Value::I16(buf.get_i16()),
        DataType::I32 => Value::I32(buf.get_i32()),
        DataType::I64 => Value::I64(buf.get_i64()),
        DataType::U8 => Value::U8(buf.get_u8()),
        DataType::U16 => Value::U16(buf.get_u16()),
        DataType::U32 => Value::U32(buf.get_u32()),
        DataType::U64 => Value::U64(buf.get_u64()),
        DataType::F32 => Value::F32(buf.get_f32()),
        DataType::F64 => Value::F64(buf.get_f64()),
    })
}

/// Encode `data` against `schema`, which must have the same `schema_id`.
pub fn encode_data(data: &StreamData, schema: &StreamSchema) -> Result<Vec<u8>> {
    if schema.schema_id() != data.schema_id {
        return Err(Error::SchemaMismatch { data: data.schema_id, schema: schema.schema_id() });
    }
    if schema.fields().is_empty() {
        return Err(Error::EmptySchema);
    }

    let mut buf = BytesMut::new();
    buf.put_u8(MSG_TYPE_DATA);
    buf.put_u32(data.schema_id);
    buf.put_u64(data.base_timestamp_ns);
    buf.put_u64(data.period_ns);
    buf.put_u16(data.samples.len() as u16);

    for sample in &data.samples {
        if sample.len() != schema.fields().len() {
            return Err(Error::SampleArity { actual: sample.len(), expected: schema.fields().len() });
        }
        for (value, field) in sample.iter().zip(schema.fields()) {
            put_value(&mut buf, field.data_type, *value)?;
        }
    }

    Ok(buf.to_vec())
}

/// Decode a data frame against `schema`.
pub fn decode_data(bytes: &[u8], schema: &StreamSchema) -> Result<StreamData> {
    let mut buf = bytes;

    if !buf.has_remaining() {
        return Err(Error::Truncated { needed: 1 });
    }
    let msg_type = buf.get_u8();
    if msg_type != MSG_TYPE_DATA {
        return Err(Error::InvalidMessageType { expected: MSG_TYPE_DATA, actual: msg_type });
    }

    if buf.remaining() < 4 {
        return Err(Error::Truncated { needed: 4 - buf.remaining() });
    }
    let schema_id = buf.get_u32();
    if schema_id != schema.schema_id() {
        return Err(Error::SchemaMismatch { data: schema_id, schema: schema.schema_id() });
    }

    if buf.remaining() < 16 {
        return Err(Error::Truncated { needed: 16 - buf.remaining() });
    }
    let base_timestamp_ns = buf.get_u64();
    let period_ns = buf.get_u64();

    if buf.remaining() < 2 {
        return Err(Error::Truncated { needed: 2 - buf.remaining() });
    }
    let sample_count = buf.get_u16();

    let mut samples = Vec::with_capacity(sample_count as usize);
    for _ in 0..sample_count {
        let mut row = Vec::with_capacity(schema.fields().len());
        for field in schema.fields() {
            row.push(get_value(&mut buf, field.data_type)?);
        }
        samples.push(row);
    }

    if buf.has_remaining() {
        return Err(Error::TrailingBytes { extra: buf.remaining() });
    }

    Ok(StreamData { schema_id, base_timestamp_ns, period_ns, samples })
}

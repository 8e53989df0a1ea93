// Copyright 2026 HIL Test Platform Team

//! Schema frame (message type `0x01`) encode/decode.
//!
//! Wire layout: `u8 msg_type | u32 schema_id | string source_id |
//! u16 field_count | field*` where each field is
//! `string name | u8 data_type_code | string unit`.

use bytes::{Buf, BufMut, BytesMut};
use hiltest_core::{DataType, SourceId, StreamField, StreamSchema};

use crate::error::{Error, Result};
use crate::strings::{get_string, put_string};

/// Wire message type byte for a schema frame.
pub const MSG_TYPE_SCHEMA: u8 = 0x01;

/// Encode `schema` as a schema frame.
pub fn encode_schema(schema: &StreamSchema) -> Result<Vec<u8>> {
    let mut buf = BytesMut::new();
    buf.put_u8(MSG_TYPE_SCHEMA);
    buf.put_u32(schema.schema_id());
    put_string(&mut buf, schema.source_id().as_str())?;
    buf.put_u16(schema.fields().len() as u16);
    for field in schema.fields() {
        put_string(&mut buf, &field.name)?;
        buf.put_u8(field.data_type.code());
        put_string(&mut buf, &field.unit)?;
    }
    Ok(buf.to_vec())
}

/// Decode a schema frame, validating that the declared `schema_id`
/// matches the CRC-32 recomputed from the decoded fields.
pub fn decode_schema(data: &[u8]) -> Result<StreamSchema> {
    let mut buf = data;

    if !buf.has_remaining() {
        return Err(Error::Truncated { needed: 1 });
    }
    let msg_type = buf.get_u8();
    if msg_type != MSG_TYPE_SCHEMA {
        return Err(Error::InvalidMessageType { expected: MSG_TYPE_SCHEMA, actual: msg_type });
    }

    if buf.remaining() < 4 {
        return Err(Error::Truncated { needed: 4 - buf.remaining() });
    }
    let expected_schema_id = buf.get_u32();

    let source_id = get_string(&mut buf)?;

    if buf.remaining() < 2 {
        return Err(Error::Truncated { needed: 2 - buf.remaining() });
    }
    let field_count = buf.get_u16();

    let mut fields = Vec::with_capacity(field_count as usize);
    for _ in 0..field_count {
        let name = get_string(&mut buf)?;
        if !buf.has_remaining() {
            return Err(Error::Truncated { needed: 1 });
        }
        let code = buf.get_u8();
        let data_type = DataType::from_code(code).ok_or(Error::UnknownDataType(code))?;
        let unit = get_string(&mut buf)?;
        fields.push(StreamField::new(name, data_type, unit));
    }

    let schema = StreamSchema::new(SourceId::from(source_id), fields);
    if schema.schema_id() != expected_schema_id {
        return Err(Error::SchemaIdMismatch { computed: schema.schema_id(), expected: expected_schema_id });
    }

    Ok(schema)
}

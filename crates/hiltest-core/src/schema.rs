// Copyright 2026 HIL Test Platform Team

//! Stream schema types: the self-describing structure a data source
//! publishes once so that any number of subscribers can decode its
//! samples without out-of-band configuration.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::data_type::DataType;
use crate::ids::SourceId;

/// Definition of a single field within a stream schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamField {
    /// Field name, unique within its schema.
    pub name: String,
    /// Wire type of the field's values.
    pub data_type: DataType,
    /// Engineering unit label (e.g. `"V"`, `"degC"`), empty if unitless.
    pub unit: String,
}

impl StreamField {
    /// Construct a new field.
    pub fn new(name: impl Into<String>, data_type: DataType, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type,
            unit: unit.into(),
        }
    }

    /// Bytes used as input to the schema's CRC-32, in field-definition
    /// order: name, then type code, then unit. This is the exact triple
    /// the wire format's schema id is computed over.
    pub(crate) fn crc_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.name.len() + 1 + self.unit.len());
        buf.extend_from_slice(self.name.as_bytes());
        buf.push(self.data_type.code());
        buf.extend_from_slice(self.unit.as_bytes());
        buf
    }
}

/// The structure of a data stream: an ordered list of typed fields plus
/// the source that emits them.
///
/// `schema_id` is not stored as part of `Eq`/`Hash`-relevant identity by
/// hand; it is a pure function of `source_id` and `fields`, computed once
/// at construction, exactly as the wire format requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSchema {
    source_id: SourceId,
    fields: Vec<StreamField>,
    schema_id: u32,
}

impl StreamSchema {
    /// Build a schema from its source and ordered fields, computing the
    /// CRC-32 schema id deterministically from their `(name, type, unit)`
    /// triples.
    pub fn new(source_id: SourceId, fields: Vec<StreamField>) -> Self {
        let schema_id = compute_schema_id(&fields);
        Self {
            source_id,
            fields,
            schema_id,
        }
    }

    /// The source that publishes this schema.
    pub fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    /// The schema's ordered fields.
    pub fn fields(&self) -> &[StreamField] {
        &self.fields
    }

    /// The deterministic CRC-32 identity of this schema.
    pub fn schema_id(&self) -> u32 {
        self.schema_id
    }

    /// Total byte size of one sample (the sum of all field sizes).
    pub fn sample_size(&self) -> usize {
        self.fields.iter().map(|f| f.data_type.size()).sum()
    }

    /// Byte offset of a named field within one sample, or `None` if the
    /// field does not exist.
    pub fn byte_offset_of(&self, field_name: &str) -> Option<usize> {
        let mut offset = 0;
        for f in &self.fields {
            if f.name == field_name {
                return Some(offset);
            }
            offset += f.data_type.size();
        }
        None
    }

    /// Look up a field by name.
    pub fn get_field(&self, field_name: &str) -> Option<&StreamField> {
        self.fields.iter().find(|f| f.name == field_name)
    }

    /// Recompute the CRC-32 over `fields` and compare against the id
    /// carried in this instance. Used by the codec to validate schema
    /// frames received off the wire.
    pub fn verify_id(&self) -> bool {
        compute_schema_id(&self.fields) == self.schema_id
    }
}

fn compute_schema_id(fields: &[StreamField]) -> u32 {
    let mut hasher = Hasher::new();
    for field in fields {
        hasher.update(&field.crc_bytes());
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> StreamSchema {
        StreamSchema::new(
            SourceId::from("dmm-1"),
            vec![
                StreamField::new("voltage", DataType::F32, "V"),
                StreamField::new("current", DataType::F32, "A"),
            ],
        )
    }

    #[test]
    fn schema_id_is_deterministic() {
        let a = sample_schema();
        let b = sample_schema();
        assert_eq!(a.schema_id(), b.schema_id());
    }

    #[test]
    fn schema_id_changes_with_field_order() {
        let a = sample_schema();
        let b = StreamSchema::new(
            SourceId::from("dmm-1"),
            vec![
                StreamField::new("current", DataType::F32, "A"),
                StreamField::new("voltage", DataType::F32, "V"),
            ],
        );
        assert_ne!(a.schema_id(), b.schema_id());
    }

    #[test]
    fn sample_size_sums_field_sizes() {
        let schema = sample_schema();
        assert_eq!(schema.sample_size(), 8);
    }

    #[test]
    fn byte_offset_accounts_for_preceding_fields() {
        let schema = sample_schema();
        assert_eq!(schema.byte_offset_of("voltage"), Some(0));
        assert_eq!(schema.byte_offset_of("current"), Some(4));
        assert_eq!(schema.byte_offset_of("missing"), None);
    }

    #[test]
    fn verify_id_detects_tampering() {
        let mut schema = sample_schema();
        assert!(schema.verify_id());
        schema.schema_id = schema.schema_id.wrapping_add(1);
        assert!(!schema.verify_id());
    }
}

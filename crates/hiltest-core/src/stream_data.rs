// Copyright 2026 HIL Test Platform Team

//! A batch of time-series samples tied to a schema.

use serde::{Deserialize, Serialize};

/// A single decoded measurement value, tagged by its wire data type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Signed 8-bit integer value.
    I8(i8),
    /// Signed 16-bit integer value.
    I16(i16),
    /// Signed 32-bit integer value.
    I32(i32),
    /// Signed 64-bit integer value.
    I64(i64),
    /// Unsigned 8-bit integer value.
    U8(u8),
    /// Unsigned 16-bit integer value.
    U16(u16),
    /// Unsigned 32-bit integer value.
    U32(u32),
    /// Unsigned 64-bit integer value.
    U64(u64),
    /// 32-bit float value.
    F32(f32),
    /// 64-bit float value.
    F64(f64),
}

impl Value {
    /// Widen this value to `f64` for threshold evaluation, which always
    /// compares in floating point regardless of the channel's wire type.
    pub fn as_f64(self) -> f64 {
        match self {
            Value::I8(v) => v as f64,
            Value::I16(v) => v as f64,
            Value::I32(v) => v as f64,
            Value::I64(v) => v as f64,
            Value::U8(v) => v as f64,
            Value::U16(v) => v as f64,
            Value::U32(v) => v as f64,
            Value::U64(v) => v as f64,
            Value::F32(v) => v as f64,
            Value::F64(v) => v,
        }
    }
}

/// A batch of time-series samples, one row of values per sampling
/// instant, spaced `period_ns` apart starting at `base_timestamp_ns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamData {
    /// The schema this data's samples conform to.
    pub schema_id: u32,
    /// Unix nanosecond timestamp of the first sample.
    pub base_timestamp_ns: u64,
    /// Nanoseconds between consecutive samples.
    pub period_ns: u64,
    /// Decoded rows, each with one value per schema field, in field order.
    pub samples: Vec<Vec<Value>>,
}

impl StreamData {
    /// Number of sample rows in this batch.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Unix nanosecond timestamp of the sample at `index`.
    pub fn timestamp_at(&self, index: usize) -> u64 {
        self.base_timestamp_ns + (index as u64) * self.period_ns
    }

    /// Iterate over the timestamps of all samples in order.
    pub fn timestamps(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.samples.len()).map(|i| self.timestamp_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_at_advances_by_period() {
        let data = StreamData {
            schema_id: 0,
            base_timestamp_ns: 1_000_000_000,
            period_ns: 1_000_000,
            samples: vec![vec![Value::F32(1.0)]; 5],
        };
        assert_eq!(data.timestamp_at(0), 1_000_000_000);
        assert_eq!(data.timestamp_at(2), 1_002_000_000);
        assert_eq!(data.timestamps().count(), 5);
    }

    #[test]
    fn as_f64_widens_every_variant() {
        assert_eq!(Value::I8(-1).as_f64(), -1.0);
        assert_eq!(Value::U64(10).as_f64(), 10.0);
        assert_eq!(Value::F32(1.5).as_f64(), 1.5);
    }
}

// Copyright 2026 HIL Test Platform Team

//! The fixed, closed set of numeric primitive types the wire protocol can
//! carry. Byte codes and sizes are part of the wire format and must never
//! change for an already-assigned variant.

use serde::{Deserialize, Serialize};

/// A numeric primitive type used in a stream schema field.
///
/// Byte codes `0x01..=0x0A` are the wire representation (see §4.1 of the
/// wire format) and are stable forever; adding a new variant must use the
/// next unused code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DataType {
    /// Signed 8-bit integer.
    I8 = 0x01,
    /// Signed 16-bit integer.
    I16 = 0x02,
    /// Signed 32-bit integer.
    I32 = 0x03,
    /// Signed 64-bit integer.
    I64 = 0x04,
    /// Unsigned 8-bit integer.
    U8 = 0x05,
    /// Unsigned 16-bit integer.
    U16 = 0x06,
    /// Unsigned 32-bit integer.
    U32 = 0x07,
    /// Unsigned 64-bit integer.
    U64 = 0x08,
    /// IEEE-754 single precision float.
    F32 = 0x09,
    /// IEEE-754 double precision float.
    F64 = 0x0A,
}

impl DataType {
    /// Decode a wire byte code into a `DataType`, or `None` if the code is
    /// not one of the ten assigned values.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0x01 => Self::I8,
            0x02 => Self::I16,
            0x03 => Self::I32,
            0x04 => Self::I64,
            0x05 => Self::U8,
            0x06 => Self::U16,
            0x07 => Self::U32,
            0x08 => Self::U64,
            0x09 => Self::F32,
            0x0A => Self::F64,
            _ => return None,
        })
    }

    /// The wire byte code for this type.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Size in bytes of one value of this type on the wire.
    pub fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    /// True for signed integer variants.
    pub fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// True for unsigned integer variants.
    pub fn is_unsigned(self) -> bool {
        matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }

    /// True for floating point variants.
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_all_codes() {
        for code in 0x01u8..=0x0A {
            let dt = DataType::from_code(code).expect("assigned code");
            assert_eq!(dt.code(), code);
        }
    }

    #[test]
    fn unassigned_code_is_none() {
        assert!(DataType::from_code(0x00).is_none());
        assert!(DataType::from_code(0x0B).is_none());
    }

    #[test]
    fn sizes_match_wire_format() {
        assert_eq!(DataType::I8.size(), 1);
        assert_eq!(DataType::U16.size(), 2);
        assert_eq!(DataType::I32.size(), 4);
        assert_eq!(DataType::F32.size(), 4);
        assert_eq!(DataType::U64.size(), 8);
        assert_eq!(DataType::F64.size(), 8);
    }

    #[test]
    fn classification_is_exhaustive_and_exclusive() {
        for code in 0x01u8..=0x0A {
            let dt = DataType::from_code(code).unwrap();
            let flags = [dt.is_signed(), dt.is_unsigned(), dt.is_float()];
            assert_eq!(flags.iter().filter(|b| **b).count(), 1);
        }
    }
}

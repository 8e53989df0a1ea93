// Copyright 2026 HIL Test Platform Team

//! Length-prefixed UTF-8 string encoding shared by every frame type:
//! a single length byte (max 255) followed by that many bytes of UTF-8.

use bytes::{Buf, BufMut};

use crate::error::{Error, Result};

/// Append `s` to `buf` as a length-prefixed string.
pub fn put_string(buf: &mut impl BufMut, s: &str) -> Result<()> {
    let bytes = s.as_bytes();
    if bytes.len() > 255 {
        return Err(Error::StringTooLong(bytes.len()));
    }
    buf.put_u8(bytes.len() as u8);
    buf.put_slice(bytes);
    Ok(())
}

/// Read a length-prefixed string from `buf`, advancing it past the string.
pub fn get_string(buf: &mut impl Buf) -> Result<String> {
    if !buf.has_remaining() {
        return Err(Error::Truncated { needed: 1 });
    }
    let len = buf.get_u8() as usize;
    if buf.remaining() < len {
        return Err(Error::Truncated { needed: len - buf.remaining() });
    }
    let mut raw = vec![0u8; len];
    buf.copy_to_slice(&mut raw);
    String::from_utf8(raw).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn round_trips_ascii() {
        let mut buf = BytesMut::new();
        put_string(&mut buf, "voltage").unwrap();
        let mut reader = buf.freeze();
        assert_eq!(get_string(&mut reader).unwrap(), "voltage");
    }

    #[test]
    fn round_trips_empty_string() {
        let mut buf = BytesMut::new();
        put_string(&mut buf, "").unwrap();
        let mut reader = buf.freeze();
        assert_eq!(get_string(&mut reader).unwrap(), "");
    }

    #[test]
    fn rejects_string_over_255_bytes() {
        let mut buf = BytesMut::new();
        let long = "a".repeat(256);
        assert!(matches!(put_string(&mut buf, &long), Err(Error::StringTooLong(256))));
    }

    #[test]
    fn truncated_buffer_errors() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&[5u8, b'a', b'b']);
        let mut reader = buf.freeze();
        assert!(matches!(get_string(&mut reader), Err(Error::Truncated { .. })));
    }
}

//! # VarInt Codec
//!
//! Compact unsigned integers and length-prefixed byte strings, plus the
//! cursor every decoder in the workspace reads through.
//!
//! ```text
//! value < 0xfd          -> [value]
//! value <= 0xffff       -> [0xfd, u16 LE]
//! value <= 0xffff_ffff  -> [0xfe, u32 LE]
//! otherwise             -> [0xff, u64 LE]
//! ```

use crate::errors::{CodecError, CodecResult};

/// Tag announcing a 2-byte value.
pub const VARINT_TAG_U16: u8 = 0xfd;
/// Tag announcing a 4-byte value.
pub const VARINT_TAG_U32: u8 = 0xfe;
/// Tag announcing an 8-byte value.
pub const VARINT_TAG_U64: u8 = 0xff;

/// Encode `value` using the smallest tag that covers it.
pub fn encode_var_int(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    put_var_int(&mut out, value);
    out
}

/// Append the varint encoding of `value` to `buf`.
pub fn put_var_int(buf: &mut Vec<u8>, value: u64) {
    if value < u64::from(VARINT_TAG_U16) {
        buf.push(value as u8);
    } else if value <= u64::from(u16::MAX) {
        buf.push(VARINT_TAG_U16);
        buf.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= u64::from(u32::MAX) {
        buf.push(VARINT_TAG_U32);
        buf.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        buf.push(VARINT_TAG_U64);
        buf.extend_from_slice(&value.to_le_bytes());
    }
}

/// Encode a byte string with a varint length prefix.
pub fn encode_var_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 9);
    put_var_bytes(&mut out, data);
    out
}

/// Append a varint length prefix followed by `data`.
pub fn put_var_bytes(buf: &mut Vec<u8>, data: &[u8]) {
    put_var_int(buf, data.len() as u64);
    buf.extend_from_slice(data);
}

/// Decode a varint from the front of `bytes`.
pub fn decode_var_int(bytes: &[u8]) -> CodecResult<u64> {
    ByteReader::new(bytes).read_var_int()
}

/// Decode a length-prefixed byte string from the front of `bytes`.
pub fn decode_var_bytes(bytes: &[u8]) -> CodecResult<Vec<u8>> {
    ByteReader::new(bytes).read_var_bytes()
}

/// Forward-only cursor over a borrowed buffer.
///
/// Every read either consumes exactly the bytes it needs or fails with
/// [`CodecError::TruncatedInput`] and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail with [`CodecError::TrailingBytes`] unless every byte was consumed.
    pub fn finish(&self) -> CodecResult<()> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(CodecError::TrailingBytes { remaining }),
        }
    }

    pub fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(CodecError::TruncatedInput {
                needed: len,
                remaining,
            });
        }
        let start = self.position;
        self.position += len;
        Ok(&self.bytes[start..self.position])
    }

    pub fn read_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> CodecResult<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_u32_le(&mut self) -> CodecResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_i32_le(&mut self) -> CodecResult<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_u64_le(&mut self) -> CodecResult<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    pub fn read_i64_le(&mut self) -> CodecResult<i64> {
        self.read_array().map(i64::from_le_bytes)
    }

    pub fn read_var_int(&mut self) -> CodecResult<u64> {
        let checkpoint = self.position;
        let result = match self.read_u8()? {
            VARINT_TAG_U16 => self.read_u16_le().map(u64::from),
            VARINT_TAG_U32 => self.read_u32_le().map(u64::from),
            VARINT_TAG_U64 => self.read_u64_le(),
            small => Ok(u64::from(small)),
        };
        if result.is_err() {
            self.position = checkpoint;
        }
        result
    }

    /// Read a varint used as a count or length, checked against the bytes
    /// left so a forged prefix cannot trigger a huge allocation.
    pub fn read_length(&mut self) -> CodecResult<usize> {
        let checkpoint = self.position;
        let length = self.read_var_int()?;
        let checked = usize::try_from(length)
            .map_err(|_| CodecError::LengthOverflow { length })
            .and_then(|len| {
                let remaining = self.remaining();
                if len > remaining {
                    Err(CodecError::TruncatedInput {
                        needed: len,
                        remaining,
                    })
                } else {
                    Ok(len)
                }
            });
        if checked.is_err() {
            self.position = checkpoint;
        }
        checked
    }

    pub fn read_var_bytes(&mut self) -> CodecResult<Vec<u8>> {
        let len = self.read_length()?;
        self.read_bytes(len).map(<[u8]>::to_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_var_int_boundaries() {
        assert_eq!(encode_var_int(0), vec![0x00]);
        assert_eq!(encode_var_int(252), vec![0xfc]);
        assert_eq!(encode_var_int(253), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(encode_var_int(0xffff), vec![0xfd, 0xff, 0xff]);
        assert_eq!(encode_var_int(65536), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(
            encode_var_int(0x1_0000_0000),
            vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_decode_var_int_truncated() {
        assert_eq!(
            decode_var_int(&[]),
            Err(CodecError::TruncatedInput {
                needed: 1,
                remaining: 0
            })
        );
        assert_eq!(
            decode_var_int(&[0xfe, 0x01, 0x02]),
            Err(CodecError::TruncatedInput {
                needed: 4,
                remaining: 2
            })
        );
    }

    #[test]
    fn test_failed_read_does_not_consume() {
        let bytes = [0xfd, 0x01];
        let mut reader = ByteReader::new(&bytes);
        assert!(reader.read_var_int().is_err());
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u8(), Ok(0xfd));
    }

    #[test]
    fn test_var_bytes() {
        let encoded = encode_var_bytes(b"abc");
        assert_eq!(encoded, vec![3, b'a', b'b', b'c']);
        assert_eq!(decode_var_bytes(&encoded), Ok(b"abc".to_vec()));
        assert_eq!(decode_var_bytes(&[0x00]), Ok(Vec::new()));
    }

    #[test]
    fn test_var_bytes_length_beyond_input() {
        let err = decode_var_bytes(&[0x05, 1, 2]).unwrap_err();
        assert_eq!(
            err,
            CodecError::TruncatedInput {
                needed: 5,
                remaining: 2
            }
        );
    }

    #[test]
    fn test_finish_reports_trailing_bytes() {
        let bytes = [1u8, 2, 3];
        let mut reader = ByteReader::new(&bytes);
        reader.read_u8().unwrap();
        assert_eq!(
            reader.finish(),
            Err(CodecError::TrailingBytes { remaining: 2 })
        );
    }

    proptest! {
        #[test]
        fn prop_var_int_decodes_what_it_encodes(value in any::<u64>()) {
            let encoded = encode_var_int(value);
            let mut reader = ByteReader::new(&encoded);
            prop_assert_eq!(reader.read_var_int(), Ok(value));
            prop_assert!(reader.is_empty());
        }

        #[test]
        fn prop_var_int_is_minimal(value in any::<u64>()) {
            let expected_len = match value {
                0..=0xfc => 1,
                0xfd..=0xffff => 3,
                0x1_0000..=0xffff_ffff => 5,
                _ => 9,
            };
            prop_assert_eq!(encode_var_int(value).len(), expected_len);
        }
    }
}

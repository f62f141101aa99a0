//! Variable-length quantities, used for every delta-time and for meta event lengths. Each byte
//! carries seven bits of the value, most significant group first. Every byte except the last has
//! its high bit set.

use crate::cursor::{ByteCursor, ByteResult};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// 0x7f, 127: The largest 7 bit number.
const MAX_7BIT: u8 = 0b0111_1111;

/// 0x80, 128: The highest bit is set, this bit indicates that another byte follows.
pub(crate) const CONTINUE: u8 = 0b1000_0000;

/// A `u32` never needs more than five 7-bit groups.
pub const MAX_VLQ_BYTES: usize = 5;

#[derive(Debug, PartialEq)]
pub enum VlqError {
    /// The last byte still had its continue bit set.
    IncompleteNumber,
    Overflow,
}

impl Display for VlqError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl Error for VlqError {}

/// Encode `ticks` as a variable-length quantity. Zero encodes as a single `0x00`.
pub fn encode_tick_delta(mut ticks: u32) -> Vec<u8> {
    if ticks == 0 {
        return vec![0];
    }

    let mut result = Vec::with_capacity(MAX_VLQ_BYTES);
    while ticks > 0 {
        let mut v = (ticks & MAX_7BIT as u32) as u8;
        // the groups are collected least-significant first, so every group pushed after the first
        // one ends up before it and needs the continue bit
        if !result.is_empty() {
            v |= CONTINUE;
        }
        result.push(v);
        ticks >>= 7;
    }
    result.reverse();
    result
}

/// Read a variable-length quantity from `cursor`, see [`ByteCursor::read_vlq`].
pub fn decode_tick_delta(cursor: &mut ByteCursor<'_>) -> ByteResult<u32> {
    cursor.read_vlq()
}

/// Decode exactly one variable-length quantity occupying all of `bytes`.
pub(crate) fn decode_slice(bytes: &[u8]) -> std::result::Result<u32, VlqError> {
    let mut result: u32 = 0;

    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            if (result.rotate_left(7)) & 0x7F > 0 {
                return Err(VlqError::Overflow);
            }
            result <<= 7;
        }
        result |= (b & MAX_7BIT) as u32;

        if i == bytes.len() - 1 && b & CONTINUE != 0 {
            return Err(VlqError::IncompleteNumber);
        }
    }

    if bytes.is_empty() {
        return Err(VlqError::IncompleteNumber);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test(vlq_bytes: &[u8], value: u32) {
        let encoded = encode_tick_delta(value);
        assert_eq!(vlq_bytes, encoded.as_slice());
        let mut cursor = ByteCursor::new(&encoded);
        assert_eq!(value, decode_tick_delta(&mut cursor).unwrap());
        assert!(cursor.is_end());
    }

    #[test]
    fn one_byte() {
        test(&[0x00], 0);
        test(&[0x40], 0x40);
        test(&[0x7f], 127);
    }

    #[test]
    fn two_bytes() {
        test(&[0x81, 0x00], 128);
        test(&[0xce, 0x10], 10_000);
        test(&[0xff, 0x7f], 0x3fff);
    }

    #[test]
    fn three_bytes() {
        test(&[0x81, 0x80, 0x00], 0x4000);
        test(&[0xbd, 0x84, 0x40], 1_000_000);
        test(&[0xff, 0xff, 0x7f], 0x1f_ffff);
    }

    #[test]
    fn four_bytes() {
        test(&[0x81, 0x80, 0x80, 0x00], 0x20_0000);
        test(&[0xff, 0xff, 0xff, 0x7f], 0x0fff_ffff);
    }

    #[test]
    fn five_bytes() {
        test(&[0x81, 0x80, 0x80, 0x80, 0x00], 0x1000_0000);
        test(&[0x8f, 0xff, 0xff, 0xff, 0x7f], 0xffff_ffff);
    }

    #[test]
    fn sampled_range() {
        let mut t = 0u32;
        while t < 1 << 28 {
            let encoded = encode_tick_delta(t);
            assert_eq!(Ok(t), decode_slice(&encoded));
            t = t * 3 + 1;
        }
    }

    #[test]
    fn incomplete_0x80() {
        assert_eq!(Err(VlqError::IncompleteNumber), decode_slice(&[0x80]));
    }

    #[test]
    fn empty_slice() {
        assert_eq!(Err(VlqError::IncompleteNumber), decode_slice(&[]));
    }

    #[test]
    fn overflow_u32() {
        assert_eq!(
            Err(VlqError::Overflow),
            decode_slice(&[0xff, 0xff, 0xff, 0xff, 0x7f])
        );
    }
}

use crate::vlq::{decode_slice, CONTINUE, MAX_VLQ_BYTES};
use log::trace;
use snafu::{ensure, OptionExt, Snafu};

/// A forward-only reader over a borrowed byte buffer. All parsing in this crate is built on it.
///
/// ```text
///       peek_u8(0)
///       v
/// 0x00, 0x01, 0x02, 0x03
///       ^ position
/// ```
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

/// Errors produced by [`ByteCursor`] reads.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ByteError {
    /// A read was attempted at or past the end of the buffer.
    #[snafu(display("unexpected end reached around byte {}", position))]
    OutOfBounds { position: usize },

    /// A variable-length quantity did not terminate in time or overflowed.
    #[snafu(display("malformed vlq around byte {}", position))]
    MalformedVlq { position: usize },
}

/// The Result type for [`ByteCursor`] reads.
pub type ByteResult<T> = std::result::Result<T, ByteError>;

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Read a single byte and advance.
    pub fn read_u8(&mut self) -> ByteResult<u8> {
        let value = self.peek_u8(0)?;
        trace!("read {:#04x} at position {}", value, self.position);
        self.position += 1;
        Ok(value)
    }

    /// Read the byte `lookahead` places after the current position without advancing.
    pub fn peek_u8(&self, lookahead: usize) -> ByteResult<u8> {
        let position = self.position + lookahead;
        self.bytes
            .get(position)
            .copied()
            .context(OutOfBoundsSnafu { position })
    }

    pub fn read_u16(&mut self) -> ByteResult<u16> {
        let bytes = self.read_array::<2>()?;
        Ok(u16::from_be_bytes(bytes))
    }

    /// Read a big-endian `u32` and advance by 4.
    pub fn read_u32(&mut self) -> ByteResult<u32> {
        let bytes = self.read_array::<4>()?;
        Ok(u32::from_be_bytes(bytes))
    }

    /// Read `num_bytes` bytes. Nothing is consumed if fewer than `num_bytes` remain.
    pub fn read_n(&mut self, num_bytes: usize) -> ByteResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(num_bytes)
            .filter(|end| *end <= self.bytes.len())
            .context(OutOfBoundsSnafu {
                position: self.bytes.len(),
            })?;
        let slice = &self.bytes[self.position..end];
        self.position = end;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> ByteResult<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_n(N)?);
        Ok(array)
    }

    /// Read a variable-length quantity. Gives up with [`ByteError::MalformedVlq`] if no byte with
    /// a clear high bit is found within [`MAX_VLQ_BYTES`] bytes.
    pub fn read_vlq(&mut self) -> ByteResult<u32> {
        let start = self.position;
        let mut current_byte = CONTINUE;
        let mut byte_count = 0usize;
        while current_byte & CONTINUE == CONTINUE {
            ensure!(
                byte_count < MAX_VLQ_BYTES,
                MalformedVlqSnafu {
                    position: self.position
                }
            );
            current_byte = self.read_u8()?;
            byte_count += 1;
        }
        let bytes = &self.bytes[start..self.position];
        let decoded = decode_slice(bytes)
            .ok()
            .context(MalformedVlqSnafu { position: start })?;
        trace!("decoded vlq value {} from {} bytes", decoded, bytes.len());
        Ok(decoded)
    }

    /// Un-consume the last `n` bytes. Saturates at the start of the buffer.
    pub fn step_back(&mut self, n: usize) {
        self.position = self.position.saturating_sub(n);
    }

    pub fn reset(&mut self) {
        self.position = 0
    }

    /// The offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns `true` when every byte has been read.
    pub fn is_end(&self) -> bool {
        self.position >= self.bytes.len()
    }

    /// The bytes that have not been read yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.position.min(self.bytes.len())..]
    }
}

/// Returns the index of the first occurrence of `needle` in `haystack` at or after `from`.
pub(crate) fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|ix| ix + from)
}

/// Reads a tag from an arbitrary position. Used for the header check, where a short buffer is
/// reported as a bad header rather than as a bounds error.
pub(crate) fn tag_at(bytes: &[u8], position: usize, expected: &[u8]) -> bool {
    bytes
        .get(position..position + expected.len())
        .map(|found| found == expected)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_peek() {
        let bytes = [0x00u8, 0x01, 0x02, 0x03, 0x04, 0x10, 0x20, 0x30, 0x40];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(0x00, cursor.peek_u8(0).unwrap());
        assert_eq!(0x02, cursor.peek_u8(2).unwrap());
        assert_eq!(0, cursor.position());
        assert_eq!(0x00, cursor.read_u8().unwrap());
        assert_eq!(0x0102, cursor.read_u16().unwrap());
        assert_eq!(3, cursor.position());
        assert_eq!(0x0304_1020, cursor.read_u32().unwrap());
        assert_eq!(&[0x30, 0x40], cursor.read_n(2).unwrap());
        assert!(cursor.is_end());
        assert!(matches!(
            cursor.read_u8(),
            Err(ByteError::OutOfBounds { position: 9 })
        ));
    }

    #[test]
    fn short_read_does_not_advance() {
        let bytes = [0x00u8, 0x00, 0x25];
        let mut cursor = ByteCursor::new(&bytes);
        assert!(cursor.read_u32().is_err());
        assert_eq!(0, cursor.position());
        assert_eq!(3, cursor.remaining().len());
    }

    #[test]
    fn step_back_and_reset() {
        let bytes = [0x0au8, 0x0b, 0x0c];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.read_n(3).unwrap();
        cursor.step_back(1);
        assert_eq!(2, cursor.position());
        assert_eq!(0x0c, cursor.read_u8().unwrap());
        cursor.step_back(10);
        assert_eq!(0, cursor.position());
        cursor.read_u8().unwrap();
        cursor.reset();
        assert_eq!(0, cursor.position());
    }

    #[test]
    fn vlq_read() {
        let bytes = [189u8, 132, 64, 0x7f];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(1_000_000, cursor.read_vlq().unwrap());
        assert_eq!(3, cursor.position());
        assert_eq!(0x7f, cursor.read_vlq().unwrap());
    }

    #[test]
    fn vlq_runaway() {
        let bytes = [0xffu8; 12];
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            cursor.read_vlq(),
            Err(ByteError::MalformedVlq { .. })
        ));
    }

    #[test]
    fn vlq_overflow() {
        let bytes = [0xffu8, 0xff, 0xff, 0xff, 0x7f];
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            cursor.read_vlq(),
            Err(ByteError::MalformedVlq { position: 0 })
        ));
    }

    #[test]
    fn vlq_truncated() {
        let bytes = [0x81u8, 0x80];
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            cursor.read_vlq(),
            Err(ByteError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn find_test() {
        let hay = b"xxMTrkyyMTrk";
        assert_eq!(Some(2), find(hay, b"MTrk", 0));
        assert_eq!(Some(8), find(hay, b"MTrk", 3));
        assert_eq!(None, find(hay, b"MTrk", 9));
        assert_eq!(None, find(hay, b"MTrk", 100));
    }

    #[test]
    fn tag_at_test() {
        let bytes = b"MThd\x00\x00\x00\x06";
        assert!(tag_at(bytes, 0, b"MThd"));
        assert!(tag_at(bytes, 4, &[0, 0, 0, 6]));
        assert!(!tag_at(bytes, 6, &[0, 0, 0, 6]));
    }
}

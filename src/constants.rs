/// `MThd`: the tag that opens every Standard MIDI File.
pub(crate) const HEADER_CHUNK_ID: &[u8; 4] = b"MThd";

/// The header chunk length is always 6, and is checked as a literal.
pub(crate) const HEADER_CHUNK_SIZE: [u8; 4] = [0x00, 0x00, 0x00, 0x06];

/// `MThd` + length + format + ntracks + division.
pub(crate) const HEADER_LEN: usize = 14;

/// `MTrk`: the tag that opens every track chunk.
pub(crate) const TRACK_CHUNK_ID: &[u8; 4] = b"MTrk";

/// `00 FF 2F 00`: a zero delta-time followed by the End of Track meta event. Appended to every
/// non-empty track when it is written.
pub(crate) const END_OF_TRACK_BYTES: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// `0xFF`: File Spec: All meta-events begin with FF, then have an event type byte (which is always
/// less than 128)
pub(crate) const FILE_META_EVENT: u8 = 0b1111_1111;

/// To extract the channel number from a status byte. The right most four bits of a status byte
/// represent the channel number.
pub(crate) const STATUS_CHANNEL_MASK: u8 = 0b0000_1111;

/// Message type mask. The left most four bits of a status byte represent the message type.
pub(crate) const STATUS_TYPE_MASK: u8 = 0b1111_0000;

/// Ticks per beat used by [`crate::MidiFile::new`].
pub(crate) const DEFAULT_TICKS_PER_BEAT: u16 = 128;

/// The division word's high bit selects SMPTE timing, so metrical ticks top out at `0x7FFF`.
pub(crate) const MAX_TICKS_PER_BEAT: u32 = 32767;

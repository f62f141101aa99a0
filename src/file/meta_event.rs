use crate::constants::FILE_META_EVENT;
use crate::cursor::{ByteCursor, ByteResult};
use crate::error::{LibResult, UnspecifiedEventTypeSnafu};
use crate::vlq::encode_tick_delta;
use crate::Text;
use log::trace;
use snafu::{OptionExt, ResultExt};
use std::io::Write;

/// Meta events carry non-MIDI information useful to the file format or to sequencers: tempo, track
/// names, the end of a track and so on. On the wire a meta event is
///
/// `FF <type> <len> <data>`
///
/// where `len` is a variable-length quantity giving the number of data bytes that follow.
///
/// The type is held as a raw byte so that unknown types survive a round trip. The associated
/// constants name the well-known ones.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct MetaEvent {
    meta_type: Option<u8>,
    data: MetaData,
}

/// The payload of a [`MetaEvent`]. Every form is written as a length followed by bytes.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum MetaData {
    /// No payload, written as a zero length.
    None,
    /// A single byte payload.
    Number(u8),
    Bytes(Vec<u8>),
    Text(Text),
}

impl Default for MetaData {
    fn default() -> Self {
        MetaData::None
    }
}

impl From<u8> for MetaData {
    fn from(value: u8) -> Self {
        MetaData::Number(value)
    }
}

impl From<Vec<u8>> for MetaData {
    fn from(value: Vec<u8>) -> Self {
        MetaData::Bytes(value)
    }
}

impl From<&[u8]> for MetaData {
    fn from(value: &[u8]) -> Self {
        MetaData::Bytes(value.to_vec())
    }
}

impl From<Text> for MetaData {
    fn from(value: Text) -> Self {
        MetaData::Text(value)
    }
}

impl From<&str> for MetaData {
    fn from(value: &str) -> Self {
        MetaData::Text(value.into())
    }
}

impl From<String> for MetaData {
    fn from(value: String) -> Self {
        MetaData::Text(value.into())
    }
}

impl MetaData {
    /// The payload bytes, without the length prefix.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MetaData::None => &[],
            MetaData::Number(n) => std::slice::from_ref(n),
            MetaData::Bytes(b) => b.as_slice(),
            MetaData::Text(t) => t.as_bytes(),
        }
    }
}

impl MetaEvent {
    /// `FF 00 02 ssss`: sequence number. A zero type counts as unset, so events of this type are
    /// read but cannot be written.
    pub const SEQUENCE: u8 = 0x00;
    /// `FF 01 len text`: any amount of text describing anything.
    pub const TEXT: u8 = 0x01;
    /// `FF 02 len text`: a copyright notice.
    pub const COPYRIGHT: u8 = 0x02;
    /// `FF 03 len text`: the name of the sequence or track.
    pub const TRACK_NAME: u8 = 0x03;
    /// `FF 04 len text`: the instrumentation for the track.
    pub const INSTRUMENT: u8 = 0x04;
    /// `FF 05 len text`: a lyric, usually one syllable.
    pub const LYRIC: u8 = 0x05;
    /// `FF 06 len text`: a rehearsal letter or section name.
    pub const MARKER: u8 = 0x06;
    /// `FF 07 len text`: something happening on stage or screen.
    pub const CUE_POINT: u8 = 0x07;
    /// `FF 20 01 cc`: MIDI channel prefix.
    pub const CHANNEL_PREFIX: u8 = 0x20;
    /// `FF 2F 00`: end of track. Written automatically for every non-empty track.
    pub const END_OF_TRACK: u8 = 0x2F;
    /// `FF 51 03 tttttt`: set tempo, in microseconds per quarter note.
    pub const TEMPO: u8 = 0x51;
    /// `FF 54 05 hr mn se fr ff`: SMPTE offset.
    pub const SMPTE: u8 = 0x54;
    /// `FF 58 04 nn dd cc bb`: time signature.
    pub const TIME_SIG: u8 = 0x58;
    /// `FF 59 02 sf mi`: key signature.
    pub const KEY_SIG: u8 = 0x59;
    /// `FF 7F len data`: sequencer specific.
    pub const SEQ_EVENT: u8 = 0x7F;

    /// Create a meta event of the given type.
    pub fn new<D: Into<MetaData>>(meta_type: u8, data: D) -> Self {
        Self {
            meta_type: Some(meta_type),
            data: data.into(),
        }
    }

    /// Create a meta event without a type. It cannot be written until
    /// [`MetaEvent::set_meta_type`] is called with a non-zero type.
    pub fn untyped<D: Into<MetaData>>(data: D) -> Self {
        Self {
            meta_type: None,
            data: data.into(),
        }
    }

    pub fn meta_type(&self) -> Option<u8> {
        self.meta_type
    }

    pub fn set_meta_type(&mut self, meta_type: u8) {
        self.meta_type = Some(meta_type)
    }

    pub fn data(&self) -> &MetaData {
        &self.data
    }

    pub fn set_data<D: Into<MetaData>>(&mut self, data: D) {
        self.data = data.into()
    }

    /// Returns `true` for the end of track marker.
    pub fn is_end_of_track(&self) -> bool {
        self.meta_type == Some(Self::END_OF_TRACK)
    }

    /// Parses a meta event. The `FF` status byte has already been consumed.
    pub(crate) fn parse(cursor: &mut ByteCursor<'_>) -> ByteResult<Self> {
        let meta_type = cursor.read_u8()?;
        let length = cursor.read_vlq()? as usize;
        let bytes = cursor.read_n(length)?;
        trace!("meta event {:#04x} with {} bytes", meta_type, length);
        let data = match meta_type {
            0x01..=0x0f => MetaData::Text(Text::from(bytes)),
            _ => MetaData::Bytes(bytes.to_vec()),
        };
        Ok(Self {
            meta_type: Some(meta_type),
            data,
        })
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        let meta_type = self
            .meta_type
            .filter(|&meta_type| meta_type != 0)
            .context(UnspecifiedEventTypeSnafu { site: site!() })?;
        write_u8!(w, FILE_META_EVENT)?;
        write_u8!(w, meta_type)?;
        let payload = self.data.as_bytes();
        // lengths that do not fit a u32 cannot be expressed in a track chunk anyway
        let length = encode_tick_delta(payload.len() as u32);
        w.write_all(&length).context(wr!())?;
        w.write_all(payload).context(wr!())?;
        Ok(())
    }
}

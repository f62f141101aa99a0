use crate::constants::{HEADER_CHUNK_ID, HEADER_CHUNK_SIZE, HEADER_LEN};
use crate::cursor::{tag_at, ByteCursor};
use crate::error::LibResult;
use log::debug;
use snafu::ResultExt;
use std::io::Write;

/// The header chunk, `MThd`, as it appears at the start of the file. It is rebuilt from the
/// [`crate::MidiFile`] on every write, so it is not exposed.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub(crate) struct Header {
    format: Format,
    ntracks: u16,
    ticks: u16,
}

impl Header {
    pub(crate) fn new(format: Format, ntracks: u16, ticks: u16) -> Self {
        Self {
            format,
            ntracks,
            ticks,
        }
    }

    /// The format word. Advisory when reading.
    pub(crate) fn format(&self) -> Format {
        self.format
    }

    /// The declared number of track chunks. Advisory when reading.
    pub(crate) fn ntracks(&self) -> u16 {
        self.ntracks
    }

    /// The raw division word.
    pub(crate) fn ticks(&self) -> u16 {
        self.ticks
    }

    /// Validates the `MThd` tag and the header length literal, then reads the three header words.
    pub(crate) fn parse(bytes: &[u8]) -> LibResult<Self> {
        if !tag_at(bytes, 0, HEADER_CHUNK_ID) {
            invalid_header!("expected 'MThd' at byte 0");
        }
        if !tag_at(bytes, 4, &HEADER_CHUNK_SIZE) {
            invalid_header!("expected header length 6 at byte 4");
        }
        if bytes.len() < HEADER_LEN {
            invalid_header!("header is {} bytes, expected {}", bytes.len(), HEADER_LEN);
        }
        let mut cursor = ByteCursor::new(&bytes[8..HEADER_LEN]);
        let format_word = cursor.read_u16().context(io!())?;
        let ntracks = cursor.read_u16().context(io!())?;
        let ticks = cursor.read_u16().context(io!())?;
        debug!(
            "header: format {}, {} tracks, {} ticks per beat",
            format_word, ntracks, ticks
        );
        Ok(Self {
            format: Format::from_u16(format_word),
            ntracks,
            ticks,
        })
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        w.write_all(HEADER_CHUNK_ID).context(wr!())?;
        w.write_all(&HEADER_CHUNK_SIZE).context(wr!())?;
        w.write_all(&self.format.to_u16().to_be_bytes())
            .context(wr!())?;
        w.write_all(&self.ntracks.to_be_bytes()).context(wr!())?;
        w.write_all(&self.ticks.to_be_bytes()).context(wr!())?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum Format {
    /// 0 the file contains a single multi-channel track
    Single,
    /// 1 the file contains one or more simultaneous tracks (or MIDI outputs) of a sequence
    Multi,
    /// 2 the file contains one or more sequentially independent single-track patterns. Only ever
    /// read, never chosen when writing.
    Sequential,
    /// Anything else found in a header. The format word is advisory so this is not an error.
    Other(u16),
}

impl Default for Format {
    fn default() -> Self {
        Format::Single
    }
}

impl Format {
    /// Type 1 when more than one track writes a chunk, otherwise type 0.
    pub fn for_track_count(non_empty_tracks: usize) -> Self {
        if non_empty_tracks > 1 {
            Format::Multi
        } else {
            Format::Single
        }
    }

    pub(crate) fn from_u16(value: u16) -> Self {
        match value {
            0 => Format::Single,
            1 => Format::Multi,
            2 => Format::Sequential,
            other => Format::Other(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            Format::Single => 0,
            Format::Multi => 1,
            Format::Sequential => 2,
            Format::Other(value) => value,
        }
    }
}

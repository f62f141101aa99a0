/*!
Build and parse Standard MIDI Files in memory.

A [`MidiFile`] owns its [`Track`]s and each track owns its events. Serialization produces the
exact bytes of an SMF; parsing is lenient: a damaged event ends its track instead of failing the
whole file, and tracks are found by scanning for their `MTrk` tag rather than trusting the header's
track count.

Only metrical time is supported. A header whose division word is zero or has its high bit set
(SMPTE timing) is rejected with [`ErrorKind::InvalidTicksPerBeat`], the same rule
[`MidiFile::set_ticks`] applies. Apart from that and a malformed header, parsing does not fail.

Running status and SysEx events are not supported.
!*/

#[macro_use]
mod error;
#[macro_use]
mod macros;

mod constants;
pub mod core;
pub mod cursor;
pub mod file;
mod text;
pub mod vlq;

use crate::constants::{
    DEFAULT_TICKS_PER_BEAT, END_OF_TRACK_BYTES, HEADER_LEN, MAX_TICKS_PER_BEAT, TRACK_CHUNK_ID,
};
use crate::cursor::{find, ByteCursor};
use crate::error::{InvalidTicksPerBeatSnafu, LibResult, TooManyTracksSnafu};
pub use crate::core::{ChannelEvent, StatusType};
pub use error::{Error, ErrorKind, Result};
use crate::file::Header;
pub use file::{Event, Format, MetaData, MetaEvent, Track, TrackEvent};
use log::{debug, trace, warn};
use snafu::{ensure, ResultExt};
use std::convert::TryFrom;
use std::io::{Read, Write};
pub use text::Text;

// https://www.music.mcgill.ca/~gary/306/week9/smf.html

/// A Standard MIDI File: ticks per beat and an ordered list of tracks.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct MidiFile {
    ticks: u16,
    tracks: Vec<Track>,
}

impl Default for MidiFile {
    fn default() -> Self {
        Self {
            ticks: DEFAULT_TICKS_PER_BEAT,
            tracks: Vec::new(),
        }
    }
}

impl MidiFile {
    /// An empty file with 128 ticks per beat.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty file with the given ticks per beat, which must be in `1..=32767`.
    pub fn with_ticks(ticks: u32) -> Result<Self> {
        Ok(Self {
            ticks: check_ticks(ticks)?,
            tracks: Vec::new(),
        })
    }

    /// Ticks per beat (per quarter note).
    pub fn ticks(&self) -> u16 {
        self.ticks
    }

    /// Set ticks per beat. Values outside `1..=32767` are rejected and the current value is kept.
    pub fn set_ticks(&mut self, ticks: u32) -> Result<()> {
        self.ticks = check_ticks(ticks)?;
        Ok(())
    }

    /// Add a track to the end and return a reference to it.
    pub fn add_track(&mut self, track: Track) -> &mut Track {
        self.tracks.push(track);
        let ix = self.tracks.len() - 1;
        &mut self.tracks[ix]
    }

    pub fn tracks_len(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    /// The header format this file will be written with: [`Format::Multi`] if more than one track
    /// writes a chunk, otherwise [`Format::Single`]. Tracks holding only ignored events write no
    /// chunk and do not count.
    pub fn format(&self) -> Format {
        Format::for_track_count(self.tracks().filter(|t| t.writes_chunk()).count())
    }

    /// Serializes the header and every track. Empty tracks are counted in the header but produce no
    /// chunk.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_inner(&mut bytes)?;
        Ok(bytes)
    }

    /// Writes the serialized file to `w`.
    pub fn write<W: Write>(&self, mut w: W) -> Result<()> {
        let bytes = self.to_bytes()?;
        w.write_all(&bytes).context(wr!())?;
        w.flush().context(wr!())?;
        Ok(())
    }

    fn write_inner<W: Write>(&self, w: &mut W) -> LibResult<()> {
        let ntracks =
            u16::try_from(self.tracks.len()).context(TooManyTracksSnafu { site: site!() })?;
        let header = Header::new(self.format(), ntracks, self.ticks);
        trace!("writing {:?}", header);
        header.write(w)?;
        for track in self.tracks() {
            track.write(w)?;
        }
        Ok(())
    }

    /// Parses a file. The header must begin with `MThd` and the length literal `00 00 00 06`, and
    /// its division must be a ticks per beat value in `1..=32767`; SMPTE and zero divisions fail
    /// with [`ErrorKind::InvalidTicksPerBeat`]. Tracks are discovered by scanning for `MTrk` tags;
    /// tracks without events are discarded.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::parse(bytes)?)
    }

    /// Reads every byte from `r`, then parses them, see [`MidiFile::from_bytes`].
    pub fn read<R: Read>(mut r: R) -> Result<Self> {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)
            .context(error::IoSnafu { site: site!() })?;
        Self::from_bytes(&bytes)
    }

    fn parse(bytes: &[u8]) -> LibResult<Self> {
        trace!("parsing header chunk");
        let header = Header::parse(bytes)?;
        debug!(
            "{:?} file declaring {} tracks",
            header.format(),
            header.ntracks()
        );
        let ticks = check_ticks(u32::from(header.ticks()))?;
        let mut tracks = Vec::new();
        let mut position = HEADER_LEN;
        while let Some(tag) = find(bytes, TRACK_CHUNK_ID, position) {
            let start = tag + TRACK_CHUNK_ID.len();
            let (chunk, next) = track_chunk(bytes, start);
            debug!("track chunk at byte {}, {} bytes", tag, chunk.len());
            let track = Track::from_bytes(chunk);
            if track.is_empty() {
                debug!("discarding empty track at byte {}", tag);
            } else {
                tracks.push(track);
            }
            position = next;
        }
        if tracks.len() != usize::from(header.ntracks()) {
            debug!(
                "header declares {} tracks, found {} with events",
                header.ntracks(),
                tracks.len()
            );
        }
        Ok(Self { ticks, tracks })
    }
}

/// Slices a track chunk starting at its length field. The chunk's own length decides where it ends.
/// When that length runs past the buffer, the chunk ends at the first end of track marker instead,
/// or at the end of the buffer. Returns the slice and the position to resume scanning from.
fn track_chunk(bytes: &[u8], start: usize) -> (&[u8], usize) {
    let declared = ByteCursor::new(&bytes[start..])
        .read_u32()
        .ok()
        .and_then(|length| usize::try_from(length).ok())
        .and_then(|length| length.checked_add(start + 4));
    match declared {
        Some(end) if end <= bytes.len() => (&bytes[start..end], end),
        _ => {
            warn!(
                "track chunk at byte {} runs past the end of the data",
                start
            );
            match find(bytes, &END_OF_TRACK_BYTES, start + 4) {
                Some(marker) => {
                    let end = marker + END_OF_TRACK_BYTES.len();
                    (&bytes[start..end], end)
                }
                None => (&bytes[start..], bytes.len()),
            }
        }
    }
}

fn check_ticks(ticks: u32) -> LibResult<u16> {
    ensure!(
        (1..=MAX_TICKS_PER_BEAT).contains(&ticks),
        InvalidTicksPerBeatSnafu {
            site: site!(),
            ticks
        }
    );
    Ok(ticks as u16)
}

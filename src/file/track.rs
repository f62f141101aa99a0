use crate::constants::{END_OF_TRACK_BYTES, TRACK_CHUNK_ID};
use crate::cursor::ByteCursor;
use crate::error::{LibResult, TrackTooLongSnafu};
use crate::file::{Event, TrackEvent};
use log::{debug, trace, warn};
use snafu::ResultExt;
use std::convert::TryFrom;
use std::io::Write;

/// 2.3 - Track Chunks
/// The track chunks (type MTrk) are where actual song data is stored. Each track chunk is simply a
/// stream of MIDI events (and non-MIDI events), preceded by delta-time values.
///
/// `<Track Chunk> = <chunk type><length><MTrk event>+`
///
/// The end of track event is not held in `events`. It is appended when the track is written and
/// consumed when it is read. A track with no bytes to write produces no chunk at all.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct Track {
    events: Vec<TrackEvent>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the track has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns `true` if the track writes an `MTrk` chunk, i.e. it holds an event that is not
    /// [`Event::Ignored`].
    pub fn writes_chunk(&self) -> bool {
        self.events.iter().any(|event| !event.is_ignored())
    }

    /// The number of events in the track.
    pub fn events_len(&self) -> usize {
        self.events.len()
    }

    /// Iterator over the events in the track, in playback order.
    pub fn events(&self) -> impl Iterator<Item = &TrackEvent> {
        self.events.iter()
    }

    /// Add an event to the end.
    pub fn push_event<E: Into<Event>>(&mut self, delta_time: u32, event: E) -> &mut Self {
        self.events.push(TrackEvent::new(delta_time, event));
        self
    }

    /// Serializes the track as a complete `MTrk` chunk, or as nothing if no event writes any bytes.
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads a track from the bytes that follow the `MTrk` tag: the 4-byte chunk length, then the
    /// events. A length of 4 or less means there are no events before the end marker.
    ///
    /// Reading stops at the end of track event, or at the first event that cannot be read. Ignored
    /// events are dropped.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut cursor = ByteCursor::new(bytes);
        let chunk_length = match cursor.read_u32() {
            Ok(length) => length as usize,
            Err(e) => {
                warn!("track chunk has no length: {}", e);
                return Self::default();
            }
        };
        if chunk_length <= END_OF_TRACK_BYTES.len() {
            debug!("track chunk length {}, no events", chunk_length);
            return Self::default();
        }
        let body = cursor.remaining();
        let body = if body.len() < chunk_length {
            warn!(
                "track chunk declares {} bytes but only {} are present",
                chunk_length,
                body.len()
            );
            body
        } else {
            &body[..chunk_length]
        };
        Self::parse_events(&mut ByteCursor::new(body))
    }

    fn parse_events(cursor: &mut ByteCursor<'_>) -> Self {
        let mut events = Vec::new();
        while let Some(event) = TrackEvent::extract(cursor) {
            trace!("parsed {:?}", event);
            if event.is_end() {
                debug!("end of track event");
                break;
            }
            if !event.is_ignored() {
                events.push(event);
            }
        }
        Self { events }
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        // we need to write out all of the data first so we know its length
        let mut track_data: Vec<u8> = Vec::new();
        for event in self.events() {
            event.write(&mut track_data)?;
        }
        if track_data.is_empty() {
            trace!("no track data, skipping the chunk");
            return Ok(());
        }

        // the end marker is counted in the length, the tag and length are not
        let track_length = u32::try_from(track_data.len() + END_OF_TRACK_BYTES.len())
            .context(TrackTooLongSnafu { site: site!() })?;

        w.write_all(TRACK_CHUNK_ID).context(wr!())?;
        write_u32!(w, track_length)?;
        w.write_all(&track_data).context(wr!())?;
        w.write_all(&END_OF_TRACK_BYTES).context(wr!())?;
        Ok(())
    }
}

use crate::constants::FILE_META_EVENT;
use crate::core::{ChannelEvent, ChannelParse};
use crate::cursor::{ByteCursor, ByteResult};
use crate::error::LibResult;
use crate::file::MetaEvent;
use crate::vlq::encode_tick_delta;
use log::{trace, warn};
use snafu::ResultExt;
use std::io::Write;

/// <event> = <MIDI event> | <meta-event>
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum Event {
    /// <MIDI event> is any MIDI channel-voice message. Running status is not used.
    Midi(ChannelEvent),
    /// <meta-event> specifies non-MIDI information useful to this format or to sequencers.
    Meta(MetaEvent),
    /// Data that should be dropped silently. Writes nothing, not even its delta-time.
    Ignored,
}

impl Default for Event {
    fn default() -> Self {
        Event::Midi(ChannelEvent::default())
    }
}

impl From<ChannelEvent> for Event {
    fn from(value: ChannelEvent) -> Self {
        Event::Midi(value)
    }
}

impl From<MetaEvent> for Event {
    fn from(value: MetaEvent) -> Self {
        Event::Meta(value)
    }
}

impl Event {
    fn parse(cursor: &mut ByteCursor<'_>) -> ByteResult<Self> {
        let status_byte = cursor.read_u8()?;
        if status_byte == FILE_META_EVENT {
            trace!("read {:#x}, a MetaEvent!", status_byte);
            return Ok(Event::Meta(MetaEvent::parse(cursor)?));
        }
        match ChannelEvent::parse(status_byte, cursor)? {
            ChannelParse::Event(event) => Ok(Event::Midi(event)),
            ChannelParse::Ignored => Ok(Event::Ignored),
        }
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        match self {
            Event::Midi(md) => md.write(w),
            Event::Meta(mt) => mt.write(w),
            Event::Ignored => Ok(()),
        }
    }
}

/// <MTrk event> = <delta-time> <event>
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct TrackEvent {
    /// <delta-time> is stored as a variable-length quantity. It represents the amount of time
    /// before the following event. If the first event in a track occurs at the very beginning of a
    /// track, or if two events occur simultaneously, a delta-time of zero is used. Delta-time is
    /// in ticks as specified in the header chunk.
    delta_time: u32,
    event: Event,
}

impl TrackEvent {
    pub fn new<E: Into<Event>>(delta_time: u32, event: E) -> Self {
        Self {
            delta_time,
            event: event.into(),
        }
    }

    /// An event that is dropped when written or parsed.
    pub fn ignored(delta_time: u32) -> Self {
        Self::new(delta_time, Event::Ignored)
    }

    pub fn delta_time(&self) -> u32 {
        self.delta_time
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Returns true if the track event is an end of track meta event.
    pub fn is_end(&self) -> bool {
        matches!(&self.event, Event::Meta(meta) if meta.is_end_of_track())
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self.event, Event::Ignored)
    }

    /// Serializes the delta-time and the event. An ignored event produces no bytes.
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write(&mut bytes)?;
        Ok(bytes)
    }

    /// Reads one event. Bounds and VLQ failures are logged and reported as `None` so the caller
    /// can stop reading the track while keeping what it already has.
    pub(crate) fn extract(cursor: &mut ByteCursor<'_>) -> Option<Self> {
        let start = cursor.position();
        match Self::parse(cursor) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("unable to read an event starting at byte {}: {}", start, e);
                None
            }
        }
    }

    fn parse(cursor: &mut ByteCursor<'_>) -> ByteResult<Self> {
        let delta_time = cursor.read_vlq()?;
        trace!("delta_time {}", delta_time);
        let event = Event::parse(cursor)?;
        Ok(Self { delta_time, event })
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        if self.is_ignored() {
            return Ok(());
        }
        // the event is rendered first so that a failure leaves `w` untouched
        let mut body = Vec::new();
        self.event.write(&mut body)?;
        w.write_all(&encode_tick_delta(self.delta_time))
            .context(wr!())?;
        w.write_all(&body).context(wr!())?;
        Ok(())
    }
}

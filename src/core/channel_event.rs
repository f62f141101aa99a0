use crate::constants::STATUS_CHANNEL_MASK;
use crate::core::StatusType;
use crate::cursor::{ByteCursor, ByteResult};
use crate::error::{InvalidChannelSnafu, LibResult};
use log::{debug, trace};
use snafu::{ensure, ResultExt};
use std::io::Write;

/// The highest MIDI channel number. Channels are numbered from zero.
pub const MAX_CHANNEL: u8 = 15;

/// A performance message addressed to one of the 16 channels: note on/off, aftertouch, control
/// change, program change, channel pressure or pitch bend.
///
/// `param2` is only written for types that take two data bytes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ChannelEvent {
    status: StatusType,
    channel: u8,
    param1: u8,
    param2: u8,
}

/// The outcome of reading the data bytes that follow a channel status byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ChannelParse {
    Event(ChannelEvent),
    /// The bytes were consumed (or rewound) but do not make an event.
    Ignored,
}

impl ChannelEvent {
    /// Create a channel-voice event. Fails if `channel` is above 15. `param2` is stored but not
    /// written for [`StatusType::ProgramChange`] and [`StatusType::ChannelAftertouch`].
    pub fn new(status: StatusType, channel: u8, param1: u8, param2: u8) -> crate::Result<Self> {
        Ok(Self::new_inner(status, channel, param1, param2)?)
    }

    pub(crate) fn new_inner(
        status: StatusType,
        channel: u8,
        param1: u8,
        param2: u8,
    ) -> LibResult<Self> {
        ensure!(
            channel <= MAX_CHANNEL,
            InvalidChannelSnafu {
                site: site!(),
                channel
            }
        );
        Ok(Self {
            status,
            channel,
            param1,
            param2,
        })
    }

    pub fn status(&self) -> StatusType {
        self.status
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// The first data byte, e.g. the note number of a note on.
    pub fn param1(&self) -> u8 {
        self.param1
    }

    /// The second data byte, or `None` for single-parameter types.
    pub fn param2(&self) -> Option<u8> {
        if self.status.param_count() == 2 {
            Some(self.param2)
        } else {
            None
        }
    }

    /// `type | channel`.
    pub fn status_byte(&self) -> u8 {
        self.status as u8 | (self.channel & STATUS_CHANNEL_MASK)
    }

    /// Parses the data bytes after `status_byte`, which has already been consumed.
    ///
    /// Data bytes are zero-padded up to two. If the first data byte is zero the event is treated as
    /// unsupported: the cursor is rewound by one byte and [`ChannelParse::Ignored`] is returned.
    /// An unrecognized type takes no data bytes, so its padded first byte is always zero and the
    /// status byte itself is un-consumed. It is read again as the next delta-time.
    pub(crate) fn parse(status_byte: u8, cursor: &mut ByteCursor<'_>) -> ByteResult<ChannelParse> {
        let status = match StatusType::from_status(status_byte) {
            Some(status) => status,
            None => {
                debug!(
                    "ignoring unsupported status {:#04x} near byte {}",
                    status_byte,
                    cursor.position()
                );
                cursor.step_back(1);
                return Ok(ChannelParse::Ignored);
            }
        };
        let mut data = [0u8; 2];
        for byte in data.iter_mut().take(status.param_count()) {
            *byte = cursor.read_u8()?;
        }
        if data[0] == 0 {
            debug!(
                "first data byte of {:?} is zero near byte {}, ignoring",
                status,
                cursor.position()
            );
            cursor.step_back(1);
            return Ok(ChannelParse::Ignored);
        }
        let channel = status_byte & STATUS_CHANNEL_MASK;
        trace!("{:?} channel {} data {:?}", status, channel, data);
        Ok(ChannelParse::Event(Self {
            status,
            channel,
            param1: data[0],
            param2: data[1],
        }))
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> LibResult<()> {
        write_u8!(w, self.status_byte())?;
        write_u8!(w, self.param1)?;
        if let Some(param2) = self.param2() {
            write_u8!(w, param2)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(event: &ChannelEvent) -> Vec<u8> {
        let mut v = Vec::new();
        event.write(&mut v).unwrap();
        v
    }

    #[test]
    fn note_on_layout() {
        let event = ChannelEvent::new(StatusType::NoteOn, 1, 60, 80).unwrap();
        assert_eq!(vec![0x91, 0x3c, 0x50], bytes(&event));
    }

    #[test]
    fn program_change_omits_param2() {
        let event = ChannelEvent::new(StatusType::ProgramChange, 9, 42, 99).unwrap();
        assert_eq!(None, event.param2());
        assert_eq!(vec![0xc9, 42], bytes(&event));
    }

    #[test]
    fn channel_out_of_bounds() {
        let e = ChannelEvent::new(StatusType::NoteOff, 16, 60, 0).err().unwrap();
        assert_eq!(crate::ErrorKind::InvalidChannel, e.kind());
    }

    #[test]
    fn parse_two_params() {
        let data = [0x3cu8, 0x50, 0x77];
        let mut cursor = ByteCursor::new(&data);
        let parsed = ChannelEvent::parse(0x91, &mut cursor).unwrap();
        let expected = ChannelEvent::new(StatusType::NoteOn, 1, 60, 80).unwrap();
        assert_eq!(ChannelParse::Event(expected), parsed);
        assert_eq!(2, cursor.position());
    }

    #[test]
    fn parse_one_param_pads() {
        let data = [0x7fu8];
        let mut cursor = ByteCursor::new(&data);
        let parsed = ChannelEvent::parse(0xc0, &mut cursor).unwrap();
        match parsed {
            ChannelParse::Event(event) => {
                assert_eq!(StatusType::ProgramChange, event.status());
                assert_eq!(127, event.param1());
                assert_eq!(None, event.param2());
            }
            ChannelParse::Ignored => panic!("expected an event"),
        }
        assert!(cursor.is_end());
    }

    #[test]
    fn parse_zero_first_byte_rewinds() {
        let data = [0x00u8, 0x40, 0x00];
        let mut cursor = ByteCursor::new(&data);
        let parsed = ChannelEvent::parse(0x90, &mut cursor).unwrap();
        assert_eq!(ChannelParse::Ignored, parsed);
        assert_eq!(1, cursor.position());
    }

    #[test]
    fn parse_unknown_status_rewinds_status_byte() {
        let data = [0x71u8, 12, 13];
        let mut cursor = ByteCursor::new(&data);
        let status_byte = cursor.read_u8().unwrap();
        let parsed = ChannelEvent::parse(status_byte, &mut cursor).unwrap();
        assert_eq!(ChannelParse::Ignored, parsed);
        assert_eq!(0, cursor.position());
        assert_eq!(0x71, cursor.read_vlq().unwrap());
    }

    #[test]
    fn parse_truncated() {
        let data = [0x3cu8];
        let mut cursor = ByteCursor::new(&data);
        assert!(ChannelEvent::parse(0x80, &mut cursor).is_err());
    }
}

use crate::constants::STATUS_TYPE_MASK;
use crate::error::{LibResult, UnknownStatusSnafu};
use std::convert::TryFrom;

/// The seven channel-voice message types, as the high nibble of a status byte. The low nibble
/// holds the channel.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum StatusType {
    /// `0x80`: a `Note Off` message.
    NoteOff = 0x80,

    /// `0x90`: a `Note On (a velocity of 0 = Note Off)` message.
    NoteOn = 0x90,

    /// `0xA0`: a `Polyphonic key pressure/Aftertouch` message.
    AfterTouch = 0xA0,

    /// `0xB0`: a `Control change` message or a `Channel Mode` message.
    Controller = 0xB0,

    /// `0xC0`: a `Program change` message.
    ProgramChange = 0xC0,

    /// `0xD0`: a `Channel pressure/After touch` message.
    ChannelAftertouch = 0xD0,

    /// `0xE0`: a `Pitch bend change` message.
    PitchBend = 0xE0,
}

impl Default for StatusType {
    fn default() -> Self {
        StatusType::NoteOn
    }
}

impl StatusType {
    /// Looks up the type from a status byte, ignoring the channel nibble. Returns `None` for
    /// anything that is not a channel-voice message.
    pub fn from_status(status: u8) -> Option<Self> {
        match status & STATUS_TYPE_MASK {
            0x80 => Some(StatusType::NoteOff),
            0x90 => Some(StatusType::NoteOn),
            0xA0 => Some(StatusType::AfterTouch),
            0xB0 => Some(StatusType::Controller),
            0xC0 => Some(StatusType::ProgramChange),
            0xD0 => Some(StatusType::ChannelAftertouch),
            0xE0 => Some(StatusType::PitchBend),
            _ => None,
        }
    }

    pub(crate) fn from_u8(value: u8) -> LibResult<Self> {
        match Self::from_status(value) {
            Some(st) if st as u8 == value => Ok(st),
            _ => UnknownStatusSnafu {
                site: site!(),
                status: value,
            }
            .fail(),
        }
    }

    /// The number of data bytes that follow the status byte.
    pub fn param_count(&self) -> usize {
        match self {
            StatusType::ProgramChange | StatusType::ChannelAftertouch => 1,
            _ => 2,
        }
    }
}

impl TryFrom<u8> for StatusType {
    type Error = crate::Error;

    fn try_from(value: u8) -> crate::Result<Self> {
        Ok(StatusType::from_u8(value)?)
    }
}

#[test]
fn status_type_test() {
    assert_eq!(Some(StatusType::NoteOn), StatusType::from_status(0x91));
    assert_eq!(Some(StatusType::PitchBend), StatusType::from_status(0xEF));
    assert_eq!(None, StatusType::from_status(0x71));
    assert_eq!(None, StatusType::from_status(0xF0));
    assert_eq!(1, StatusType::ProgramChange.param_count());
    assert_eq!(1, StatusType::ChannelAftertouch.param_count());
    assert_eq!(2, StatusType::Controller.param_count());
    assert_eq!(StatusType::AfterTouch, StatusType::try_from(0xA0).unwrap());
    assert!(StatusType::try_from(0xA3).is_err());
}

/*!
The `core` module is for types and concepts that are *not* strictly related to MIDI *files*.
Channel-voice messages look the same on the wire and in a track chunk.
!*/

mod channel_event;
mod status_type;

pub(crate) use channel_event::ChannelParse;
pub use channel_event::{ChannelEvent, MAX_CHANNEL};
pub use status_type::StatusType;

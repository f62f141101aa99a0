//! The `file` module is for types and concepts strictly related to MIDI *files*.
//! These are separated from types and concepts that are also used in realtime MIDI (`core`).

mod event;
mod header;
mod meta_event;
mod track;

pub use event::{Event, TrackEvent};
pub use header::Format;
pub(crate) use header::Header;
pub use meta_event::{MetaData, MetaEvent};
pub use track::Track;

use crate::cursor::ByteError;
use snafu::Snafu;
use std::num::TryFromIntError;

/// The public Error type for this library.
#[derive(Debug, Snafu)]
pub struct Error(LibError);

/// The public Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// The internal Result type for this library.
pub(crate) type LibResult<T> = std::result::Result<T, LibError>;

/// A coarse classification of [`Error`], for callers that need to branch on what went wrong.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The buffer does not start with `MThd` followed by the header length `00 00 00 06`.
    InvalidFileHeader,
    /// Ticks per beat must be in the range `1..=32767`.
    InvalidTicksPerBeat,
    /// A channel-voice event was given a channel above 15.
    InvalidChannel,
    /// A channel-voice event was given a status that is not one of the seven channel-voice types.
    UnknownStatus,
    /// A meta event was serialized before its type was set.
    UnspecifiedEventType,
    /// A variable-length quantity was too long or overflowed.
    MalformedVlq,
    /// A read went past the end of the buffer.
    OutOfBounds,
    /// The file holds more tracks than the header can count.
    TooManyTracks,
    /// A track's data does not fit in a chunk length.
    TrackTooLong,
    /// Reading from, or writing to, an io stream failed.
    Io,
}

impl Error {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match &self.0 {
            LibError::InvalidFileHeader { .. } => ErrorKind::InvalidFileHeader,
            LibError::InvalidTicksPerBeat { .. } => ErrorKind::InvalidTicksPerBeat,
            LibError::InvalidChannel { .. } => ErrorKind::InvalidChannel,
            LibError::UnknownStatus { .. } => ErrorKind::UnknownStatus,
            LibError::UnspecifiedEventType { .. } => ErrorKind::UnspecifiedEventType,
            LibError::Read { source, .. } => match source {
                ByteError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
                ByteError::MalformedVlq { .. } => ErrorKind::MalformedVlq,
            },
            LibError::TooManyTracks { .. } => ErrorKind::TooManyTracks,
            LibError::TrackTooLong { .. } => ErrorKind::TrackTooLong,
            LibError::Io { .. } | LibError::Write { .. } => ErrorKind::Io,
        }
    }
}

/// The internal Error type for this library.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum LibError {
    #[snafu(display("{}: The MIDI file header is invalid: {}", site, description))]
    InvalidFileHeader { site: String, description: String },

    #[snafu(display(
        "{}: Ticks per beat must be an integer between 1 and 32767, got {}",
        site,
        ticks
    ))]
    InvalidTicksPerBeat { site: String, ticks: u32 },

    #[snafu(display("{}: Channel {} is out of bounds, expected 0-15", site, channel))]
    InvalidChannel { site: String, channel: u8 },

    #[snafu(display("{}: Unknown channel-voice status {:#04X}", site, status))]
    UnknownStatus { site: String, status: u8 },

    #[snafu(display("{}: Type for meta-event not specified", site))]
    UnspecifiedEventType { site: String },

    #[snafu(display("{} Error while reading data: {}", site, source))]
    Read { site: String, source: ByteError },

    #[snafu(display("{} Error while reading from stream: {}", site, source))]
    Io {
        site: String,
        source: std::io::Error,
    },

    #[snafu(display("{} There are too many tracks for a 16-bit uint: {}", site, source))]
    TooManyTracks {
        site: String,
        source: TryFromIntError,
    },

    #[snafu(display("{} The track is too long and overflows a u32: {}", site, source))]
    TrackTooLong {
        site: String,
        source: TryFromIntError,
    },

    #[snafu(display("{} Error while writing data: {}", site, source))]
    Write {
        site: String,
        source: std::io::Error,
    },
}

macro_rules! site {
    () => {
        format!("{}:{}", file!(), line!())
    };
}

macro_rules! io {
    () => {
        crate::error::ReadSnafu { site: site!() }
    };
}

macro_rules! wr {
    () => {
        crate::error::WriteSnafu { site: site!() }
    };
}

macro_rules! invalid_header_s {
    ($msg:expr) => {
        crate::error::InvalidFileHeaderSnafu {
            site: site!(),
            description: $msg,
        }
    };
    ($fmt:expr, $($arg:expr),+) => {
        crate::error::InvalidFileHeaderSnafu {
            site: site!(),
            description: format!($fmt, $($arg),+),
        }
    };
}

macro_rules! invalid_header {
    ($msg:expr) => {
        return Err(invalid_header_s!($msg).build())
    };
    ($fmt:expr, $($arg:expr),+) => {
        return Err(invalid_header_s!($fmt, $($arg),+).build())
    };
}

#[test]
fn site_test() {
    let line = line!() + 1;
    let site = site!();
    assert!(site.contains("error.rs"));
    assert!(site.contains(format!("{}", line).as_str()));
}

#[test]
fn invalid_header_macro_test_message() {
    fn foo() -> LibResult<u64> {
        let flerbin = String::from("flerbin");
        invalid_header!(flerbin);
    }
    let result = foo();
    let message = format!("{}", result.err().unwrap());
    assert!(message.contains("The MIDI file header is invalid"));
    assert!(message.contains("flerbin"));
}

#[test]
fn invalid_header_macro_test_fmt() {
    fn foo() -> LibResult<u64> {
        invalid_header!("hello {}, {}", "world", String::from("foo"));
    }
    let result = foo();
    let e: Error = result.err().unwrap().into();
    assert_eq!(ErrorKind::InvalidFileHeader, e.kind());
    assert!(format!("{}", e).contains("hello world, foo"));
}

#[test]
fn read_error_kind_test() {
    let e: Error = LibError::Read {
        site: site!(),
        source: ByteError::MalformedVlq { position: 3 },
    }
    .into();
    assert_eq!(ErrorKind::MalformedVlq, e.kind());
}

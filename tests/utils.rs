#![allow(dead_code)]

use log::LevelFilter;
use smf_codec::{ChannelEvent, MetaEvent, StatusType, Track};
use std::io::Write;
use std::sync::Once;

static LOGGER: Once = Once::new();

pub fn enable_logging() {
    LOGGER.call_once(logger_init)
}

fn logger_init() {
    env_logger::Builder::new()
        .is_test(true)
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} {} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Trace)
        .init();
}

/// `MThd` with the given format, track count and ticks.
pub fn header_bytes(format: u16, ntracks: u16, ticks: u16) -> Vec<u8> {
    let mut bytes = b"MThd".to_vec();
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]);
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&ntracks.to_be_bytes());
    bytes.extend_from_slice(&ticks.to_be_bytes());
    bytes
}

/// `MTrk` + length + `events` + end of track, with the length computed.
pub fn track_chunk(events: &[u8]) -> Vec<u8> {
    let mut bytes = b"MTrk".to_vec();
    bytes.extend_from_slice(&(events.len() as u32 + 4).to_be_bytes());
    bytes.extend_from_slice(events);
    bytes.extend_from_slice(&[0x00, 0xff, 0x2f, 0x00]);
    bytes
}

pub fn note(status: StatusType, channel: u8, pitch: u8, velocity: u8) -> ChannelEvent {
    ChannelEvent::new(status, channel, pitch, velocity).unwrap()
}

/// A four note arpeggio on channel 1 with a tempo and a track name.
pub fn arpeggio_track() -> Track {
    let mut track = Track::new();
    track
        .push_event(0, MetaEvent::new(MetaEvent::TRACK_NAME, "arpeggio"))
        .push_event(0, MetaEvent::new(MetaEvent::TEMPO, vec![0x07, 0xa1, 0x20]))
        .push_event(0, note(StatusType::ProgramChange, 1, 5, 0));
    let pitches = [48u8, 52, 57, 60];
    for (ix, pitch) in pitches.iter().enumerate() {
        let delta = if ix == 0 { 5 } else { 10 };
        track.push_event(delta, note(StatusType::NoteOn, 1, *pitch, 90));
    }
    for (ix, pitch) in pitches.iter().enumerate() {
        let delta = if ix == 0 { 200 } else { 0 };
        track.push_event(delta, note(StatusType::NoteOff, 1, *pitch, 90));
    }
    track
}

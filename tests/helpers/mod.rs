//! Test helpers and fixtures for retune integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `RATIO_EPSILON` (1e-9): Exact fractions (5/4, 81/64)
//! - `CENTS_EPSILON` (1e-6): Cent values derived from ratios
//! - `BEND_ROUND_TRIP_CENTS` (1.0): Pitch-bend quantization

#![allow(dead_code)]

pub mod tolerances;

use midi_msg::{ChannelVoiceMsg, MidiMsg};
use retune::prelude::*;

/// MIDI note numbers (octave 4)
pub const C4: u8 = 60;
pub const D4: u8 = 62;
pub const E4: u8 = 64;
pub const F4: u8 = 65;
pub const G4: u8 = 67;
pub const A4: u8 = 69;
pub const B4: u8 = 71;

/// Engine in `system` with the key already set to `tonic` major.
pub fn test_engine(system: IntonationSystem, tonic: Letter) -> RetuneEngine {
    RetuneEngine::builder()
        .system(system)
        .tonic(Note::natural(tonic))
        .build()
        .expect("Failed to create test engine")
}

/// Routes `tracing` output through the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Pitch bends in `messages`, with their channel.
pub fn bends(messages: &[MidiOutputMessage]) -> Vec<(u8, PitchBend)> {
    messages
        .iter()
        .filter_map(|m| m.bend().map(|bend| (m.channel(), bend)))
        .collect()
}

pub fn count_control_changes(messages: &[MidiOutputMessage]) -> usize {
    messages.iter().filter(|m| m.is_control_change()).count()
}

/// Decodes a message through midi-msg, panicking on malformed bytes.
pub fn decode(message: &MidiOutputMessage) -> (u8, ChannelVoiceMsg) {
    match message.to_msg().expect("emitted bytes should decode") {
        MidiMsg::ChannelVoice { channel, msg } => (channel as u8, msg),
        other => panic!("expected a channel voice message, got {other:?}"),
    }
}

/// Cents of the bend that went out last in `messages`.
pub fn last_bend_cents(messages: &[MidiOutputMessage], range: PitchBendRange) -> Option<f64> {
    bends(messages).last().map(|(_, bend)| bend.to_cents(range))
}

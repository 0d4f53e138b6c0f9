//! Error types for the MIDI pitch encoder.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("MIDI channel {0} is out of range (0-15)")]
    InvalidChannel(u8),

    #[error("MIDI channel {0} is not a retuning channel")]
    ReservedChannel(u8),

    #[error("No retuning channels configured")]
    NoChannels,

    #[error("Pitch-bend range {semitones} semitones {cents} cents is out of range (0-127, 0-99)")]
    InvalidRange { semitones: u8, cents: u8 },

    #[error("MIDI parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Centralized error type for the retune umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] retune_core::Error),

    #[error("MIDI: {0}")]
    Midi(#[from] retune_midi::Error),

    #[cfg(feature = "script")]
    #[error("Script: {0}")]
    Script(#[from] retune_script::Error),

    #[error("MIDI note {0} is out of range (0-127)")]
    InvalidMidiNote(u8),

    #[error("Key state machine was handed to a script worker")]
    KeyNotOwned,

    #[error("Script handle was not started by this engine")]
    ForeignScript,
}

impl Error {
    /// The core error at the root of this one, if any.
    pub fn core(&self) -> Option<&retune_core::Error> {
        match self {
            Error::Core(e) => Some(e),
            #[cfg(feature = "script")]
            Error::Script(e) => e.core(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! # Retune - Real-time Just Intonation for MIDI
//!
//! Retunes a MIDI note stream to just intonation against a key that can be
//! modulated while notes are playing.
//!
//! ## Architecture
//!
//! Retune is an umbrella crate that coordinates:
//! - **retune-core** - Note model, intonation tables, key state machine
//! - **retune-midi** - Pitch-bend and RPN encoding, per-note channel allocation
//! - **retune-script** - Modulation script interpreter and worker thread
//!
//! ## Quick Start
//!
//! ```
//! use retune::prelude::*;
//!
//! let mut engine = RetuneEngine::builder()
//!     .system(IntonationSystem::Diatonic)
//!     .build()?;
//!
//! // Drive the key from a script; the engine follows it
//! let script = engine.run_script("C\nD#\ns+\nG\n".as_bytes())?;
//! script.join()?;
//!
//! // E4 in G subdominant sounds 5/3 above G
//! let messages = engine.note_on(64, 100)?;
//! assert!(messages.iter().any(|m| m.is_pitch_bend()));
//! # Ok::<(), retune::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Script support
//! - `script` - Modulation script interpreter and worker

/// Re-export of retune-core for direct access
pub use retune_core as core;

/// Re-export of retune-midi for direct access
pub use retune_midi as midi;

#[cfg(feature = "script")]
pub use retune_script as script;

pub mod config;
pub mod error;

mod builder;
mod engine;

pub use builder::RetuneEngineBuilder;
pub use config::RetuneConfig;
pub use engine::{NoteReport, RetuneEngine};
pub use error::{Error, Result};

// Core types
pub use retune_core::{
    catalog, Accidental, Degree, IntonationSystem, Key, KeyStateMachine, KeyView, Letter, Mode,
    Note, NoteTuning, OutOfScaleNote, Ratio,
};

// MIDI types
pub use retune_midi::{
    midi_output_channel, BendRangeExceeded, ChannelSet, MidiOutputConsumer, MidiOutputMessage,
    MidiOutputProducer, PitchBend, PitchBendRange,
};

#[cfg(feature = "script")]
pub use retune_script::{
    ChannelObserver, Interpreter, ModulationCommand, RunSummary, ScriptEvent, ScriptHandle,
    ScriptObserver, ScriptOutcome,
};

/// Convenience prelude for common imports
pub mod prelude {
    // Main engine
    pub use crate::{RetuneConfig, RetuneEngine, RetuneEngineBuilder};

    // Key tracking
    pub use crate::core::{IntonationSystem, Key, KeyStateMachine, Letter, Mode, Note};

    // MIDI output
    pub use crate::midi::{ChannelSet, MidiOutputMessage, PitchBend, PitchBendRange};

    // Scripts
    #[cfg(feature = "script")]
    pub use crate::script::{Interpreter, ScriptHandle};
}

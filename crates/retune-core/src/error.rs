//! Error types for the retuning core.

use thiserror::Error;

use crate::note::Note;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid note name: {0:?}")]
    InvalidNoteName(String),

    #[error("No key has been set yet")]
    UninitializedKey,

    #[error("Unknown intonation system: {0:?}")]
    UnknownIntonationSystem(String),
}

/// Non-fatal report: a chromatic note was rounded to the nearest scale degree.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{note} is out of scale relative to {reference}, approximated by {semitones:+} semitone(s) from the nearest degree")]
pub struct OutOfScaleNote {
    pub note: Note,
    /// Tonic the degree was measured from (the fourth above the tonic in subdominant mode).
    pub reference: Note,
    pub semitones: i8,
}

pub type Result<T> = std::result::Result<T, Error>;

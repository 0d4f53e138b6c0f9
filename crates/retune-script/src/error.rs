//! Error types for script runs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: retune_core::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Script worker panicked")]
    WorkerPanicked,
}

impl Error {
    /// The core error behind a rejected line, if that is what ended the run.
    pub fn core(&self) -> Option<&retune_core::Error> {
        match self {
            Error::Script { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

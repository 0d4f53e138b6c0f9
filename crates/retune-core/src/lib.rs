//! Retuning core: spelled notes, intonation tables and the key state machine.
//!
//! # Example
//!
//! ```
//! use retune_core::{catalog, Note};
//!
//! let tonic: Note = "C".parse()?;
//! let mut machine = catalog::lookup("diatonic", tonic)?;
//!
//! let e: Note = "E".parse()?;
//! assert!((machine.ratio_for(e)?.as_float() - 1.25).abs() < 1e-9);
//!
//! machine.modulate("G".parse()?)?;
//! machine.set_subdominant(true)?;
//! assert!((machine.ratio_for(e)?.as_float() - 5.0 / 3.0).abs() < 1e-9);
//! # Ok::<(), retune_core::Error>(())
//! ```

pub mod error;
pub use error::{Error, OutOfScaleNote, Result};

pub mod catalog;
pub mod intonation;
pub mod key;
pub mod note;
pub mod ratio;

pub use intonation::{Degree, IntonationSystem};
pub use key::{Key, KeyStateMachine, KeyView, Mode, NoteTuning};
pub use note::{Accidental, Letter, Note};
pub use ratio::Ratio;

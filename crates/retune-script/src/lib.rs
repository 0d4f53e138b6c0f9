//! Modulation script interpreter.
//!
//! A script is a line-oriented text stream. The first command line sets the
//! initial key, later lines modulate to a new tonic or toggle the
//! subdominant mode (`s+` / `s-`). Lines starting with `#` are comments.
//!
//! ```
//! use retune_core::{IntonationSystem, KeyStateMachine, Letter, Note};
//! use retune_script::Interpreter;
//!
//! let script = "# opening\nC\nD#\ns+\nG\n";
//! let mut interpreter = Interpreter::new(KeyStateMachine::new(IntonationSystem::Diatonic));
//! let summary = interpreter.run(script.as_bytes())?;
//!
//! assert_eq!(summary.commands, 4);
//! let e = interpreter.machine().ratio_for(Note::natural(Letter::E))?;
//! assert!((e.as_float() - 5.0 / 3.0).abs() < 1e-9);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod command;
pub mod interpreter;
pub mod observer;
pub mod worker;

pub use command::{classify, parse_command, Line, ModulationCommand};
pub use interpreter::{Interpreter, RunSummary};
pub use observer::{ChannelObserver, ScriptEvent, ScriptObserver};
pub use worker::{ScriptHandle, ScriptOutcome, ScriptWorker};

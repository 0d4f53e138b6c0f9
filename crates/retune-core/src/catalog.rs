//! Intonation catalog: builds a key state machine from a system name.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::intonation::IntonationSystem;
use crate::key::KeyStateMachine;
use crate::note::Note;

/// Names accepted by [`lookup`].
pub fn names() -> impl Iterator<Item = &'static str> {
    IntonationSystem::ALL.into_iter().map(IntonationSystem::name)
}

/// Returns a machine for `name` with `tonic` already set.
///
/// Names are matched case-insensitively after trimming.
pub fn lookup(name: &str, tonic: Note) -> Result<KeyStateMachine> {
    let system = name.parse::<IntonationSystem>()?;
    Ok(KeyStateMachine::with_tonic(system, tonic))
}

impl FromStr for IntonationSystem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        IntonationSystem::ALL
            .into_iter()
            .find(|system| system.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownIntonationSystem(s.to_string()))
    }
}

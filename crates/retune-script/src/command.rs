//! Script line grammar.

use std::fmt;

use retune_core::{Error, KeyStateMachine, Note, Result};

/// One modulation step, consumed as soon as it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModulationCommand {
    SetInitialKey(Note),
    ModulateTo(Note),
    SetSubdominant(bool),
}

impl ModulationCommand {
    pub fn apply(self, machine: &mut KeyStateMachine) -> Result<()> {
        match self {
            ModulationCommand::SetInitialKey(tonic) => {
                machine.initialize(tonic);
                Ok(())
            }
            ModulationCommand::ModulateTo(tonic) => machine.modulate(tonic),
            ModulationCommand::SetSubdominant(on) => machine.set_subdominant(on),
        }
    }
}

impl fmt::Display for ModulationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModulationCommand::SetInitialKey(note) => write!(f, "key {note}"),
            ModulationCommand::ModulateTo(note) => write!(f, "modulate to {note}"),
            ModulationCommand::SetSubdominant(true) => f.write_str("subdominant on"),
            ModulationCommand::SetSubdominant(false) => f.write_str("subdominant off"),
        }
    }
}

/// A script line after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    /// Text after the `#`.
    Comment(&'a str),
    /// First whitespace-delimited token.
    Command(&'a str),
}

pub fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Line::Blank
    } else if let Some(comment) = trimmed.strip_prefix('#') {
        Line::Comment(comment.trim())
    } else {
        // Non-empty after trim, so there is a first token
        Line::Command(trimmed.split_whitespace().next().unwrap_or(trimmed))
    }
}

/// The first command of a script sets the key; later ones modulate or toggle
/// the subdominant.
pub fn parse_command(token: &str, first: bool) -> Result<ModulationCommand> {
    if first {
        return token.parse().map(ModulationCommand::SetInitialKey);
    }

    if token.starts_with('s') {
        if token.contains('+') {
            return Ok(ModulationCommand::SetSubdominant(true));
        }
        if token.contains('-') {
            return Ok(ModulationCommand::SetSubdominant(false));
        }
        return Err(Error::InvalidNoteName(token.to_string()));
    }

    token.parse().map(ModulationCommand::ModulateTo)
}

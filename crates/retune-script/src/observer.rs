//! Hooks for watching a script run.

use crossbeam_channel::{Sender, TrySendError};
use retune_core::Key;

use crate::command::ModulationCommand;

/// Callbacks invoked on the interpreting thread, in line order.
pub trait ScriptObserver: Send {
    fn on_comment(&mut self, _line: usize, _text: &str) {}

    /// Called after `command` took effect; `key` is the key it produced.
    fn on_command(&mut self, _line: usize, _command: ModulationCommand, _key: Key) {}

    fn on_error(&mut self, _line: usize, _error: &retune_core::Error) {}
}

impl ScriptObserver for () {}

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptEvent {
    Comment {
        line: usize,
        text: String,
    },
    Applied {
        line: usize,
        command: ModulationCommand,
        key: Key,
    },
    Rejected {
        line: usize,
        error: retune_core::Error,
    },
}

/// Forwards every event over a crossbeam channel. Events are dropped when the
/// channel is full or the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: Sender<ScriptEvent>,
}

impl ChannelObserver {
    pub fn new(sender: Sender<ScriptEvent>) -> Self {
        Self { sender }
    }

    fn send(&self, event: ScriptEvent) {
        if let Err(TrySendError::Full(event)) = self.sender.try_send(event) {
            tracing::debug!(?event, "Script event channel full, event dropped");
        }
    }
}

impl ScriptObserver for ChannelObserver {
    fn on_comment(&mut self, line: usize, text: &str) {
        self.send(ScriptEvent::Comment {
            line,
            text: text.to_string(),
        });
    }

    fn on_command(&mut self, line: usize, command: ModulationCommand, key: Key) {
        self.send(ScriptEvent::Applied { line, command, key });
    }

    fn on_error(&mut self, line: usize, error: &retune_core::Error) {
        self.send(ScriptEvent::Rejected {
            line,
            error: error.clone(),
        });
    }
}

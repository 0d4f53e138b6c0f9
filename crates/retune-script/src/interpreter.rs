//! Line-by-line script interpreter.
//!
//! Each command is applied to the key state machine before the next line is
//! read, so a script can be driven live from a pipe or a terminal. The first
//! rejected line ends the run.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use retune_core::{Key, KeyStateMachine, KeyView};
use tracing::{debug, error, info};

use crate::command::{classify, parse_command, Line, ModulationCommand};
use crate::error::{Error, Result};
use crate::observer::ScriptObserver;

/// What a run got through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub lines: usize,
    pub commands: usize,
    pub comments: usize,
    /// Stopped by a cancel request rather than end of input.
    pub cancelled: bool,
    pub final_key: Option<Key>,
}

pub struct Interpreter<O: ScriptObserver = ()> {
    machine: KeyStateMachine,
    observer: O,
    summary: RunSummary,
}

impl Interpreter<()> {
    pub fn new(machine: KeyStateMachine) -> Self {
        Self::with_observer(machine, ())
    }
}

impl<O: ScriptObserver> Interpreter<O> {
    pub fn with_observer(machine: KeyStateMachine, observer: O) -> Self {
        Self {
            machine,
            observer,
            summary: RunSummary::default(),
        }
    }

    pub fn machine(&self) -> &KeyStateMachine {
        &self.machine
    }

    pub fn into_machine(self) -> KeyStateMachine {
        self.machine
    }

    pub fn view(&self) -> KeyView {
        self.machine.view()
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Interprets one line. Returns the command it applied, if any.
    pub fn feed(&mut self, line: &str) -> Result<Option<ModulationCommand>> {
        self.summary.lines += 1;
        let number = self.summary.lines;

        match classify(line) {
            Line::Blank => Ok(None),
            Line::Comment(text) => {
                debug!(line = number, comment = text, "Script comment");
                self.summary.comments += 1;
                self.observer.on_comment(number, text);
                Ok(None)
            }
            Line::Command(token) => {
                let first = self.summary.commands == 0;
                let applied = parse_command(token, first)
                    .and_then(|command| command.apply(&mut self.machine).map(|()| command));

                match applied {
                    Ok(command) => {
                        self.summary.commands += 1;
                        self.summary.final_key = self.machine.key();
                        if let Some(key) = self.summary.final_key {
                            debug!(line = number, %command, %key, "Script command applied");
                            self.observer.on_command(number, command, key);
                        }
                        Ok(Some(command))
                    }
                    Err(source) => {
                        self.observer.on_error(number, &source);
                        Err(Error::Script {
                            line: number,
                            source,
                        })
                    }
                }
            }
        }
    }

    /// Interprets `reader` to the end.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<RunSummary> {
        self.run_until(reader, &AtomicBool::new(false))
    }

    /// Like [`run`](Self::run), but stops once `cancel` is set. A line that was
    /// already read when the request arrived is still interpreted.
    pub fn run_until<R: BufRead>(&mut self, reader: R, cancel: &AtomicBool) -> Result<RunSummary> {
        info!(system = %self.machine.system(), "Script run started");

        let mut lines = reader.lines();
        loop {
            if cancel.load(Ordering::Acquire) {
                self.summary.cancelled = true;
                break;
            }

            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    error!(line = self.summary.lines + 1, error = %e, "Script run aborted");
                    return Err(e.into());
                }
                None => break,
            };

            if let Err(e) = self.feed(&line) {
                error!(error = %e, "Script run aborted");
                return Err(e);
            }
        }

        info!(
            lines = self.summary.lines,
            commands = self.summary.commands,
            cancelled = self.summary.cancelled,
            "Script run finished"
        );
        Ok(self.summary.clone())
    }
}

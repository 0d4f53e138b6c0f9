//! Runs a script on its own thread while notes are evaluated elsewhere.
//!
//! The worker owns the [`KeyStateMachine`] for the length of one run; other
//! threads follow its key through the [`KeyView`] returned by
//! [`ScriptHandle::key_view`]. The machine is handed back by
//! [`ScriptHandle::finish`] however the run ended.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use retune_core::{KeyStateMachine, KeyView};
use tracing::info;

use crate::error::{Error, Result};
use crate::interpreter::{Interpreter, RunSummary};
use crate::observer::ScriptObserver;

const THREAD_NAME: &str = "retune-script";

/// A finished run together with the machine it drove.
#[derive(Debug)]
pub struct ScriptOutcome {
    pub machine: KeyStateMachine,
    pub result: Result<RunSummary>,
}

pub struct ScriptWorker;

impl ScriptWorker {
    /// Spawns the interpreter on a named thread reading from `reader`.
    pub fn spawn<R, O>(reader: R, machine: KeyStateMachine, observer: O) -> Result<ScriptHandle>
    where
        R: BufRead + Send + 'static,
        O: ScriptObserver + 'static,
    {
        let view = machine.view();
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_flag = Arc::clone(&cancel);

        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                let mut interpreter = Interpreter::with_observer(machine, observer);
                let result = interpreter.run_until(reader, &cancel_flag);
                ScriptOutcome {
                    machine: interpreter.into_machine(),
                    result,
                }
            })?;

        info!(thread = THREAD_NAME, "Script worker spawned");

        Ok(ScriptHandle {
            view,
            cancel,
            thread: Some(thread),
        })
    }
}

/// Handle to a running script. Dropping it requests cancellation without
/// waiting, and the machine is dropped with the worker; a worker blocked on a
/// read stops after that read returns.
pub struct ScriptHandle {
    view: KeyView,
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<ScriptOutcome>>,
}

impl ScriptHandle {
    pub fn key_view(&self) -> KeyView {
        self.view.clone()
    }

    /// The worker finishes the line it is on, then stops.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Waits for the run and drops the machine. Use [`finish`](Self::finish)
    /// to keep it.
    pub fn join(self) -> Result<RunSummary> {
        self.finish()?.result
    }

    /// Waits for the run and returns the machine with its result. Only a
    /// panicked worker loses the machine.
    pub fn finish(mut self) -> Result<ScriptOutcome> {
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| Error::WorkerPanicked),
            None => Err(Error::WorkerPanicked),
        }
    }
}

impl Drop for ScriptHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.cancel();
        }
    }
}

//! Builder for configuring and constructing a `RetuneEngine`.

use retune_core::{IntonationSystem, KeyStateMachine, KeyView, Note};
use retune_midi::{MidiOutputProducer, PitchBendRange};

use crate::config::RetuneConfig;
use crate::{Result, RetuneEngine};

/// Where the engine reads its key from.
enum KeySource {
    /// A fresh machine; the key is set later.
    Fresh,
    Tonic(Note),
    Machine(KeyStateMachine),
    /// Follow a machine owned elsewhere, e.g. by a script worker.
    View(KeyView),
}

/// A supplied machine or view fixes the intonation system; `.system()` only
/// applies to machines the builder creates.
///
/// # Example
///
/// ```
/// use retune::prelude::*;
///
/// let mut engine = RetuneEngine::builder()
///     .system(IntonationSystem::Pythagorean)
///     .pitch_bend_range(PitchBendRange::semitones(2))
///     .channels([0, 1, 2, 3])
///     .tonic(Note::natural(Letter::D))
///     .build()?;
///
/// let messages = engine.note_on(66, 100)?; // F#4
/// assert_eq!(messages.last().unwrap().as_bytes(), &[0x90, 66, 100]);
/// # Ok::<(), retune::Error>(())
/// ```
pub struct RetuneEngineBuilder {
    config: RetuneConfig,
    key: KeySource,
    output: Option<MidiOutputProducer>,
}

impl Default for RetuneEngineBuilder {
    fn default() -> Self {
        Self {
            config: RetuneConfig::default(),
            key: KeySource::Fresh,
            output: None,
        }
    }
}

impl RetuneEngineBuilder {
    /// Replaces every setting the config covers.
    pub fn config(mut self, config: RetuneConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: diatonic
    pub fn system(mut self, system: IntonationSystem) -> Self {
        self.config.system = system;
        self
    }

    /// Default: 2 semitones. Checked by `build()`.
    pub fn pitch_bend_range(mut self, range: PitchBendRange) -> Self {
        self.config.pitch_bend_range = range;
        self
    }

    /// Default: every channel except 9. Checked by `build()`.
    pub fn channels(mut self, channels: impl IntoIterator<Item = u8>) -> Self {
        self.config.channels = channels.into_iter().collect();
        self
    }

    /// Initial tonic (major mode).
    pub fn tonic(mut self, tonic: Note) -> Self {
        self.key = KeySource::Tonic(tonic);
        self
    }

    pub fn machine(mut self, machine: KeyStateMachine) -> Self {
        self.key = KeySource::Machine(machine);
        self
    }

    pub fn key_view(mut self, view: KeyView) -> Self {
        self.key = KeySource::View(view);
        self
    }

    /// Every message the engine emits is also pushed here.
    pub fn output(mut self, producer: MidiOutputProducer) -> Self {
        self.output = Some(producer);
        self
    }

    pub fn build(self) -> Result<RetuneEngine> {
        let channels = self.config.channel_set()?;
        let range = self.config.pitch_bend_range.validate()?;
        let system = self.config.system;

        let (machine, view) = match self.key {
            KeySource::Fresh => {
                let machine = KeyStateMachine::new(system);
                let view = machine.view();
                (Some(machine), view)
            }
            KeySource::Tonic(tonic) => {
                let machine = KeyStateMachine::with_tonic(system, tonic);
                let view = machine.view();
                (Some(machine), view)
            }
            KeySource::Machine(machine) => {
                let view = machine.view();
                (Some(machine), view)
            }
            KeySource::View(view) => (None, view),
        };

        Ok(RetuneEngine::from_parts(
            machine,
            view,
            channels,
            range,
            self.output,
        ))
    }
}

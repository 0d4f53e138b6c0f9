//! RetuneEngine that turns incoming notes into retuned MIDI output

use retune_core::{IntonationSystem, Key, KeyStateMachine, KeyView, Note, NoteTuning};
use retune_midi::{
    BendRangeExceeded, ChannelAllocator, ChannelSet, MidiOutputMessage, MidiOutputProducer,
    PitchBend, PitchBendRange, PitchEncoder,
};
use tracing::{debug, info, warn};

use crate::config::RetuneConfig;
use crate::error::{Error, Result};

#[cfg(feature = "script")]
use retune_script::{RunSummary, ScriptHandle, ScriptObserver, ScriptWorker};

/// How the last note on was tuned.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteReport {
    pub midi_note: u8,
    pub channel: u8,
    pub tuning: NoteTuning,
    pub bend: PitchBend,
    pub exceeded: Option<BendRangeExceeded>,
}

/// Retunes notes against the current key.
///
/// Every sounding note gets its own channel, so a later modulation only
/// affects notes struck after it. The key is read through a [`KeyView`]; the
/// engine either owns the [`KeyStateMachine`] behind it or follows one owned
/// by a script worker.
///
/// # Example
///
/// ```
/// use retune::prelude::*;
///
/// let mut engine = RetuneEngine::builder().tonic(Note::natural(Letter::C)).build()?;
///
/// // E4 in C major: a just major third, ~13.7 cents flat
/// let messages = engine.note_on(64, 90)?;
/// assert_eq!(messages.len(), 8); // RPN range (6) + pitch bend + note on
///
/// let report = engine.last_note().unwrap();
/// assert!(report.bend.signed() < 0);
/// # Ok::<(), retune::Error>(())
/// ```
pub struct RetuneEngine {
    /// Present unless handed to a script worker
    machine: Option<KeyStateMachine>,
    view: KeyView,
    encoder: PitchEncoder,
    allocator: ChannelAllocator,
    output: Option<MidiOutputProducer>,
    last_note: Option<NoteReport>,
}

impl RetuneEngine {
    /// Create a new engine builder
    pub fn builder() -> crate::RetuneEngineBuilder {
        crate::RetuneEngineBuilder::default()
    }

    pub fn from_config(config: RetuneConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub(crate) fn from_parts(
        machine: Option<KeyStateMachine>,
        view: KeyView,
        channels: ChannelSet,
        range: PitchBendRange,
        output: Option<MidiOutputProducer>,
    ) -> Self {
        info!(
            system = %view.system(),
            channels = channels.len(),
            %range,
            "Retune engine ready"
        );
        Self {
            machine,
            view,
            encoder: PitchEncoder::new(channels, range),
            allocator: ChannelAllocator::new(channels),
            output,
            last_note: None,
        }
    }

    pub fn system(&self) -> IntonationSystem {
        self.view.system()
    }

    pub fn channels(&self) -> ChannelSet {
        self.encoder.channels()
    }

    pub fn key_view(&self) -> KeyView {
        self.view.clone()
    }

    pub fn current_key(&self) -> Option<Key> {
        self.view.current_key()
    }

    /// `None` once the machine was handed to a script worker.
    pub fn machine(&self) -> Option<&KeyStateMachine> {
        self.machine.as_ref()
    }

    pub fn set_key(&mut self, tonic: Note) -> Result<()> {
        self.machine_mut()?.initialize(tonic);
        Ok(())
    }

    pub fn modulate(&mut self, tonic: Note) -> Result<()> {
        Ok(self.machine_mut()?.modulate(tonic)?)
    }

    pub fn set_subdominant(&mut self, on: bool) -> Result<()> {
        Ok(self.machine_mut()?.set_subdominant(on)?)
    }

    /// Runs a modulation script on a worker thread. The engine keeps
    /// following the key through its view, and gets key control back through
    /// [`join_script`](Self::join_script).
    #[cfg(feature = "script")]
    pub fn run_script<R>(&mut self, reader: R) -> Result<ScriptHandle>
    where
        R: std::io::BufRead + Send + 'static,
    {
        self.run_script_with_observer(reader, ())
    }

    #[cfg(feature = "script")]
    pub fn run_script_with_observer<R, O>(&mut self, reader: R, observer: O) -> Result<ScriptHandle>
    where
        R: std::io::BufRead + Send + 'static,
        O: ScriptObserver + 'static,
    {
        let machine = self.machine.take().ok_or(Error::KeyNotOwned)?;
        Ok(ScriptWorker::spawn(reader, machine, observer)?)
    }

    /// Waits for a script started by this engine and takes its machine back,
    /// whether the run finished, failed or was cancelled.
    #[cfg(feature = "script")]
    pub fn join_script(&mut self, handle: ScriptHandle) -> Result<RunSummary> {
        if self.machine.is_some() || !handle.key_view().follows(&self.view) {
            return Err(Error::ForeignScript);
        }
        let outcome = handle.finish()?;
        self.machine = Some(outcome.machine);
        Ok(outcome.result?)
    }

    /// Changes one channel's range; the RPN sequence is resent with its next note.
    pub fn set_pitch_bend_range(&mut self, channel: u8, range: PitchBendRange) -> Result<()> {
        Ok(self.encoder.set_range(channel, range.validate()?)?)
    }

    /// Velocity 0 is treated as note off.
    pub fn note_on(&mut self, midi_note: u8, velocity: u8) -> Result<Vec<MidiOutputMessage>> {
        if midi_note > 127 {
            return Err(Error::InvalidMidiNote(midi_note));
        }
        if velocity == 0 {
            return Ok(self.note_off(midi_note));
        }

        // Evaluate before touching channel state so an unset key emits nothing
        let tuning = self.view.tuning_for(Note::from_midi(midi_note))?;

        let assignment = self
            .allocator
            .assign(midi_note)
            .ok_or(retune_midi::Error::NoChannels)?;
        let channel = assignment.channel;

        let mut messages = Vec::with_capacity(9);
        if let Some(stolen) = assignment.stolen {
            debug!(channel, stolen, "Channel stolen");
            messages.push(MidiOutputMessage::note_off(channel, stolen, 0));
        } else if assignment.retriggered {
            messages.push(MidiOutputMessage::note_off(channel, midi_note, 0));
        }

        let encoded = self.encoder.retune(channel, tuning.deviation_cents)?;
        messages.extend(encoded.messages);
        messages.push(MidiOutputMessage::note_on(channel, midi_note, velocity));

        debug!(
            note = midi_note,
            channel,
            degree = ?tuning.degree,
            cents = tuning.deviation_cents,
            "Note on"
        );

        self.last_note = Some(NoteReport {
            midi_note,
            channel,
            tuning,
            bend: encoded.bend,
            exceeded: encoded.exceeded,
        });

        Ok(self.emit(messages))
    }

    /// Empty if the note is not sounding.
    pub fn note_off(&mut self, midi_note: u8) -> Vec<MidiOutputMessage> {
        match self.allocator.release(midi_note) {
            Some(channel) => self.emit(vec![MidiOutputMessage::note_off(channel, midi_note, 0)]),
            None => Vec::new(),
        }
    }

    /// Stops every sounding note and centers their channels.
    pub fn all_notes_off(&mut self) -> Vec<MidiOutputMessage> {
        let active: Vec<(u8, u8)> = self.allocator.active().collect();
        self.allocator.clear();

        let mut messages = Vec::with_capacity(active.len() * 2);
        for (note, channel) in active {
            messages.push(MidiOutputMessage::note_off(channel, note, 0));
            if let Ok(Some(center)) = self.encoder.reset_channel(channel) {
                messages.push(center);
            }
        }
        self.emit(messages)
    }

    /// Like [`all_notes_off`](Self::all_notes_off), and also centers idle
    /// channels. Ranges are resent on the next note.
    pub fn shutdown(&mut self) -> Vec<MidiOutputMessage> {
        let mut messages = self.all_notes_off();
        let centered = self.encoder.shutdown();
        messages.extend(self.emit(centered));
        self.last_note = None;
        info!(messages = messages.len(), "Retune engine shut down");
        messages
    }

    pub fn last_note(&self) -> Option<&NoteReport> {
        self.last_note.as_ref()
    }

    /// Sounding notes with their channel.
    pub fn active_notes(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.allocator.active()
    }

    pub fn channel_for_note(&self, midi_note: u8) -> Option<u8> {
        self.allocator.channel_for_note(midi_note)
    }

    pub fn bend_for_channel(&self, channel: u8) -> Option<PitchBend> {
        self.encoder.state(channel).map(|state| state.bend)
    }

    fn machine_mut(&mut self) -> Result<&mut KeyStateMachine> {
        self.machine.as_mut().ok_or(Error::KeyNotOwned)
    }

    /// Channels whose messages were dropped resend their range and bend with
    /// their next note.
    fn emit(&mut self, messages: Vec<MidiOutputMessage>) -> Vec<MidiOutputMessage> {
        let Some(output) = &self.output else {
            return messages;
        };
        let queued = output.push_all(messages.iter().cloned());
        if queued < messages.len() {
            warn!(
                queued,
                dropped = messages.len() - queued,
                "MIDI output full, messages dropped"
            );
            for message in &messages[queued..] {
                // Channels outside the set only carry note messages
                let _ = self.encoder.invalidate(message.channel());
            }
        }
        messages
    }
}

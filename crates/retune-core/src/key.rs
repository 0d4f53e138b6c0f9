//! Key state machine.
//!
//! Tracks the active [`Key`] (tonic + mode) for a session and evaluates
//! incoming notes against it. The machine is the single writer; every
//! transition publishes an immutable snapshot that any number of
//! [`KeyView`]s read without locking.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, OutOfScaleNote, Result};
use crate::intonation::{self, Degree, IntonationSystem};
use crate::note::{Letter, Note};
use crate::ratio::{Ratio, CENTS_PER_OCTAVE, CENTS_PER_SEMITONE};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Major,
    /// Degrees are measured from the fourth above the tonic.
    Subdominant,
}

/// Tonic + mode. Compared by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub tonic: Note,
    pub mode: Mode,
}

impl Key {
    /// The octave of `tonic` is dropped.
    pub fn new(tonic: Note, mode: Mode) -> Self {
        Self {
            tonic: Note::new(tonic.letter(), tonic.accidental()),
            mode,
        }
    }

    pub fn major(tonic: Note) -> Self {
        Self::new(tonic, Mode::Major)
    }

    /// Note the scale degrees are counted from.
    pub fn reference(&self) -> Note {
        match self.mode {
            Mode::Major => self.tonic,
            Mode::Subdominant => transpose_spelled(self.tonic, 3, 5),
        }
    }

    /// Evaluates `note` against this key under `system`.
    pub fn tuning_for(&self, note: Note, system: IntonationSystem) -> NoteTuning {
        let reference = self.reference();
        let (degree, offset) = nearest_degree(note, reference);

        let mut ratio = intonation::ratio(degree, system);
        if offset != 0 {
            ratio = ratio * Ratio::from_semitones(offset as f64);
        }
        if self.mode == Mode::Subdominant {
            ratio = intonation::ratio(Degree::Subdominant, system) * ratio;
        }
        let ratio = ratio.reduce_to_octave();

        let tonic_interval = (note.semitone_offset() - self.tonic.semitone_offset()).rem_euclid(12);
        let mut deviation_cents = ratio.as_cents() - tonic_interval as f64 * CENTS_PER_SEMITONE;
        if deviation_cents > CENTS_PER_OCTAVE / 2.0 {
            deviation_cents -= CENTS_PER_OCTAVE;
        } else if deviation_cents <= -CENTS_PER_OCTAVE / 2.0 {
            deviation_cents += CENTS_PER_OCTAVE;
        }

        let out_of_scale = (offset != 0).then_some(OutOfScaleNote {
            note,
            reference,
            semitones: offset as i8,
        });

        NoteTuning {
            note,
            degree,
            ratio,
            deviation_cents,
            out_of_scale,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Major => write!(f, "{} major", self.tonic),
            Mode::Subdominant => write!(f, "{} major (subdominant)", self.tonic),
        }
    }
}

/// Result of evaluating a note in a key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteTuning {
    pub note: Note,
    pub degree: Degree,
    /// Ratio above the tonic, within one octave.
    pub ratio: Ratio,
    /// Distance from the equal-tempered pitch of the same key.
    pub deviation_cents: f64,
    /// Set when a chromatic note was rounded to the nearest degree.
    pub out_of_scale: Option<OutOfScaleNote>,
}

impl NoteTuning {
    pub fn deviation(&self) -> Ratio {
        Ratio::from_cents(self.deviation_cents)
    }
}

/// Spells the note `letters` letter steps and `semitones` semitones above `note`.
fn transpose_spelled(note: Note, letters: u8, semitones: i32) -> Note {
    let letter = Letter::ALL[((note.letter().index() + letters) % 7) as usize];
    let target = note.semitone_offset() + semitones;
    let mut shift = (target - letter.semitones()).rem_euclid(12);
    if shift > 6 {
        shift -= 12;
    }
    match shift {
        0 => Note::natural(letter),
        1 => Note::sharp(letter),
        -1 => Note::flat(letter),
        // Double accidentals are not representable; respell from the pitch class.
        _ => {
            let respelled = Note::from_midi(target.rem_euclid(12) as u8);
            Note::new(respelled.letter(), respelled.accidental())
        }
    }
}

/// Diatonic degree of `note` above `reference`, and the semitone remainder
/// when the note is chromatic. Ties go to the degree matching the note's
/// letter, otherwise to the lower degree.
fn nearest_degree(note: Note, reference: Note) -> (Degree, i32) {
    let interval = (note.semitone_offset() - reference.semitone_offset()).rem_euclid(12);
    if let Some(degree) = Degree::from_semitones(interval) {
        return (degree, 0);
    }

    let letter_steps =
        (note.letter().index() as i32 - reference.letter().index() as i32).rem_euclid(7);
    let lower = Degree::from_semitones(interval - 1);
    let upper = Degree::from_semitones(interval + 1);

    let degree = match (lower, upper) {
        (_, Some(up)) if up.index() as i32 == letter_steps => up,
        (Some(low), _) => low,
        (None, Some(up)) => up,
        (None, None) => Degree::Tonic,
    };
    let mut offset = interval - degree.semitones();
    if offset > 6 {
        offset -= 12;
    } else if offset < -6 {
        offset += 12;
    }
    (degree, offset)
}

fn log_out_of_scale(tuning: &NoteTuning) {
    if let Some(report) = tuning.out_of_scale {
        warn!(%report, degree = ?tuning.degree, "Out-of-scale note approximated");
    }
}

/// Owns the active key for a session. The intonation system is fixed at construction.
#[derive(Debug)]
pub struct KeyStateMachine {
    system: IntonationSystem,
    key: Option<Key>,
    published: Arc<ArcSwapOption<Key>>,
    transitions: u64,
}

impl KeyStateMachine {
    pub fn new(system: IntonationSystem) -> Self {
        Self {
            system,
            key: None,
            published: Arc::new(ArcSwapOption::empty()),
            transitions: 0,
        }
    }

    /// Creates the machine with its initial tonic already set.
    pub fn with_tonic(system: IntonationSystem, tonic: Note) -> Self {
        let mut machine = Self::new(system);
        machine.initialize(tonic);
        machine
    }

    pub fn system(&self) -> IntonationSystem {
        self.system
    }

    pub fn key(&self) -> Option<Key> {
        self.key
    }

    pub fn is_initialized(&self) -> bool {
        self.key.is_some()
    }

    /// Number of transitions applied so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Sets the tonic in major mode. Calling it again restarts the session key.
    pub fn initialize(&mut self, tonic: Note) {
        let key = Key::major(tonic);
        debug!(%key, system = %self.system, "Key initialized");
        self.publish(key);
    }

    pub fn modulate(&mut self, new_tonic: Note) -> Result<()> {
        let current = self.key.ok_or(Error::UninitializedKey)?;
        let key = Key::new(new_tonic, current.mode);
        debug!(from = %current, to = %key, "Modulated");
        self.publish(key);
        Ok(())
    }

    pub fn set_subdominant(&mut self, on: bool) -> Result<()> {
        let current = self.key.ok_or(Error::UninitializedKey)?;
        let mode = if on { Mode::Subdominant } else { Mode::Major };
        let key = Key::new(current.tonic, mode);
        debug!(key = %key, "Subdominant {}", if on { "enabled" } else { "disabled" });
        self.publish(key);
        Ok(())
    }

    pub fn ratio_for(&self, note: Note) -> Result<Ratio> {
        self.tuning_for(note).map(|tuning| tuning.ratio)
    }

    pub fn tuning_for(&self, note: Note) -> Result<NoteTuning> {
        let key = self.key.ok_or(Error::UninitializedKey)?;
        let tuning = key.tuning_for(note, self.system);
        log_out_of_scale(&tuning);
        Ok(tuning)
    }

    /// Read handle that follows every later transition of this machine.
    pub fn view(&self) -> KeyView {
        KeyView {
            system: self.system,
            published: Arc::clone(&self.published),
        }
    }

    fn publish(&mut self, key: Key) {
        self.key = Some(key);
        self.transitions += 1;
        self.published.store(Some(Arc::new(key)));
    }
}

/// Lock-free reader of a [`KeyStateMachine`]'s current key.
#[derive(Debug, Clone)]
pub struct KeyView {
    system: IntonationSystem,
    published: Arc<ArcSwapOption<Key>>,
}

impl KeyView {
    pub fn system(&self) -> IntonationSystem {
        self.system
    }

    pub fn current_key(&self) -> Option<Key> {
        self.published.load_full().map(|key| *key)
    }

    /// True if both views follow the same machine.
    pub fn follows(&self, other: &KeyView) -> bool {
        Arc::ptr_eq(&self.published, &other.published)
    }

    pub fn ratio_for(&self, note: Note) -> Result<Ratio> {
        self.tuning_for(note).map(|tuning| tuning.ratio)
    }

    pub fn tuning_for(&self, note: Note) -> Result<NoteTuning> {
        let key = self.current_key().ok_or(Error::UninitializedKey)?;
        let tuning = key.tuning_for(note, self.system);
        log_out_of_scale(&tuning);
        Ok(tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::parse;
    use approx::assert_abs_diff_eq;

    fn note(token: &str) -> Note {
        parse(token).unwrap()
    }

    #[test]
    fn test_uninitialized_machine_rejects_everything() {
        let mut machine = KeyStateMachine::new(IntonationSystem::Diatonic);
        assert_eq!(machine.ratio_for(note("C")), Err(Error::UninitializedKey));
        assert_eq!(machine.modulate(note("D")), Err(Error::UninitializedKey));
        assert_eq!(machine.set_subdominant(true), Err(Error::UninitializedKey));
        assert_eq!(machine.transitions(), 0);
        assert!(machine.view().current_key().is_none());
    }

    #[test]
    fn test_tonic_is_unison_in_every_system_and_mode() {
        for system in IntonationSystem::ALL {
            for tonic in ["C", "D#", "G-", "B", "F", "F-", "B#"] {
                let mut machine = KeyStateMachine::with_tonic(system, note(tonic));
                assert!(machine.ratio_for(note(tonic)).unwrap().approx_eq(Ratio::UNISON, 1e-6));

                machine.set_subdominant(true).unwrap();
                let tuning = machine.tuning_for(note(tonic)).unwrap();
                assert!(tuning.ratio.approx_eq(Ratio::UNISON, 1e-6), "{system} {tonic}");
                assert_abs_diff_eq!(tuning.deviation_cents, 0.0, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_diatonic_ratios_in_c() {
        let machine = KeyStateMachine::with_tonic(IntonationSystem::Diatonic, note("C"));
        let expected = [
            ("D", 9.0 / 8.0),
            ("E", 5.0 / 4.0),
            ("F", 4.0 / 3.0),
            ("G", 3.0 / 2.0),
            ("A", 5.0 / 3.0),
            ("B", 15.0 / 8.0),
        ];
        for (token, value) in expected {
            assert_abs_diff_eq!(
                machine.ratio_for(note(token)).unwrap().as_float(),
                value,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_equal_temperament_never_deviates() {
        let mut machine = KeyStateMachine::with_tonic(IntonationSystem::EqualTemperament, note("E-"));
        for midi in 48..72u8 {
            let tuning = machine.tuning_for(Note::from_midi(midi)).unwrap();
            assert_abs_diff_eq!(tuning.deviation_cents, 0.0, epsilon = 1e-6);
        }
        machine.set_subdominant(true).unwrap();
        for midi in 48..72u8 {
            let tuning = machine.tuning_for(Note::from_midi(midi)).unwrap();
            assert_abs_diff_eq!(tuning.deviation_cents, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_subdominant_retunes_supertonic() {
        let mut machine = KeyStateMachine::with_tonic(IntonationSystem::Diatonic, note("C"));
        assert_abs_diff_eq!(
            machine.ratio_for(note("D")).unwrap().as_float(),
            9.0 / 8.0,
            epsilon = 1e-9
        );

        machine.set_subdominant(true).unwrap();
        assert_eq!(machine.key().unwrap().tonic, note("C"));
        // D measured from F is a major sixth: 4/3 * 5/3 = 20/9 -> 10/9
        assert_abs_diff_eq!(
            machine.ratio_for(note("D")).unwrap().as_float(),
            10.0 / 9.0,
            epsilon = 1e-9
        );
        // B-flat is diatonic above F
        let b_flat = machine.tuning_for(note("B-")).unwrap();
        assert!(b_flat.out_of_scale.is_none());
        assert_abs_diff_eq!(b_flat.ratio.as_float(), 16.0 / 9.0, epsilon = 1e-9);
    }

    #[test]
    fn test_modulation_tracks_tonic_only() {
        let mut via_d = KeyStateMachine::with_tonic(IntonationSystem::Diatonic, note("C"));
        via_d.modulate(note("D")).unwrap();
        via_d.modulate(note("G")).unwrap();

        let direct = KeyStateMachine::with_tonic(IntonationSystem::Diatonic, note("G"));
        assert_eq!(via_d.key(), direct.key());
        assert_eq!(via_d.transitions(), 3);
        assert_eq!(direct.transitions(), 1);

        for token in ["C", "E", "F#", "A"] {
            assert_eq!(via_d.ratio_for(note(token)), direct.ratio_for(note(token)));
        }
    }

    #[test]
    fn test_modulation_keeps_mode() {
        let mut machine = KeyStateMachine::with_tonic(IntonationSystem::Pythagorean, note("C"));
        machine.set_subdominant(true).unwrap();
        machine.modulate(note("A")).unwrap();
        assert_eq!(machine.key().unwrap(), Key::new(note("A"), Mode::Subdominant));
        machine.set_subdominant(false).unwrap();
        assert_eq!(machine.key().unwrap(), Key::major(note("A")));
    }

    #[test]
    fn test_chromatic_note_rounds_to_spelled_degree() {
        let machine = KeyStateMachine::with_tonic(IntonationSystem::Diatonic, note("C"));

        // C# rounds down to the tonic, D- rounds up to the supertonic
        let c_sharp = machine.tuning_for(note("C#")).unwrap();
        assert_eq!(c_sharp.degree, Degree::Tonic);
        assert_eq!(c_sharp.out_of_scale.unwrap().semitones, 1);
        assert_abs_diff_eq!(c_sharp.deviation_cents, 0.0, epsilon = 1e-9);

        let d_flat = machine.tuning_for(note("D-")).unwrap();
        assert_eq!(d_flat.degree, Degree::Supertonic);
        assert_eq!(d_flat.out_of_scale.unwrap().semitones, -1);
        assert_abs_diff_eq!(
            d_flat.deviation_cents,
            intonation::deviation(Degree::Supertonic, IntonationSystem::Diatonic).as_cents(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_diatonic_notes_are_in_scale() {
        let machine = KeyStateMachine::with_tonic(IntonationSystem::Diatonic, note("D"));
        for token in ["D", "E", "F#", "G", "A", "B", "C#"] {
            assert!(machine.tuning_for(note(token)).unwrap().out_of_scale.is_none());
        }
        // Enharmonic spelling still lands on the degree
        assert!(machine.tuning_for(note("G-")).unwrap().out_of_scale.is_none());
    }

    #[test]
    fn test_view_follows_machine() {
        let mut machine = KeyStateMachine::new(IntonationSystem::Diatonic);
        let view = machine.view();
        assert_eq!(view.ratio_for(note("E")), Err(Error::UninitializedKey));

        machine.initialize(note("C"));
        assert_eq!(view.current_key(), Some(Key::major(note("C"))));
        assert_eq!(view.ratio_for(note("E")), machine.ratio_for(note("E")));

        machine.modulate(note("D#")).unwrap();
        assert_eq!(view.current_key().unwrap().tonic, note("D#"));
        assert_eq!(view.system(), IntonationSystem::Diatonic);

        assert!(view.follows(&machine.view()));
        let other = KeyStateMachine::new(IntonationSystem::Diatonic);
        assert!(!view.follows(&other.view()));
    }

    #[test]
    fn test_keys_compare_by_value() {
        use std::collections::HashSet;

        let mut keys = HashSet::new();
        keys.insert(Key::major(note("C")));
        keys.insert(Key::major(note("c")));
        keys.insert(Key::major(Note::from_midi(60)));
        keys.insert(Key::new(note("C"), Mode::Subdominant));
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_reference_spelling() {
        assert_eq!(Key::new(note("C"), Mode::Subdominant).reference(), note("F"));
        assert_eq!(Key::new(note("F"), Mode::Subdominant).reference(), note("B-"));
        assert_eq!(Key::new(note("C#"), Mode::Subdominant).reference(), note("F#"));
        assert_eq!(Key::new(note("F-"), Mode::Subdominant).reference(), note("A"));
        assert_eq!(Key::major(note("G")).reference(), note("G"));
    }
}

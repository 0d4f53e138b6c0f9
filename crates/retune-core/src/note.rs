//! Spelled note names.
//!
//! A [`Note`] keeps its letter and accidental rather than collapsing to a
//! pitch class, so `C#` and `D-` stay distinct even though they sound the
//! same in equal temperament. The spelling decides which scale degree a
//! chromatic note rounds to.
//!
//! # Example
//! ```
//! use retune_core::{Accidental, Letter, Note};
//!
//! let note: Note = "c#".parse().unwrap();
//! assert_eq!(note.letter(), Letter::C);
//! assert_eq!(note.accidental(), Accidental::Sharp);
//! assert_eq!(note.semitone_offset(), 1);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Note letter, ordered by position on the C major scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// 0-6, where 0 = C.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Semitones above C in equal temperament.
    pub const fn semitones(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    pub const fn semitones(self) -> i32 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    /// Marker used in script tokens.
    pub const fn marker(self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "-",
        }
    }
}

/// A spelled note, optionally placed in an octave.
///
/// Notes parsed from script tokens have no octave; notes built from MIDI
/// numbers carry one (MIDI 60 = C4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    letter: Letter,
    accidental: Accidental,
    octave: Option<i8>,
}

impl Note {
    pub const fn new(letter: Letter, accidental: Accidental) -> Self {
        Self {
            letter,
            accidental,
            octave: None,
        }
    }

    pub const fn natural(letter: Letter) -> Self {
        Self::new(letter, Accidental::Natural)
    }

    pub const fn sharp(letter: Letter) -> Self {
        Self::new(letter, Accidental::Sharp)
    }

    pub const fn flat(letter: Letter) -> Self {
        Self::new(letter, Accidental::Flat)
    }

    pub const fn with_octave(mut self, octave: i8) -> Self {
        self.octave = Some(octave);
        self
    }

    /// Spells a MIDI note number with sharps.
    pub fn from_midi(midi: u8) -> Note {
        const SPELLING: [(Letter, Accidental); 12] = [
            (Letter::C, Accidental::Natural),
            (Letter::C, Accidental::Sharp),
            (Letter::D, Accidental::Natural),
            (Letter::D, Accidental::Sharp),
            (Letter::E, Accidental::Natural),
            (Letter::F, Accidental::Natural),
            (Letter::F, Accidental::Sharp),
            (Letter::G, Accidental::Natural),
            (Letter::G, Accidental::Sharp),
            (Letter::A, Accidental::Natural),
            (Letter::A, Accidental::Sharp),
            (Letter::B, Accidental::Natural),
        ];
        let midi = midi.min(127);
        let (letter, accidental) = SPELLING[(midi % 12) as usize];
        Note::new(letter, accidental).with_octave((midi / 12) as i8 - 1)
    }

    pub const fn letter(self) -> Letter {
        self.letter
    }

    pub const fn accidental(self) -> Accidental {
        self.accidental
    }

    pub const fn octave(self) -> Option<i8> {
        self.octave
    }

    /// Position on the diatonic scale, 0-6 where 0 = C.
    pub const fn degree_index(self) -> u8 {
        self.letter.index()
    }

    /// Semitones above C, including the accidental. `C-` is -1 and `B#` is 12.
    pub const fn semitone_offset(self) -> i32 {
        self.letter.semitones() + self.accidental.semitones()
    }

    /// 0-11, where 0 = C.
    pub const fn pitch_class(self) -> u8 {
        self.semitone_offset().rem_euclid(12) as u8
    }

    /// MIDI note number, if the note has an octave and lands in 0-127.
    pub fn midi(self) -> Option<u8> {
        let octave = self.octave? as i32;
        let midi = (octave + 1) * 12 + self.semitone_offset();
        u8::try_from(midi).ok().filter(|m| *m <= 127)
    }

    /// Same letter and accidental, ignoring octave.
    pub fn same_pitch_name(self, other: Note) -> bool {
        self.letter == other.letter && self.accidental == other.accidental
    }
}

/// Parses `[A-Ga-g]['#'|'-']?`.
pub fn parse(token: &str) -> Result<Note> {
    let invalid = || Error::InvalidNoteName(token.to_string());

    let mut chars = token.chars();
    let letter = chars.next().and_then(Letter::from_char).ok_or_else(invalid)?;
    let accidental = match chars.next() {
        None => Accidental::Natural,
        Some('#') => Accidental::Sharp,
        Some('-') => Accidental::Flat,
        Some(_) => return Err(invalid()),
    };
    if chars.next().is_some() {
        return Err(invalid());
    }

    Ok(Note::new(letter, accidental))
}

impl FromStr for Note {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter.as_char(), self.accidental.marker())?;
        if let Some(octave) = self.octave {
            write!(f, "{octave}")?;
        }
        Ok(())
    }
}

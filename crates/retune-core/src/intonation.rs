//! Intonation systems and their degree → ratio tables.
//!
//! Every table lists the seven degrees of the major scale relative to the
//! tonic. The tables are immutable statics: 7 degrees × 3 systems.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ratio::Ratio;

/// Degree of the major scale, 0-6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Degree {
    Tonic = 0,
    Supertonic = 1,
    Mediant = 2,
    Subdominant = 3,
    Dominant = 4,
    Submediant = 5,
    LeadingTone = 6,
}

impl Degree {
    pub const ALL: [Degree; 7] = [
        Degree::Tonic,
        Degree::Supertonic,
        Degree::Mediant,
        Degree::Subdominant,
        Degree::Dominant,
        Degree::Submediant,
        Degree::LeadingTone,
    ];

    /// Returns `None` if the index is > 6.
    pub const fn from_index(index: u8) -> Option<Degree> {
        if index < 7 {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Equal-tempered distance from the tonic.
    pub const fn semitones(self) -> i32 {
        MAJOR_SCALE_SEMITONES[self as usize]
    }

    /// Degree whose semitone distance is exactly `semitones` (mod 12), if diatonic.
    pub fn from_semitones(semitones: i32) -> Option<Degree> {
        let semitones = semitones.rem_euclid(12);
        Self::ALL.into_iter().find(|d| d.semitones() == semitones)
    }
}

pub(crate) const MAJOR_SCALE_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// 5-limit just intonation.
static DIATONIC: [Ratio; 7] = [
    Ratio::UNISON,                    // 1/1
    Ratio::from_const(9.0 / 8.0),     // 9/8
    Ratio::from_const(5.0 / 4.0),     // 5/4
    Ratio::from_const(4.0 / 3.0),     // 4/3
    Ratio::from_const(3.0 / 2.0),     // 3/2
    Ratio::from_const(5.0 / 3.0),     // 5/3
    Ratio::from_const(15.0 / 8.0),    // 15/8
];

/// Stacked pure fifths reduced to one octave.
static PYTHAGOREAN: [Ratio; 7] = [
    Ratio::UNISON,                    // 1/1
    Ratio::from_const(9.0 / 8.0),     // 9/8
    Ratio::from_const(81.0 / 64.0),   // 81/64
    Ratio::from_const(4.0 / 3.0),     // 4/3
    Ratio::from_const(3.0 / 2.0),     // 3/2
    Ratio::from_const(27.0 / 16.0),   // 27/16
    Ratio::from_const(243.0 / 128.0), // 243/128
];

/// 2^(n/12) for the major-scale semitone distances.
static EQUAL_TEMPERAMENT: [Ratio; 7] = [
    Ratio::UNISON,
    Ratio::from_const(1.122_462_048_309_373),
    Ratio::from_const(1.259_921_049_894_873_2),
    Ratio::from_const(1.334_839_854_170_034_4),
    Ratio::from_const(1.498_307_076_876_681_5),
    Ratio::from_const(1.681_792_830_507_429),
    Ratio::from_const(1.887_748_625_363_387),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntonationSystem {
    /// Just intonation with small-integer ratios.
    #[default]
    Diatonic,
    Pythagorean,
    EqualTemperament,
}

impl IntonationSystem {
    pub const ALL: [IntonationSystem; 3] = [
        IntonationSystem::Diatonic,
        IntonationSystem::Pythagorean,
        IntonationSystem::EqualTemperament,
    ];

    /// Catalog name.
    pub const fn name(self) -> &'static str {
        match self {
            IntonationSystem::Diatonic => "diatonic",
            IntonationSystem::Pythagorean => "pythagorean",
            IntonationSystem::EqualTemperament => "equaltemperament",
        }
    }

    pub fn table(self) -> &'static [Ratio; 7] {
        match self {
            IntonationSystem::Diatonic => &DIATONIC,
            IntonationSystem::Pythagorean => &PYTHAGOREAN,
            IntonationSystem::EqualTemperament => &EQUAL_TEMPERAMENT,
        }
    }
}

impl fmt::Display for IntonationSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ratio of `degree` above the tonic.
#[inline]
pub fn ratio(degree: Degree, system: IntonationSystem) -> Ratio {
    system.table()[degree as usize]
}

/// How far `degree` sits from its equal-tempered counterpart.
#[inline]
pub fn deviation(degree: Degree, system: IntonationSystem) -> Ratio {
    if system == IntonationSystem::EqualTemperament {
        return Ratio::UNISON;
    }
    ratio(degree, system) * Ratio::from_semitones(degree.semitones() as f64).inverse()
}

//! Frequency ratios and cents.

use std::fmt;
use std::ops::Mul;

use serde::{Deserialize, Serialize};

pub const CENTS_PER_OCTAVE: f64 = 1200.0;
pub const CENTS_PER_SEMITONE: f64 = 100.0;

/// Positive frequency ratio between two pitches.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Ratio(f64);

impl Ratio {
    pub const UNISON: Ratio = Ratio(1.0);
    pub const OCTAVE: Ratio = Ratio(2.0);

    /// For static tables; the caller guarantees a positive finite value.
    pub(crate) const fn from_const(value: f64) -> Self {
        Ratio(value)
    }

    /// Non-finite or non-positive input collapses to unison.
    pub fn from_float(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Ratio(value)
        } else {
            Ratio::UNISON
        }
    }

    pub fn from_fraction(numerator: u32, denominator: u32) -> Self {
        Self::from_float(numerator as f64 / denominator as f64)
    }

    pub fn from_cents(cents: f64) -> Self {
        Self::from_float(2f64.powf(cents / CENTS_PER_OCTAVE))
    }

    /// Ratio of `semitones` equal-tempered semitones.
    pub fn from_semitones(semitones: f64) -> Self {
        Self::from_cents(semitones * CENTS_PER_SEMITONE)
    }

    pub fn as_float(self) -> f64 {
        self.0
    }

    pub fn as_cents(self) -> f64 {
        self.0.log2() * CENTS_PER_OCTAVE
    }

    pub fn inverse(self) -> Self {
        Ratio(1.0 / self.0)
    }

    /// Folds the ratio into `[1, 2)`. Values within a hair of the octave fold to unison.
    pub fn reduce_to_octave(self) -> Self {
        let cents = self.as_cents().rem_euclid(CENTS_PER_OCTAVE);
        if CENTS_PER_OCTAVE - cents < 1e-6 || cents < 1e-9 {
            Ratio::UNISON
        } else {
            Ratio::from_cents(cents)
        }
    }

    pub fn approx_eq(self, other: Ratio, tolerance_cents: f64) -> bool {
        (self.as_cents() - other.as_cents()).abs() <= tolerance_cents
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Ratio::UNISON
    }
}

impl Mul for Ratio {
    type Output = Ratio;

    fn mul(self, rhs: Ratio) -> Ratio {
        Ratio(self.0 * rhs.0)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} ({:+.2}c)", self.0, self.as_cents())
    }
}

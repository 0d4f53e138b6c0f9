//! 14-bit pitch-bend codec.
//!
//! Bend values are scaled against the channel's pitch-bend range: the full
//! signed span `-0x2000..=0x1FFF` covers `-range..+range`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Raw value with no bend applied.
pub const BEND_CENTER: u16 = 0x2000;
/// Largest raw 14-bit value.
pub const BEND_MAX: u16 = 0x3FFF;

const BEND_SCALE: f64 = 8192.0;

/// Pitch-bend range as set through RPN 0/0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitchBendRange {
    pub semitones: u8,
    pub cents: u8,
}

impl PitchBendRange {
    /// Standard non-MPE default
    pub const DEFAULT: PitchBendRange = PitchBendRange {
        semitones: 2,
        cents: 0,
    };

    /// Both fields are masked to 7 bits; cents above 99 are clamped.
    pub fn new(semitones: u8, cents: u8) -> Self {
        Self {
            semitones: semitones & 0x7F,
            cents: cents.min(99),
        }
    }

    /// Checks a range that did not come through [`new`](Self::new), e.g. a
    /// deserialized one. Both values go out as 7-bit data bytes.
    pub fn validate(self) -> Result<Self> {
        if self.semitones > 0x7F || self.cents > 99 {
            return Err(Error::InvalidRange {
                semitones: self.semitones,
                cents: self.cents,
            });
        }
        Ok(self)
    }

    pub fn semitones(semitones: u8) -> Self {
        Self::new(semitones, 0)
    }

    pub fn total_cents(self) -> f64 {
        self.semitones as f64 * 100.0 + self.cents as f64
    }
}

impl Default for PitchBendRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PitchBendRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "±{} semitones {} cents", self.semitones, self.cents)
    }
}

/// Non-fatal report: the requested deviation did not fit the range and was clamped.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("bend of {requested_cents:+.2} cents exceeds pitch-bend range {range}")]
pub struct BendRangeExceeded {
    pub requested_cents: f64,
    pub range: PitchBendRange,
    pub clamped_to: PitchBend,
}

/// Unsigned 14-bit pitch-bend value (0-16383, 0x2000 = center).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitchBend(u16);

impl PitchBend {
    pub const CENTER: PitchBend = PitchBend(BEND_CENTER);

    /// Values above 0x3FFF are clamped.
    pub fn from_raw(raw: u16) -> Self {
        PitchBend(raw.min(BEND_MAX))
    }

    /// `value`: signed 14-bit (-8192 to 8191), clamped.
    pub fn from_signed(value: i32) -> Self {
        PitchBend((value + BEND_CENTER as i32).clamp(0, BEND_MAX as i32) as u16)
    }

    /// Encodes a deviation in cents. Deviations wider than `range` are clamped
    /// and reported.
    pub fn from_cents(cents: f64, range: PitchBendRange) -> (Self, Option<BendRangeExceeded>) {
        let range_cents = range.total_cents();
        let scaled = if range_cents > 0.0 {
            (cents / range_cents * BEND_SCALE).round()
        } else if cents == 0.0 {
            0.0
        } else {
            cents.signum() * BEND_SCALE
        };

        let bend = PitchBend::from_signed(scaled.clamp(-BEND_SCALE, BEND_SCALE) as i32);
        let exceeded = (cents.abs() > range_cents + 1e-9).then_some(BendRangeExceeded {
            requested_cents: cents,
            range,
            clamped_to: bend,
        });
        (bend, exceeded)
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    /// Signed view, -8192 to 8191.
    pub fn signed(self) -> i16 {
        self.0 as i16 - BEND_CENTER as i16
    }

    pub fn lsb(self) -> u8 {
        (self.0 & 0x7F) as u8
    }

    pub fn msb(self) -> u8 {
        ((self.0 >> 7) & 0x7F) as u8
    }

    pub fn from_lsb_msb(lsb: u8, msb: u8) -> Self {
        PitchBend::from_raw(((msb as u16 & 0x7F) << 7) | (lsb as u16 & 0x7F))
    }

    pub fn is_center(self) -> bool {
        self.0 == BEND_CENTER
    }

    /// Deviation this value produces under `range`.
    pub fn to_cents(self, range: PitchBendRange) -> f64 {
        self.signed() as f64 / BEND_SCALE * range.total_cents()
    }

    /// Frequency ratio this value produces under `range`.
    pub fn to_ratio(self, range: PitchBendRange) -> f64 {
        2f64.powf(self.to_cents(range) / 1200.0)
    }
}

impl Default for PitchBend {
    fn default() -> Self {
        PitchBend::CENTER
    }
}

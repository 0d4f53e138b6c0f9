//! Tolerance constants for tuning tests.

/// Ratios built from exact fractions.
pub const RATIO_EPSILON: f64 = 1e-9;

/// Cents computed from ratios (log2 rounding).
pub const CENTS_EPSILON: f64 = 1e-6;

/// Bend encode/decode round-trip. One bend step at a 2-semitone range is
/// about 0.024 cents, so a cent is generous.
pub const BEND_ROUND_TRIP_CENTS: f64 = 1.0;

//! Channel sets and per-channel pitch state.

use serde::{Deserialize, Serialize};

use crate::bend::{PitchBend, PitchBendRange};
use crate::error::{Error, Result};

pub const NUM_CHANNELS: u8 = 16;
/// General MIDI percussion (channel 10, 0-indexed 9). Never retuned.
pub const PERCUSSION_CHANNEL: u8 = 9;

/// Set of MIDI channels (0-15) stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelSet(u16);

impl ChannelSet {
    pub const fn empty() -> Self {
        ChannelSet(0)
    }

    /// Every channel except percussion.
    pub const fn retuning() -> Self {
        ChannelSet(0xFFFF & !(1 << PERCUSSION_CHANNEL))
    }

    /// Fails on channels above 15 or on the percussion channel.
    pub fn from_channels(channels: impl IntoIterator<Item = u8>) -> Result<Self> {
        let mut set = ChannelSet::empty();
        for channel in channels {
            if channel >= NUM_CHANNELS {
                return Err(Error::InvalidChannel(channel));
            }
            if channel == PERCUSSION_CHANNEL {
                return Err(Error::ReservedChannel(channel));
            }
            set.0 |= 1 << channel;
        }
        Ok(set)
    }

    #[inline]
    pub fn contains(&self, channel: u8) -> bool {
        channel < NUM_CHANNELS && self.0 & (1 << channel) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..NUM_CHANNELS).filter(move |ch| self.contains(*ch))
    }

    /// Validates that `channel` may be retuned.
    pub fn check(&self, channel: u8) -> Result<()> {
        if channel >= NUM_CHANNELS {
            Err(Error::InvalidChannel(channel))
        } else if !self.contains(channel) {
            Err(Error::ReservedChannel(channel))
        } else {
            Ok(())
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::retuning()
    }
}

/// Bend state of one MIDI channel as last sent to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPitchState {
    pub bend: PitchBend,
    pub range: PitchBendRange,
    /// Whether `range` has been sent through RPN since it was last changed.
    pub range_sent: bool,
    /// False once `bend` may not have reached the device.
    pub bend_sent: bool,
}

impl ChannelPitchState {
    pub fn new(range: PitchBendRange) -> Self {
        Self {
            bend: PitchBend::CENTER,
            range,
            range_sent: false,
            bend_sent: true,
        }
    }
}

impl Default for ChannelPitchState {
    fn default() -> Self {
        Self::new(PitchBendRange::DEFAULT)
    }
}

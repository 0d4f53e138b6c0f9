//! Serializable engine configuration.

use serde::{Deserialize, Serialize};

use retune_core::IntonationSystem;
use retune_midi::{ChannelSet, PitchBendRange};

/// Settings an engine is built from. Channels and the pitch-bend range are
/// validated when the engine is built, not when the config is deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetuneConfig {
    pub system: IntonationSystem,
    pub pitch_bend_range: PitchBendRange,
    /// 0-indexed; channel 9 is reserved for percussion.
    pub channels: Vec<u8>,
}

impl Default for RetuneConfig {
    fn default() -> Self {
        Self {
            system: IntonationSystem::default(),
            pitch_bend_range: PitchBendRange::DEFAULT,
            channels: ChannelSet::retuning().iter().collect(),
        }
    }
}

impl RetuneConfig {
    pub fn channel_set(&self) -> retune_midi::Result<ChannelSet> {
        let set = ChannelSet::from_channels(self.channels.iter().copied())?;
        if set.is_empty() {
            return Err(retune_midi::Error::NoChannels);
        }
        Ok(set)
    }
}

//! Outgoing MIDI channel messages.

use midi_msg::{Channel, ChannelVoiceMsg, MidiMsg};
use smallvec::{smallvec, SmallVec};

use crate::bend::PitchBend;
use crate::error::{Error, Result};

pub const STATUS_NOTE_OFF: u8 = 0x80;
pub const STATUS_NOTE_ON: u8 = 0x90;
pub const STATUS_CONTROL_CHANGE: u8 = 0xB0;
pub const STATUS_PITCH_BEND: u8 = 0xE0;

/// Raw bytes of one MIDI message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiOutputMessage {
    pub bytes: SmallVec<[u8; 3]>,
}

impl MidiOutputMessage {
    pub fn control_change(channel: u8, cc_number: u8, value: u8) -> Self {
        let channel = channel.min(15); // MIDI channels are 0-15
        Self {
            bytes: smallvec![STATUS_CONTROL_CHANGE | channel, cc_number & 0x7F, value & 0x7F],
        }
    }

    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        let channel = channel.min(15);
        Self {
            bytes: smallvec![STATUS_NOTE_ON | channel, note & 0x7F, velocity & 0x7F],
        }
    }

    pub fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        let channel = channel.min(15);
        Self {
            bytes: smallvec![STATUS_NOTE_OFF | channel, note & 0x7F, velocity & 0x7F],
        }
    }

    pub fn pitch_bend(channel: u8, bend: PitchBend) -> Self {
        let channel = channel.min(15);
        Self {
            bytes: smallvec![STATUS_PITCH_BEND | channel, bend.lsb(), bend.msb()],
        }
    }

    pub fn from_msg(msg: &MidiMsg) -> Self {
        Self {
            bytes: msg.to_midi().into_iter().collect(),
        }
    }

    pub fn channel_voice(channel: u8, msg: ChannelVoiceMsg) -> Self {
        Self::from_msg(&MidiMsg::ChannelVoice {
            channel: Channel::from_u8(channel.min(15)),
            msg,
        })
    }

    /// Decodes the bytes back into a structured message.
    pub fn to_msg(&self) -> Result<MidiMsg> {
        MidiMsg::from_midi(&self.bytes)
            .map(|(msg, _len)| msg)
            .map_err(|e| Error::Parse(format!("{e:?}")))
    }

    pub fn status(&self) -> u8 {
        self.bytes.first().copied().unwrap_or(0) & 0xF0
    }

    pub fn channel(&self) -> u8 {
        self.bytes.first().copied().unwrap_or(0) & 0x0F
    }

    pub fn is_pitch_bend(&self) -> bool {
        self.status() == STATUS_PITCH_BEND
    }

    pub fn is_control_change(&self) -> bool {
        self.status() == STATUS_CONTROL_CHANGE
    }

    /// Bend value carried by a pitch-bend message.
    pub fn bend(&self) -> Option<PitchBend> {
        match self.bytes.as_slice() {
            [status, lsb, msb] if status & 0xF0 == STATUS_PITCH_BEND => {
                Some(PitchBend::from_lsb_msb(*lsb, *msb))
            }
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<&MidiMsg> for MidiOutputMessage {
    fn from(msg: &MidiMsg) -> Self {
        Self::from_msg(msg)
    }
}

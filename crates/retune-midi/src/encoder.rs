//! Pitch protocol encoder.
//!
//! Turns a deviation from equal temperament into the messages that make a
//! channel sound at that deviation, tracking what each channel was last sent
//! so redundant RPN and bend messages are skipped.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::bend::{BendRangeExceeded, PitchBend, PitchBendRange};
use crate::channel::{ChannelPitchState, ChannelSet, NUM_CHANNELS};
use crate::error::Result;
use crate::message::MidiOutputMessage;
use crate::rpn;

/// Messages produced for one retune request.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub channel: u8,
    pub bend: PitchBend,
    /// RPN range sequence (if due) followed by the bend (if changed).
    pub messages: SmallVec<[MidiOutputMessage; 8]>,
    pub exceeded: Option<BendRangeExceeded>,
}

#[derive(Debug)]
pub struct PitchEncoder {
    states: [ChannelPitchState; NUM_CHANNELS as usize],
    channels: ChannelSet,
}

impl PitchEncoder {
    pub fn new(channels: ChannelSet, range: PitchBendRange) -> Self {
        Self {
            states: [ChannelPitchState::new(range); NUM_CHANNELS as usize],
            channels,
        }
    }

    pub fn channels(&self) -> ChannelSet {
        self.channels
    }

    pub fn state(&self, channel: u8) -> Option<&ChannelPitchState> {
        self.channels
            .contains(channel)
            .then(|| &self.states[channel as usize])
    }

    /// Changes the range of `channel`; the RPN sequence goes out with its next bend.
    pub fn set_range(&mut self, channel: u8, range: PitchBendRange) -> Result<()> {
        self.channels.check(channel)?;
        let state = &mut self.states[channel as usize];
        if state.range != range {
            state.range = range;
            state.range_sent = false;
        }
        Ok(())
    }

    /// Bends `channel` by `deviation_cents` from its equal-tempered pitch.
    pub fn retune(&mut self, channel: u8, deviation_cents: f64) -> Result<Encoded> {
        self.channels.check(channel)?;
        let state = &mut self.states[channel as usize];
        let mut messages = SmallVec::new();

        if !state.range_sent {
            debug!(channel, range = %state.range, "Sending pitch-bend range");
            messages.extend(rpn::pitch_bend_range(channel, state.range));
            state.range_sent = true;
        }

        let (bend, exceeded) = PitchBend::from_cents(deviation_cents, state.range);
        if let Some(report) = &exceeded {
            warn!(channel, %report, "Bend clamped");
        }

        if bend != state.bend || !state.bend_sent {
            messages.push(MidiOutputMessage::pitch_bend(channel, bend));
            state.bend = bend;
            state.bend_sent = true;
        }

        Ok(Encoded {
            channel,
            bend,
            messages,
            exceeded,
        })
    }

    /// Forgets what `channel` was sent, so its next retune resends the range
    /// and the bend. For output that was dropped before reaching the device.
    pub fn invalidate(&mut self, channel: u8) -> Result<()> {
        self.channels.check(channel)?;
        let state = &mut self.states[channel as usize];
        state.range_sent = false;
        state.bend_sent = false;
        Ok(())
    }

    /// Centers `channel`. Returns the bend message if it was off-center.
    pub fn reset_channel(&mut self, channel: u8) -> Result<Option<MidiOutputMessage>> {
        self.channels.check(channel)?;
        let state = &mut self.states[channel as usize];
        if state.bend.is_center() && state.bend_sent {
            return Ok(None);
        }
        state.bend = PitchBend::CENTER;
        state.bend_sent = true;
        Ok(Some(MidiOutputMessage::pitch_bend(channel, PitchBend::CENTER)))
    }

    /// Centers every off-center channel and forgets the sent ranges.
    pub fn shutdown(&mut self) -> Vec<MidiOutputMessage> {
        let mut messages = Vec::new();
        for channel in self.channels.iter() {
            let state = &mut self.states[channel as usize];
            if !state.bend.is_center() || !state.bend_sent {
                messages.push(MidiOutputMessage::pitch_bend(channel, PitchBend::CENTER));
            }
            state.bend = PitchBend::CENTER;
            state.bend_sent = true;
            state.range_sent = false;
        }
        debug!(centered = messages.len(), "Encoder shut down");
        messages
    }
}

//! MIDI pitch protocol encoder for retuning.
//!
//! Converts deviations from equal temperament into per-channel pitch-bend
//! messages, preceded by the RPN sequence that sets each channel's
//! pitch-bend range.
//!
//! # Example
//!
//! ```
//! use retune_midi::{ChannelSet, PitchBendRange, PitchEncoder};
//!
//! let mut encoder = PitchEncoder::new(ChannelSet::retuning(), PitchBendRange::DEFAULT);
//!
//! // A just major third sits ~13.7 cents below equal temperament
//! let encoded = encoder.retune(0, -13.686)?;
//! assert_eq!(encoded.messages.len(), 7); // RPN range (6) + pitch bend
//! # Ok::<(), retune_midi::Error>(())
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod allocator;
pub mod bend;
pub mod channel;
pub mod encoder;
pub mod message;
pub mod output;
pub mod rpn;

pub use allocator::{Assignment, ChannelAllocator};
pub use bend::{BendRangeExceeded, PitchBend, PitchBendRange, BEND_CENTER, BEND_MAX};
pub use channel::{ChannelPitchState, ChannelSet, NUM_CHANNELS, PERCUSSION_CHANNEL};
pub use encoder::{Encoded, PitchEncoder};
pub use message::MidiOutputMessage;
pub use output::{
    midi_output_channel, midi_output_channel_with_capacity, MidiOutputConsumer,
    MidiOutputProducer,
};

// Re-export essential upstream types (users shouldn't need to import midi-msg directly)
pub use midi_msg::{Channel, ChannelVoiceMsg, MidiMsg};

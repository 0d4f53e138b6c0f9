//! Registered Parameter Number sequences.

use crate::bend::PitchBendRange;
use crate::message::MidiOutputMessage;

pub const CC_RPN_MSB: u8 = 0x65;
pub const CC_RPN_LSB: u8 = 0x64;
pub const CC_DATA_ENTRY_MSB: u8 = 0x06;
pub const CC_DATA_ENTRY_LSB: u8 = 0x26;

/// Parameter 0x00/0x00 selects pitch-bend sensitivity.
pub const RPN_PITCH_BEND_RANGE: (u8, u8) = (0x00, 0x00);
/// Parameter 0x7F/0x7F deselects, so later data entry is ignored.
pub const RPN_NULL: (u8, u8) = (0x7F, 0x7F);

pub const PITCH_BEND_RANGE_SEQUENCE_LEN: usize = 6;

/// Select parameter, enter data, then deselect.
pub fn rpn_sequence(
    channel: u8,
    parameter: (u8, u8),
    data_msb: u8,
    data_lsb: u8,
) -> [MidiOutputMessage; PITCH_BEND_RANGE_SEQUENCE_LEN] {
    [
        MidiOutputMessage::control_change(channel, CC_RPN_MSB, parameter.0),
        MidiOutputMessage::control_change(channel, CC_RPN_LSB, parameter.1),
        MidiOutputMessage::control_change(channel, CC_DATA_ENTRY_MSB, data_msb),
        MidiOutputMessage::control_change(channel, CC_DATA_ENTRY_LSB, data_lsb),
        MidiOutputMessage::control_change(channel, CC_RPN_MSB, RPN_NULL.0),
        MidiOutputMessage::control_change(channel, CC_RPN_LSB, RPN_NULL.1),
    ]
}

/// Sets the pitch-bend range of `channel`.
pub fn pitch_bend_range(
    channel: u8,
    range: PitchBendRange,
) -> [MidiOutputMessage; PITCH_BEND_RANGE_SEQUENCE_LEN] {
    rpn_sequence(channel, RPN_PITCH_BEND_RANGE, range.semitones, range.cents)
}

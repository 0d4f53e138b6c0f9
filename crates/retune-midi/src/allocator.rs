//! One-note-per-channel allocation.
//!
//! Pitch bend applies to a whole channel, so every sounding note gets a
//! channel of its own. Retuning a newly struck note then never moves a note
//! that is already sounding.

use crate::channel::{ChannelSet, NUM_CHANNELS};

/// Result of assigning a channel to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub channel: u8,
    /// Note that was playing on the channel and must be stopped first.
    pub stolen: Option<u8>,
    /// The note was already sounding on this channel.
    pub retriggered: bool,
}

#[derive(Debug)]
pub struct ChannelAllocator {
    channels: Vec<u8>,
    /// Channel (0-15) → Note number (or None if unused)
    channel_to_note: [Option<u8>; NUM_CHANNELS as usize],
    /// Note number → Channel (or None if not playing)
    note_to_channel: [Option<u8>; 128],
    /// Round-robin index into `channels`
    next_index: usize,
    /// Assignment order per channel; the smallest busy stamp is stolen first
    assigned_at: [u64; NUM_CHANNELS as usize],
    clock: u64,
}

impl ChannelAllocator {
    pub fn new(channels: ChannelSet) -> Self {
        Self {
            channels: channels.iter().collect(),
            channel_to_note: [None; NUM_CHANNELS as usize],
            note_to_channel: [None; 128],
            next_index: 0,
            assigned_at: [0; NUM_CHANNELS as usize],
            clock: 0,
        }
    }

    /// Returns `None` only when there are no channels or the note is > 127.
    pub fn assign(&mut self, note: u8) -> Option<Assignment> {
        if note >= 128 || self.channels.is_empty() {
            return None;
        }

        if let Some(channel) = self.note_to_channel[note as usize] {
            return Some(Assignment {
                channel,
                stolen: None,
                retriggered: true,
            });
        }

        let count = self.channels.len();
        for offset in 0..count {
            let index = (self.next_index + offset) % count;
            let channel = self.channels[index];
            if self.channel_to_note[channel as usize].is_none() {
                self.bind(channel, note);
                self.next_index = (index + 1) % count;
                return Some(Assignment {
                    channel,
                    stolen: None,
                    retriggered: false,
                });
            }
        }

        // All busy: steal the channel assigned longest ago
        let index = (0..count).min_by_key(|&i| self.assigned_at[self.channels[i] as usize])?;
        let channel = self.channels[index];
        let stolen = self.channel_to_note[channel as usize].take();
        if let Some(old_note) = stolen {
            self.note_to_channel[old_note as usize] = None;
        }
        self.bind(channel, note);
        self.next_index = (index + 1) % count;
        Some(Assignment {
            channel,
            stolen,
            retriggered: false,
        })
    }

    /// Frees the channel holding `note`.
    pub fn release(&mut self, note: u8) -> Option<u8> {
        if note >= 128 {
            return None;
        }
        let channel = self.note_to_channel[note as usize].take()?;
        self.channel_to_note[channel as usize] = None;
        Some(channel)
    }

    #[inline]
    pub fn channel_for_note(&self, note: u8) -> Option<u8> {
        self.note_to_channel.get(note as usize).copied().flatten()
    }

    #[inline]
    pub fn note_for_channel(&self, channel: u8) -> Option<u8> {
        self.channel_to_note.get(channel as usize).copied().flatten()
    }

    /// Notes currently holding a channel, with their channel.
    pub fn active(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.channels
            .iter()
            .filter_map(|&ch| self.channel_to_note[ch as usize].map(|note| (note, ch)))
    }

    pub fn clear(&mut self) {
        self.channel_to_note = [None; NUM_CHANNELS as usize];
        self.note_to_channel = [None; 128];
        self.next_index = 0;
    }

    fn bind(&mut self, channel: u8, note: u8) {
        self.clock += 1;
        self.assigned_at[channel as usize] = self.clock;
        self.channel_to_note[channel as usize] = Some(note);
        self.note_to_channel[note as usize] = Some(channel);
    }
}

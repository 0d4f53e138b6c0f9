//! Bounded hand-off of MIDI output to a transport thread.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::debug;

use crate::message::MidiOutputMessage;

const DEFAULT_CAPACITY: usize = 1024;

/// Producer side -- push messages from the retuning thread.
#[derive(Clone)]
pub struct MidiOutputProducer {
    sender: Sender<MidiOutputMessage>,
}

impl MidiOutputProducer {
    /// Returns `false` if the channel is full or the consumer is gone.
    #[inline]
    pub fn push(&self, message: MidiOutputMessage) -> bool {
        match self.sender.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("MIDI output channel full, message dropped");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Returns how many messages were queued before the first failure.
    pub fn push_all(&self, messages: impl IntoIterator<Item = MidiOutputMessage>) -> usize {
        let mut sent = 0;
        for message in messages {
            if !self.push(message) {
                break;
            }
            sent += 1;
        }
        sent
    }
}

/// Consumer side -- drain messages on the transport thread.
pub struct MidiOutputConsumer {
    receiver: Receiver<MidiOutputMessage>,
}

impl MidiOutputConsumer {
    #[inline]
    pub fn pop(&self) -> Option<MidiOutputMessage> {
        self.receiver.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<MidiOutputMessage> {
        self.receiver.recv_timeout(timeout).ok()
    }

    pub fn drain_all(&self) -> Vec<MidiOutputMessage> {
        self.receiver.try_iter().collect()
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

pub fn midi_output_channel() -> (MidiOutputProducer, MidiOutputConsumer) {
    midi_output_channel_with_capacity(DEFAULT_CAPACITY)
}

pub fn midi_output_channel_with_capacity(
    capacity: usize,
) -> (MidiOutputProducer, MidiOutputConsumer) {
    let (sender, receiver) = bounded(capacity);
    (
        MidiOutputProducer { sender },
        MidiOutputConsumer { receiver },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain() {
        let (producer, consumer) = midi_output_channel();
        assert!(producer.push(MidiOutputMessage::note_on(0, 60, 100)));
        assert!(producer.push(MidiOutputMessage::note_off(0, 60, 0)));
        assert_eq!(consumer.pending_count(), 2);

        let drained = consumer.drain_all();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].as_bytes(), &[0x90, 60, 100]);
        assert!(!consumer.has_pending());
    }

    #[test]
    fn test_full_channel_drops() {
        let (producer, consumer) = midi_output_channel_with_capacity(2);
        let sent = producer.push_all((0..4).map(|n| MidiOutputMessage::note_on(0, 60 + n, 100)));
        assert_eq!(sent, 2);
        assert_eq!(consumer.pop().unwrap().as_bytes()[1], 60);
    }

    #[test]
    fn test_disconnected_consumer() {
        let (producer, consumer) = midi_output_channel();
        drop(consumer);
        assert!(!producer.push(MidiOutputMessage::note_on(0, 60, 100)));
    }

    #[test]
    fn test_cross_thread() {
        let (producer, consumer) = midi_output_channel();
        let handle = std::thread::spawn(move || {
            producer.push(MidiOutputMessage::note_on(1, 62, 90));
        });
        handle.join().unwrap();
        let msg = consumer.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(msg.channel(), 1);
    }
}

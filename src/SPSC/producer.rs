// In src/SPSC/producer.rs
use crate::SPSC::Buffer::{Roles, TripleBuffer};
use crate::SPSC::Structs::Buffer_Structs::Message;
use std::sync::Arc;

/// The writing end of a link.
///
/// There is exactly one producer per link: it is not `Clone`, and every
/// operation that touches the write slot takes `&mut self`. The sequence
/// counter lives here, outside the rotation lock, which is sound only under
/// that single-producer guarantee.
pub struct Producer<T: Message> {
    pub(crate) shared: Arc<TripleBuffer<T>>,
    write_idx: usize,
    last_sequence: u64,
}

impl<T: Message> Producer<T> {
    pub(crate) fn new(shared: Arc<TripleBuffer<T>>, write_idx: usize) -> Self {
        Self {
            shared,
            write_idx,
            last_sequence: 0,
        }
    }

    /// Returns the payload to fill for the next commit.
    ///
    /// The same instance is returned until [`commit`](Self::commit) is called.
    /// It holds whatever the payload's `merge_forward` carried over plus
    /// stale data from two rotations ago, so fields that are not merged must
    /// be overwritten before committing.
    #[inline]
    pub fn acquire_write(&mut self) -> &mut T {
        // Safety: `write_idx` is bound to `write` and only this handle uses it.
        unsafe { &mut self.shared.slot_mut(self.write_idx).payload }
    }

    /// Publishes the current write payload as the latest message.
    ///
    /// Never waits for the consumer; a previous commit that was not claimed
    /// yet is silently superseded. Returns the sequence number assigned to
    /// this commit.
    pub fn commit(&mut self) -> u64 {
        self.last_sequence += 1;
        let sequence = self.last_sequence;

        // Safety: single producer, and the borrow from `acquire_write` has
        // ended since we hold `&mut self`.
        self.write_idx = unsafe { self.shared.publish(self.write_idx, sequence) };

        log::trace!(
            "link {}: committed #{} (write slot now {})",
            self.shared.name(),
            sequence,
            self.write_idx
        );
        sequence
    }

    /// Sequence number of the most recent commit, 0 before the first one.
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Signals the consumer that no more messages will follow.
    pub fn close(&self) {
        self.shared.close();
    }

    /// Returns true once either end has closed the link.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Returns a snapshot of which slot currently plays which role.
    pub fn roles(&self) -> Roles {
        self.shared.roles()
    }

    /// Returns the channel ID for this producer
    pub fn channel_id(&self) -> u32 {
        self.shared.channel_id()
    }

    pub fn name(&self) -> &str {
        self.shared.name()
    }

    pub(crate) fn write_idx(&self) -> usize {
        self.write_idx
    }
}

impl<T: Message> Drop for Producer<T> {
    fn drop(&mut self) {
        if self.shared.close_on_drop {
            self.shared.close();
        }
    }
}

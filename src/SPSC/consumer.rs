// src/SPSC/consumer.rs

use crate::SPSC::Buffer::{Roles, TripleBuffer};
use crate::SPSC::Structs::Buffer_Structs::Message;
use std::sync::Arc;

/// The reading end of a link.
///
/// Like the producer, there is exactly one consumer per link, and claiming
/// takes `&mut self` so a claimed payload cannot outlive the next claim.
pub struct Consumer<T: Message> {
    pub(crate) shared: Arc<TripleBuffer<T>>,
    read_idx: usize,
    read_sequence: u64,
    claimed: u64,
    skipped: u64,
}

impl<T: Message> Consumer<T> {
    pub(crate) fn new(shared: Arc<TripleBuffer<T>>, read_idx: usize) -> Self {
        Self {
            shared,
            read_idx,
            read_sequence: 0,
            claimed: 0,
            skipped: 0,
        }
    }

    /// Returns true when a commit newer than the currently held payload is
    /// waiting.
    ///
    /// Lock-free and advisory: by the time the caller acts on the answer the
    /// producer may have committed again, which only makes the pending
    /// message newer.
    #[inline]
    pub fn has_update(&self) -> bool {
        self.shared.middle_sequence() > self.read_sequence
    }

    /// Claims the latest committed payload, if there is one newer than the
    /// payload claimed last time.
    ///
    /// Returns `None` without taking any lock when nothing new was committed,
    /// so polling in a loop leaves the link untouched. Commits made since the
    /// previous claim other than the latest are never observed.
    pub fn try_claim(&mut self) -> Option<&mut T> {
        if !self.has_update() {
            return None;
        }

        // Safety: single consumer, and no reference into the read slot is
        // alive since we hold `&mut self`.
        let (read_idx, sequence) = unsafe { self.shared.claim(self.read_idx, self.read_sequence) };

        self.skipped += sequence - self.read_sequence - 1;
        self.claimed += 1;
        self.read_idx = read_idx;
        self.read_sequence = sequence;

        log::trace!(
            "link {}: claimed #{} (read slot now {})",
            self.shared.name(),
            sequence,
            read_idx
        );

        // Safety: `read_idx` is now bound to `read` and belongs to us.
        Some(unsafe { &mut self.shared.slot_mut(self.read_idx).payload })
    }

    /// Sequence number of the payload last claimed, 0 before the first claim.
    pub fn sequence(&self) -> u64 {
        self.read_sequence
    }

    /// Number of successful claims so far.
    pub fn claimed(&self) -> u64 {
        self.claimed
    }

    /// Number of commits that were superseded before they could be claimed.
    ///
    /// Commits still pending in the middle slot are not counted.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Tells the producer to stop.
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

    /// Returns the channel ID for this consumer
    pub fn channel_id(&self) -> u32 {
        self.shared.channel_id()
    }

    pub fn name(&self) -> &str {
        self.shared.name()
    }

    pub(crate) fn read_idx(&self) -> usize {
        self.read_idx
    }
}

impl<T: Message> Drop for Consumer<T> {
    fn drop(&mut self) {
        if self.shared.close_on_drop {
            self.shared.close();
        }
    }
}

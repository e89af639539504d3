use std::cell::UnsafeCell;
use std::sync::atomic::Ordering::{AcqRel, Acquire, Release};

use super::layout::{LinkControl, Roles};
use super::Buffer::{Slot, TripleBuffer};
use crate::SPSC::Structs::Buffer_Structs::Message;

impl<T: Message> TripleBuffer<T> {
    /// Wraps three freshly constructed payloads.
    ///
    /// Slot 0 starts as the write slot, slot 1 as middle, slot 2 as read.
    pub(crate) fn new(
        payloads: [T; 3],
        channel_id: u32,
        name: String,
        close_on_drop: bool,
    ) -> Self {
        Self {
            slots: payloads.map(|payload| UnsafeCell::new(Slot::new(payload))),
            control: LinkControl::new(),
            channel_id,
            name,
            close_on_drop,
        }
    }

    /// # Safety
    /// Caller must own `index` under the role table, or hold the rotation
    /// lock while `index` is the middle slot. No other reference to the slot
    /// may be live.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn slot_mut(&self, index: usize) -> &mut Slot<T> {
        &mut *self.slots[index].get()
    }

    /// # Safety
    /// Same contract as [`slot_mut`](Self::slot_mut), minus exclusivity
    /// towards other shared references.
    #[inline]
    pub(crate) unsafe fn slot(&self, index: usize) -> &Slot<T> {
        &*self.slots[index].get()
    }

    /// Publishes the write slot under `sequence` and hands back the index of
    /// the slot the producer should fill next.
    ///
    /// The freshly reused slot receives `merge_forward` from the one just
    /// committed before the lock is released.
    ///
    /// # Safety
    /// Must only be called by the single producer, with `write` being the
    /// index it currently owns.
    pub(crate) unsafe fn publish(&self, write: usize, sequence: u64) -> usize {
        // The write slot is producer-private until the swap below.
        self.slot_mut(write).sequence = sequence;

        let mut roles = self.control.roles.lock();
        debug_assert_eq!(roles.write, write, "producer lost track of its slot");
        roles.rotate_write();
        self.control.middle_sequence.store(sequence, Release);

        // Distinct indices: `roles` is a permutation.
        let committed = self.slot(roles.middle);
        let reused = self.slot_mut(roles.write);
        committed.payload.merge_forward(&mut reused.payload);

        roles.write
    }

    /// Sequence of the slot currently bound to `middle`.
    #[inline]
    pub(crate) fn middle_sequence(&self) -> u64 {
        self.control.middle_sequence.load(Acquire)
    }

    /// Swaps the middle slot with the consumer's read slot and returns the
    /// new read index together with its sequence.
    ///
    /// `read_sequence` is the sequence of the slot being given back; it
    /// becomes the published middle sequence so a following staleness check
    /// sees nothing new until the next commit.
    ///
    /// # Safety
    /// Must only be called by the single consumer, with `read` being the
    /// index it currently owns and no reference into that slot still alive.
    pub(crate) unsafe fn claim(&self, read: usize, read_sequence: u64) -> (usize, u64) {
        let mut roles = self.control.roles.lock();
        debug_assert_eq!(roles.read, read, "consumer lost track of its slot");
        roles.rotate_read();
        self.control.middle_sequence.store(read_sequence, Release);

        let claimed = roles.read;
        (claimed, self.slot(claimed).sequence)
    }

    /// Snapshot of the role table, taken under the rotation lock.
    pub(crate) fn roles(&self) -> Roles {
        *self.control.roles.lock()
    }

    /// Sets the closed flag. Returns `true` only for the call that closed it.
    pub(crate) fn close(&self) -> bool {
        let was_closed = self.control.closed.swap(true, AcqRel);
        if !was_closed {
            log::debug!("link {} ({}): closed", self.name, self.channel_id);
        }
        !was_closed
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.control.closed.load(Acquire)
    }

    pub(crate) fn channel_id(&self) -> u32 {
        self.channel_id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

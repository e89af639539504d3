// The three payload slots shared by a producer and a consumer

use super::layout::{LinkControl, SLOT_COUNT};

use std::cell::UnsafeCell;

/// One payload instance together with the sequence number it was committed
/// under.
///
/// The sequence is assigned by the link on commit and is read-only for
/// application code. A slot that was never committed has sequence 0.
pub(crate) struct Slot<T> {
    pub(crate) sequence: u64,
    pub(crate) payload: T,
}

impl<T> Slot<T> {
    pub(crate) fn new(payload: T) -> Self {
        Self {
            sequence: 0,
            payload,
        }
    }
}

/// The storage behind one link: three slots plus the control block that says
/// who owns which.
///
/// ### Ownership Design:
/// - **Write slot**: only the [`Producer`](crate::SPSC::Producer) touches it,
///   through the index it caches locally.
/// - **Read slot**: only the [`Consumer`](crate::SPSC::Consumer) touches it,
///   likewise.
/// - **Middle slot**: touched only by whichever side holds the rotation lock.
///
/// Slots are never moved or reallocated; a rotation rewrites indices in the
/// role table and nothing else.
pub(crate) struct TripleBuffer<T> {
    pub(crate) slots: [UnsafeCell<Slot<T>>; SLOT_COUNT],

    pub(crate) control: LinkControl,

    /// Numeric identifier chosen at build time.
    pub(crate) channel_id: u32,

    /// Label used in log lines.
    pub(crate) name: String,

    /// Whether dropping either end closes the link.
    pub(crate) close_on_drop: bool,
}

// Access to each slot is partitioned by the role table (see above), so the
// buffer can be shared as long as the payload itself can be sent.
unsafe impl<T: Send> Send for TripleBuffer<T> {}
unsafe impl<T: Send> Sync for TripleBuffer<T> {}

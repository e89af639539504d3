use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64};

/// Number of payload slots backing one link.
pub const SLOT_COUNT: usize = 3;

/// Which slot currently plays which role.
///
/// Roles are never stored on the slots themselves. The table is the single
/// source of truth and is only rewritten under the rotation lock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Roles {
    /// Slot owned by the producer between commits.
    pub write: usize,
    /// Latest committed slot not yet claimed by the consumer.
    pub middle: usize,
    /// Slot owned by the consumer between claims.
    pub read: usize,
}

impl Roles {
    pub const INITIAL: Roles = Roles {
        write: 0,
        middle: 1,
        read: 2,
    };

    /// True when every slot holds exactly one role.
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; SLOT_COUNT];
        for index in [self.write, self.middle, self.read] {
            if index >= SLOT_COUNT || seen[index] {
                return false;
            }
            seen[index] = true;
        }
        true
    }

    /// Commit rotation: the filled write slot becomes the middle slot.
    #[inline]
    pub(crate) fn rotate_write(&mut self) {
        std::mem::swap(&mut self.write, &mut self.middle);
    }

    /// Claim rotation: the middle slot is handed to the consumer.
    #[inline]
    pub(crate) fn rotate_read(&mut self) {
        std::mem::swap(&mut self.middle, &mut self.read);
    }
}

impl Default for Roles {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Synchronization state shared by both ends of a link.
///
/// The role table and the published sequence are touched by both threads on
/// every rotation, so each sits on its own cache line. The closed flag is
/// polled once per loop iteration and rarely written.
pub(crate) struct LinkControl {
    /// The rotation lock. Held only while swapping roles and, on commit,
    /// while the payload's merge-forward hook runs.
    pub(crate) roles: CachePadded<Mutex<Roles>>,

    /// Sequence number of the slot currently bound to `middle`.
    /// Written under the rotation lock with `Release`, read lock-free with
    /// `Acquire` by the consumer's staleness check.
    pub(crate) middle_sequence: CachePadded<AtomicU64>,

    /// Cooperative shutdown flag. Set once, never cleared.
    pub(crate) closed: AtomicBool,
}

impl LinkControl {
    pub(crate) fn new() -> Self {
        Self {
            roles: CachePadded::new(Mutex::new(Roles::INITIAL)),
            middle_sequence: CachePadded::new(AtomicU64::new(0)),
            closed: AtomicBool::new(false),
        }
    }
}

impl Default for LinkControl {
    fn default() -> Self {
        Self::new()
    }
}

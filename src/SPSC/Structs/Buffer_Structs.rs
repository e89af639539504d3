// Payload contract for the triple buffer.

/// A payload that can travel through a link.
///
/// The link owns three instances of the payload and reuses them forever, so a
/// payload is best thought of as a reusable buffer rather than a value: the
/// producer mutates whatever instance [`Producer::acquire_write`] hands out,
/// which is the instance committed two rotations earlier (or a fresh one at
/// the start).
///
/// [`merge_forward`](Message::merge_forward) is the hook for state that must
/// stay continuous across those rotations. It runs on every commit, under the
/// rotation lock, from the payload just committed into the payload the
/// producer is about to reuse. Copy only the fields that need it (counters,
/// history, tracking state) and leave bulk data such as pixel buffers alone,
/// since the producer overwrites those anyway.
///
/// `merge_forward` must finish in bounded time: while it runs, the consumer
/// cannot claim.
///
/// [`Producer::acquire_write`]: crate::SPSC::Producer::acquire_write
pub trait Message: Send {
    /// Copies the fields that must persist across buffer reuse into `dest`.
    ///
    /// The default carries nothing over.
    #[inline]
    fn merge_forward(&self, dest: &mut Self) {
        let _ = dest;
    }
}

/// Signal-only links carry no data, only the fact that a commit happened.
impl Message for () {}

use std::fmt;
use crate::SPSC::Buffer::TripleBuffer;
use crate::SPSC::{Consumer, Message, Producer};

/// Debug function for TripleBuffer
///
/// Shows identity and synchronization state only. Payloads are never
/// printed: the middle slot may only be read under the rotation lock and the
/// other two belong to their respective threads.
pub(crate) fn debug_triple_buffer<T: Message>(buffer: &TripleBuffer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TripleBuffer")
        .field("channel_id", &buffer.channel_id())
        .field("name", &buffer.name())
        .field("middle_sequence", &buffer.middle_sequence())
        .field("closed", &buffer.is_closed())
        .finish_non_exhaustive()
}

/// Debug function for Producer
pub fn debug_producer<T: Message>(producer: &Producer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Producer")
        .field("link", &*producer.shared)
        .field("write_slot", &producer.write_idx())
        .field("last_sequence", &producer.last_sequence())
        .finish()
}

/// Debug function for Consumer
pub fn debug_consumer<T: Message>(consumer: &Consumer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Consumer")
        .field("link", &*consumer.shared)
        .field("read_slot", &consumer.read_idx())
        .field("sequence", &consumer.sequence())
        .field("claimed", &consumer.claimed())
        .field("skipped", &consumer.skipped())
        .finish()
}

// Debug proxy implementations that call the standalone debug functions
impl<T: Message> fmt::Debug for TripleBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_triple_buffer(self, f)
    }
}

impl<T: Message> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_producer(self, f)
    }
}

impl<T: Message> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_consumer(self, f)
    }
}

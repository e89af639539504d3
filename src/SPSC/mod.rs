mod builder;
mod consumer;
mod producer;

pub use builder::ChannelBuilder;
pub use consumer::Consumer;
pub use producer::Producer;

pub mod Buffer {
    pub mod Buffer;
    pub mod Buffer_impl;
    pub mod layout;
    pub use layout::{Roles, SLOT_COUNT}; // re-export for stable path
    pub(crate) use Buffer::TripleBuffer;
}

pub mod Structs {
    pub mod Buffer_Structs;
    pub mod history;
    pub use history::History; // re-export for stable path
    pub use Buffer_Structs::Message; // re-export for stable path
}

pub use Buffer::Roles;
pub use Structs::{History, Message};

/// Creates a link with default-constructed payloads and default settings.
///
/// Shorthand for `ChannelBuilder::new().build()`.
pub fn channel<T: Message + Default>() -> (Producer<T>, Consumer<T>) {
    ChannelBuilder::new().build()
}

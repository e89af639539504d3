use super::Buffer::{Roles, TripleBuffer};
use super::Structs::Buffer_Structs::Message;
use super::{Consumer, Producer};
use std::io;
use std::sync::Arc;

pub struct ChannelBuilder {
    channel_id: u32,
    name: Option<String>,
    close_on_drop: bool,
}

impl Default for ChannelBuilder {
    fn default() -> Self {
        Self {
            channel_id: 0, // Default channel ID
            name: None,    // Derived from the channel ID
            close_on_drop: true,
        }
    }
}

impl ChannelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel_id(mut self, channel_id: u32) -> Self {
        self.channel_id = channel_id;
        self
    }

    /// Label used in log lines. Defaults to `link-<channel id>`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether dropping either end closes the link. Enabled by default.
    pub fn close_on_drop(mut self, enabled: bool) -> Self {
        self.close_on_drop = enabled;
        self
    }

    /// Builds a link whose three payloads are default-constructed.
    pub fn build<T: Message + Default>(self) -> (Producer<T>, Consumer<T>) {
        self.build_with(T::default)
    }

    /// Builds a link whose three payloads come from `make`.
    ///
    /// Use this to pre-size bulk buffers once, so that no commit ever has to
    /// grow them.
    pub fn build_with<T, F>(self, mut make: F) -> (Producer<T>, Consumer<T>)
    where
        T: Message,
        F: FnMut() -> T,
    {
        let payloads = [make(), make(), make()];
        self.assemble(payloads)
    }

    /// Like [`build_with`](Self::build_with) but with a fallible constructor.
    ///
    /// The first constructor error is returned and nothing is built.
    pub fn try_build_with<T, F>(self, mut make: F) -> io::Result<(Producer<T>, Consumer<T>)>
    where
        T: Message,
        F: FnMut() -> io::Result<T>,
    {
        let label = self.label();
        let mut construct = |slot: usize| {
            make().map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to construct payload for link {label}:\n\
                    ├─ Slot:  {slot} of 3\n\
                    ╰─ Error: {e}"
                    ),
                )
            })
        };

        let payloads = [construct(0)?, construct(1)?, construct(2)?];
        Ok(self.assemble(payloads))
    }

    fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("link-{}", self.channel_id))
    }

    fn assemble<T: Message>(self, payloads: [T; 3]) -> (Producer<T>, Consumer<T>) {
        let name = self.label();
        log::debug!(
            "link {} ({}): built with {}-byte payloads, close_on_drop={}",
            name,
            self.channel_id,
            std::mem::size_of::<T>(),
            self.close_on_drop
        );

        let shared = Arc::new(TripleBuffer::new(
            payloads,
            self.channel_id,
            name,
            self.close_on_drop,
        ));

        let roles = Roles::INITIAL;
        let producer = Producer::new(shared.clone(), roles.write);
        let consumer = Consumer::new(shared, roles.read);
        (producer, consumer)
    }
}

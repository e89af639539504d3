//! Triple-buffered, latest-value message link between one producer thread and
//! one consumer thread.
//!
//! The producer fills a payload in place and commits it; the consumer claims
//! the most recently committed payload whenever it polls. Neither side ever
//! waits on the other beyond a short role-rotation lock.
//!
//! ```
//! use msglink::SPSC::{channel, Message};
//!
//! #[derive(Default)]
//! struct Frame {
//!     pixels: Vec<u8>,
//!     frames_seen: u64,
//! }
//!
//! impl Message for Frame {
//!     fn merge_forward(&self, dest: &mut Self) {
//!         dest.frames_seen = self.frames_seen;
//!     }
//! }
//!
//! let (mut tx, mut rx) = channel::<Frame>();
//!
//! let frame = tx.acquire_write();
//! frame.pixels.resize(16, 0xff);
//! frame.frames_seen += 1;
//! tx.commit();
//!
//! let frame = rx.try_claim().expect("one commit is pending");
//! assert_eq!(frame.frames_seen, 1);
//! assert!(rx.try_claim().is_none());
//! ```

// Module naming follows project convention (SPSC = Single-Producer Single-Consumer)
#[allow(non_snake_case)]
pub mod SPSC;

#[allow(non_snake_case)]
mod Debug {
    pub mod StructDebug;
}

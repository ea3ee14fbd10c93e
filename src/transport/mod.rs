use core::fmt;

use crate::protocol::Message;

/// A bidirectional, ordered message channel.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;
}

/// The peer went away. Transports report this instead of an ad hoc message
/// so callers can tell an orderly hang-up from a broken stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closed;

impl fmt::Display for Closed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Connection closed by peer")
    }
}

impl std::error::Error for Closed {}

/// Whether `err` means the peer disconnected.
pub fn is_closed(err: &anyhow::Error) -> bool {
    err.downcast_ref::<Closed>().is_some()
}

pub mod in_memory;
pub mod tcp;

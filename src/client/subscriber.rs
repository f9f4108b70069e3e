//! Subscriber endpoint
//!
//! `Subscriber` is the receiving end of a bounded per-subscriber channel. The
//! sending half is owned by the bus registry, so only the bus can close a
//! stream; callers observe the close as `None` once buffered messages are
//! drained.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TryRecvError};
use uuid::Uuid;

use crate::broker::Message;

/// Identity of a subscriber endpoint, used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug)]
pub struct Subscriber<P> {
    id: SubscriberId,
    receiver: mpsc::Receiver<Arc<Message<P>>>,
}

impl<P> Subscriber<P> {
    pub(crate) fn new(id: SubscriberId, receiver: mpsc::Receiver<Arc<Message<P>>>) -> Self {
        Self { id, receiver }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next message. Returns `None` once the endpoint has been
    /// closed by the bus and every buffered message has been read; further
    /// calls keep returning `None` without waiting.
    pub async fn recv(&mut self) -> Option<Arc<Message<P>>> {
        self.receiver.recv().await
    }

    /// Take the next buffered message without waiting.
    ///
    /// `TryRecvError::Empty` means the stream is still open but idle,
    /// `TryRecvError::Disconnected` means it has ended.
    pub fn try_recv(&mut self) -> Result<Arc<Message<P>>, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Blocking variant of [`Subscriber::recv`] for threads outside the
    /// async runtime. Panics if called from within an async context.
    pub fn blocking_recv(&mut self) -> Option<Arc<Message<P>>> {
        self.receiver.blocking_recv()
    }

    /// Number of messages buffered and not yet read.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

//! Dispatch loop
//!
//! One task owns the `Registry` and applies commands from a bounded queue in
//! arrival order. Nothing else touches the registry, so it needs no lock.
//!
//! The loop ends on `Command::Shutdown` or when every sender of the queue has
//! been dropped. Either way it tears the registry down, which closes every
//! endpoint still registered so blocked readers see end-of-stream, and
//! finally flips the `stopped` flag that `Bus::join` waits on.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::broker::message::Message;
use crate::broker::registry::{Outbox, Registry};
use crate::broker::topic::Delivery;
use crate::client::SubscriberId;

#[derive(Debug)]
pub(crate) enum Command<P> {
    Subscribe {
        id: SubscriberId,
        sender: Outbox<P>,
        topics: Vec<String>,
        delivery: Delivery,
    },
    AddTopics {
        id: SubscriberId,
        topics: Vec<String>,
    },
    Publish {
        message: Arc<Message<P>>,
        topics: Vec<String>,
    },
    Unsubscribe {
        id: SubscriberId,
        topics: Vec<String>,
    },
    UnsubscribeAll {
        id: SubscriberId,
    },
    Close {
        topics: Vec<String>,
    },
    Shutdown,
}

impl<P> Command<P> {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Subscribe { .. } => "subscribe",
            Command::AddTopics { .. } => "add_topics",
            Command::Publish { .. } => "publish",
            Command::Unsubscribe { .. } => "unsubscribe",
            Command::UnsubscribeAll { .. } => "unsubscribe_all",
            Command::Close { .. } => "close",
            Command::Shutdown => "shutdown",
        }
    }
}

pub(crate) async fn run<P>(
    mut registry: Registry<P>,
    mut commands: mpsc::Receiver<Command<P>>,
    stopped: watch::Sender<bool>,
) where
    P: Send + Sync,
{
    info!("dispatch loop started");

    while let Some(command) = commands.recv().await {
        debug!(command = command.kind(), "applying");
        match command {
            Command::Subscribe {
                id,
                sender,
                topics,
                delivery,
            } => registry.register(id, sender, &topics, delivery),
            Command::AddTopics { id, topics } => {
                if !registry.add(&topics, id, Delivery::Persistent) {
                    debug!(subscriber = %id, "endpoint already closed, ignoring new topics");
                }
            }
            Command::Publish { message, topics } => registry.send(&topics, message).await,
            Command::Unsubscribe { id, topics } => registry.remove(&topics, id),
            Command::UnsubscribeAll { id } => registry.remove_all(id),
            Command::Close { topics } => registry.remove_topics(&topics),
            Command::Shutdown => break,
        }
    }

    commands.close();
    registry.teardown();
    stopped.send_replace(true);
    info!("dispatch loop stopped");
}

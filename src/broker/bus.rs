//! Bus facade
//!
//! `Bus` is the handle applications hold. Every operation turns into a
//! `Command` pushed onto the dispatch loop's queue and returns as soon as the
//! command is queued; the registry change happens later, in queue order.
//!
//! Usage notes:
//! - Share a bus between tasks with `Arc<Bus<P>>`.
//! - `subscribe` hands back the endpoint immediately. Its registration is
//!   queued ahead of anything the caller submits afterwards, so a publish
//!   issued after `subscribe` returns is guaranteed to reach it.
//! - A subscriber with a full buffer stalls the whole loop until it reads.
//! - `shutdown` only queues the stop; `join` waits for the loop to finish.
//!   After the loop has stopped, commands are dropped with a warning instead
//!   of blocking, and new subscribers start out closed.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::warn;

use crate::broker::dispatch::{self, Command};
use crate::broker::message::Message;
use crate::broker::registry::Registry;
use crate::broker::topic::Delivery;
use crate::client::{Subscriber, SubscriberId};
use crate::config::BusSettings;
use crate::utils::error::BusError;

#[derive(Debug)]
pub struct Bus<P> {
    commands: mpsc::Sender<Command<P>>,
    capacity: usize,
    stopped: watch::Receiver<bool>,
}

impl<P> Bus<P>
where
    P: Send + Sync + 'static,
{
    /// Queue depth used by `Bus::new`.
    pub const DEFAULT_QUEUE_CAPACITY: usize = 1;

    /// Starts a bus whose subscribers buffer up to `capacity` messages each.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(capacity: usize) -> Result<Self, BusError> {
        Self::build(capacity, Self::DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_settings(settings: &BusSettings) -> Result<Self, BusError> {
        Self::build(settings.capacity, settings.queue_capacity)
    }

    fn build(capacity: usize, queue_capacity: usize) -> Result<Self, BusError> {
        if capacity == 0 {
            return Err(BusError::ZeroCapacity);
        }
        if queue_capacity == 0 {
            return Err(BusError::ZeroQueueCapacity);
        }
        let runtime = tokio::runtime::Handle::try_current()?;
        let (commands, queue) = mpsc::channel(queue_capacity);
        let (done, stopped) = watch::channel(false);
        runtime.spawn(dispatch::run(Registry::new(), queue, done));

        Ok(Self {
            commands,
            capacity,
            stopped,
        })
    }

    /// Buffer size of every endpoint this bus creates.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates an endpoint persistently subscribed to `topics`.
    pub async fn subscribe<I, S>(&self, topics: I) -> Subscriber<P>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.open(collect(topics), Delivery::Persistent).await
    }

    /// Creates an endpoint that receives a single message from any of
    /// `topics` and is then closed.
    pub async fn subscribe_once<I, S>(&self, topics: I) -> Subscriber<P>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.open(collect(topics), Delivery::Once).await
    }

    /// Persistently subscribes an existing endpoint to more topics. Does
    /// nothing if the endpoint has already been closed.
    pub async fn add_subscription<I, S>(&self, subscriber: &Subscriber<P>, topics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch(Command::AddTopics {
            id: subscriber.id(),
            topics: collect(topics),
        })
        .await;
    }

    /// Delivers `message` to every subscriber of each topic, once per topic
    /// and in the order the topics are given.
    pub async fn publish<I, S>(&self, message: Message<P>, topics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let topics = collect(topics);
        if topics.is_empty() {
            return;
        }
        self.dispatch(Command::Publish {
            message: Arc::new(message),
            topics,
        })
        .await;
    }

    /// Removes the endpoint from `topics`, or from every topic when `topics`
    /// is empty. An endpoint left on no topic is closed.
    pub async fn unsubscribe<I, S>(&self, subscriber: &Subscriber<P>, topics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unsubscribe_id(subscriber.id(), topics).await;
    }

    /// Removes the endpoint from every topic, closing it.
    pub async fn unsubscribe_all(&self, subscriber: &Subscriber<P>) {
        self.dispatch(Command::UnsubscribeAll {
            id: subscriber.id(),
        })
        .await;
    }

    /// Same as [`Bus::unsubscribe`], addressing the endpoint by id.
    pub async fn unsubscribe_id<I, S>(&self, id: SubscriberId, topics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let topics = collect(topics);
        let command = if topics.is_empty() {
            Command::UnsubscribeAll { id }
        } else {
            Command::Unsubscribe { id, topics }
        };
        self.dispatch(command).await;
    }

    /// Drops every subscriber of each topic and erases the topics.
    /// Subscribers still on other topics stay open.
    pub async fn close<I, S>(&self, topics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let topics = collect(topics);
        if topics.is_empty() {
            return;
        }
        self.dispatch(Command::Close { topics }).await;
    }

    /// Queues a stop of the dispatch loop. Everything queued before it is
    /// still applied, then every endpoint still registered is closed.
    ///
    /// Returns once the command is queued, like every other operation; use
    /// [`Bus::join`] to wait for the loop to exit.
    pub async fn shutdown(&self) {
        self.dispatch(Command::Shutdown).await;
    }

    /// Waits until the dispatch loop has exited and torn down the registry.
    /// Any number of callers may wait at once; returns immediately if the
    /// loop is already gone.
    pub async fn join(&self) {
        let mut stopped = self.stopped.clone();
        // Err means the loop task was dropped without finishing, which is
        // just as final.
        let _ = stopped.wait_for(|done| *done).await;
    }

    /// Whether the dispatch loop is still alive.
    pub fn is_running(&self) -> bool {
        !*self.stopped.borrow() && self.stopped.has_changed().is_ok()
    }

    async fn open(&self, topics: Vec<String>, delivery: Delivery) -> Subscriber<P> {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let id = SubscriberId::new();
        self.dispatch(Command::Subscribe {
            id,
            sender,
            topics,
            delivery,
        })
        .await;
        Subscriber::new(id, receiver)
    }

    async fn dispatch(&self, command: Command<P>) {
        if let Err(mpsc::error::SendError(command)) = self.commands.send(command).await {
            warn!(command = command.kind(), "bus is shut down, dropping command");
        }
    }
}

fn collect<I, S>(topics: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    topics.into_iter().map(Into::into).collect()
}

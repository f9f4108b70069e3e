//! Subscription registry
//!
//! The registry keeps two indexes that must always agree:
//! - `topics`: topic name -> subscribers of that topic (with delivery mode)
//! - `subscribers`: subscriber id -> its sending half and the topics it is on
//!
//! A topic exists only while it has at least one subscriber and an endpoint
//! exists only while it is on at least one topic. Erasing an endpoint drops
//! the last sender of its channel, which is what closes the subscriber's
//! stream.
//!
//! The registry is not synchronized. It is owned by the dispatch loop and
//! every mutation goes through it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::broker::message::Message;
use crate::broker::topic::{Delivery, Topic};
use crate::client::SubscriberId;

pub(crate) type Outbox<P> = mpsc::Sender<Arc<Message<P>>>;

#[derive(Debug)]
struct Endpoint<P> {
    sender: Outbox<P>,
    topics: HashSet<String>,
}

#[derive(Debug)]
pub(crate) struct Registry<P> {
    topics: HashMap<String, Topic>,
    subscribers: HashMap<SubscriberId, Endpoint<P>>,
}

impl<P> Default for Registry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Registry<P> {
    pub fn new() -> Self {
        Self {
            topics: HashMap::new(),
            subscribers: HashMap::new(),
        }
    }

    /// Registers a fresh endpoint on `topics`. With no topics the endpoint is
    /// never stored, so its sender is dropped and the stream ends at once.
    pub fn register(
        &mut self,
        id: SubscriberId,
        sender: Outbox<P>,
        topics: &[String],
        delivery: Delivery,
    ) {
        if topics.is_empty() {
            debug!(subscriber = %id, "subscription without topics, closing endpoint");
            return;
        }
        self.subscribers.entry(id).or_insert_with(|| Endpoint {
            sender,
            topics: HashSet::new(),
        });
        self.add(topics, id, delivery);
    }

    /// Adds an already registered endpoint to more topics. Returns `false`
    /// when the endpoint is unknown, i.e. it was closed earlier.
    pub fn add(&mut self, topics: &[String], id: SubscriberId, delivery: Delivery) -> bool {
        let Some(endpoint) = self.subscribers.get_mut(&id) else {
            return false;
        };
        for name in topics {
            endpoint.topics.insert(name.clone());
            self.topics
                .entry(name.clone())
                .or_insert_with(|| {
                    debug!(topic = %name, "topic created");
                    Topic::new(name)
                })
                .subscribe(id, delivery);
        }
        true
    }

    /// Removes the endpoint from `topics`. Closes it if that leaves it on no
    /// topic at all.
    pub fn remove(&mut self, topics: &[String], id: SubscriberId) {
        for name in topics {
            self.detach(name, id);
        }
    }

    /// Removes the endpoint from every topic it is on, closing it.
    pub fn remove_all(&mut self, id: SubscriberId) {
        let Some(endpoint) = self.subscribers.get(&id) else {
            return;
        };
        let topics: Vec<String> = endpoint.topics.iter().cloned().collect();
        self.remove(&topics, id);
    }

    /// Drops every subscriber of each topic from that topic, then the topic
    /// itself. Subscribers left without topics are closed.
    pub fn remove_topics(&mut self, topics: &[String]) {
        for name in topics {
            let Some(topic) = self.topics.get(name) else {
                continue;
            };
            for id in topic.subscriber_ids() {
                self.detach(name, id);
            }
        }
    }

    /// Closes every endpoint and erases every topic.
    pub fn teardown(&mut self) {
        let topics: Vec<String> = self.topics.keys().cloned().collect();
        self.remove_topics(&topics);
        debug_assert!(self.subscribers.is_empty());
    }

    /// Unlinks one (topic, endpoint) pair from both indexes, erasing whichever
    /// side became empty.
    fn detach(&mut self, name: &str, id: SubscriberId) {
        if let Some(topic) = self.topics.get_mut(name) {
            topic.unsubscribe(&id);
            if topic.is_empty() {
                self.topics.remove(name);
                debug!(topic = %name, "topic erased");
            }
        }
        if let Some(endpoint) = self.subscribers.get_mut(&id) {
            endpoint.topics.remove(name);
            if endpoint.topics.is_empty() {
                self.subscribers.remove(&id);
                debug!(subscriber = %id, "endpoint closed");
            }
        }
    }

    pub fn delivery(&self, name: &str, id: SubscriberId) -> Option<Delivery> {
        self.topics.get(name).and_then(|topic| topic.delivery(&id))
    }
}

#[cfg(test)]
impl<P> Registry<P> {
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn has_topic(&self, name: &str) -> bool {
        self.topics.contains_key(name)
    }

    /// Topics the endpoint is currently on, sorted.
    pub fn topics_of(&self, id: SubscriberId) -> Vec<String> {
        let mut topics: Vec<String> = self
            .subscribers
            .get(&id)
            .map(|endpoint| endpoint.topics.iter().cloned().collect())
            .unwrap_or_default();
        topics.sort();
        topics
    }
}

impl<P> Registry<P>
where
    P: Send + Sync,
{
    /// Delivers `msg` to every subscriber of each topic, in topic order.
    ///
    /// Waits for room when a subscriber's buffer is full. A once-subscriber is
    /// closed right after its delivery, and one whose receiver was dropped is
    /// closed instead of delivered to.
    pub async fn send(&mut self, topics: &[String], msg: Arc<Message<P>>) {
        for name in topics {
            let Some(topic) = self.topics.get(name) else {
                trace!(topic = %name, "no subscribers");
                continue;
            };
            for id in topic.subscriber_ids() {
                // an earlier delivery in this call may have consumed a once-subscriber
                let Some(delivery) = self.delivery(name, id) else {
                    continue;
                };
                let Some(endpoint) = self.subscribers.get(&id) else {
                    continue;
                };
                if endpoint.sender.send(Arc::clone(&msg)).await.is_err() {
                    warn!(subscriber = %id, topic = %name, "receiver dropped, pruning endpoint");
                    self.remove_all(id);
                    continue;
                }
                trace!(subscriber = %id, topic = %name, message = msg.id, "delivered");
                if delivery == Delivery::Once {
                    self.remove_all(id);
                }
            }
        }
    }
}

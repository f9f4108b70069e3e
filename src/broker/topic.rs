//! Topic management
//!
//! A `Topic` holds the subscribers of one topic name together with the
//! delivery mode each of them registered with. Re-subscribing an endpoint
//! overwrites its mode.
//!
//! Concurrency note: topics are only ever touched by the dispatch loop.

use std::collections::HashMap;

use crate::client::SubscriberId;

/// How a subscriber registered on a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Stays registered until unsubscribed, closed or shut down.
    Persistent,
    /// Dropped from every topic right after its first delivery.
    Once,
}

#[derive(Debug)]
pub struct Topic {
    pub name: String,
    pub subscribers: HashMap<SubscriberId, Delivery>,
}

impl Topic {
    /// Create a new topic with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashMap::new(),
        }
    }

    /// Add a subscriber to the topic.
    pub fn subscribe(&mut self, id: SubscriberId, delivery: Delivery) {
        self.subscribers.insert(id, delivery);
    }

    /// Remove a subscriber from the topic. Returns whether it was present.
    pub fn unsubscribe(&mut self, id: &SubscriberId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn delivery(&self, id: &SubscriberId) -> Option<Delivery> {
        self.subscribers.get(id).copied()
    }

    /// Snapshot of the current subscriber ids.
    pub fn subscriber_ids(&self) -> Vec<SubscriberId> {
        self.subscribers.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

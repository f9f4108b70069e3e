//! The `client` module defines the consumer side of the bus.
//!
//! It provides the `Subscriber` endpoint handed out by `Bus::subscribe`, and
//! the `SubscriberId` that identifies it when growing or dropping a
//! subscription.

pub mod subscriber;
pub use subscriber::{Subscriber, SubscriberId};

#[cfg(test)]
mod tests;

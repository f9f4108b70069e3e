//! # TopicBus
//!
//! `topicbus` is an in-process, topic-keyed publish/subscribe distributor.
//! Producers publish messages to one or more topic names; consumers hold a
//! private bounded stream that receives every message published to the
//! topics they subscribed to.
//!
//! All subscription state lives in a registry owned by a single dispatch
//! task. Public operations only queue commands for that task, so the
//! registry needs no locking and commands take effect in submission order.
//!
//! ## Core Modules
//!
//! - `broker`: the `Bus` handle, the dispatch loop and the subscription registry.
//! - `client`: the `Subscriber` endpoint consumers read from.
//! - `config`: loading bus and logging settings from files and environment.
//! - `utils`: the error type and logging setup.
//!
//! ## Example
//!
//! ```rust
//! use topicbus::{Bus, Message};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), topicbus::BusError> {
//! let bus = Bus::new(1)?;
//! let mut news = bus.subscribe(["news"]).await;
//!
//! bus.publish(Message::new(1, "hello"), ["news"]).await;
//! assert_eq!(news.recv().await.unwrap().payload, "hello");
//!
//! bus.shutdown().await;
//! assert!(news.recv().await.is_none());
//! # Ok(())
//! # }
//! ```

pub mod broker;
pub mod client;
pub mod config;
pub mod utils;

pub use broker::{Bus, JsonMessage, Message};
pub use client::{Subscriber, SubscriberId};
pub use utils::error::BusError;

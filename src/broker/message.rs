//! Message definitions for the bus
//!
//! `Message` is the envelope handed to every matching subscriber. The bus
//! wraps each published message in an `Arc` so all subscribers share one
//! read-only copy.
//!
//! Notes on fields:
//! - `id`: producer-chosen identifier, not interpreted by the bus
//! - `payload`: any value; use `JsonMessage` when the payload shape is only
//!   known at runtime

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message<P> {
    pub id: u64,
    pub payload: P,
}

/// A message whose payload is an arbitrary JSON value.
pub type JsonMessage = Message<serde_json::Value>;

impl<P> Message<P> {
    pub fn new(id: u64, payload: P) -> Self {
        Self { id, payload }
    }
}

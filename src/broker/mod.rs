pub mod bus;
pub(crate) mod dispatch;
pub mod message;
pub(crate) mod registry;
pub mod topic;

pub use bus::Bus;
pub use message::{JsonMessage, Message};

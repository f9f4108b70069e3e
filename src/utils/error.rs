//! The `error` module defines the errors a bus can report.
//!
//! Only construction is fallible. Once running, every bus operation is a
//! fire-and-forget command and problems are logged rather than returned.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("subscriber buffer capacity must be at least 1")]
    ZeroCapacity,

    #[error("command queue capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("no tokio runtime available to run the dispatch loop")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

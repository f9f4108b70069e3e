//! The `utils` module provides the pieces shared across the crate that are
//! not part of the bus itself: the error type and logging setup.

pub mod error;
pub mod logging;

//! Core traits and types for the lazystream library.
//!
//! This module contains the fundamental traits and error types that define
//! how data enters and leaves a stream.

pub mod error;
pub mod traits;

// Re-export core items
pub use error::{Error, Result};
pub use traits::{ReversibleSource, Sink, Source, Truthy, Unpack};

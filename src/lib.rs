//! # Lazy, chainable sequence pipelines
//!
//! This crate provides a [`Stream`]: a pipeline of intermediate stages over
//! a source, evaluated only when a terminal operation asks for values.
//!
//! ## Core Concepts
//!
//! - **Source**: Produces a fresh traversal on demand (collections, ranges,
//!   generators, files)
//! - **Stage**: Transforms a sequence lazily (map, filter, sort, group, ...)
//! - **Terminal**: Pulls values out (collect, reduce, count, write to a sink)
//! - **Mode**: A stream is either re-entrant, restarting on every terminal,
//!   or single-pass, sharing one cursor between terminals
//!
//! ## Example
//!
//! ```rust
//! use lazystream::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let evens = Stream::range(0..10).filter(|x| x % 2 == 0);
//!     assert_eq!(evens.to::<Vec<_>>(), vec![0, 2, 4, 6, 8]);
//!
//!     // Re-entrant: the same stream can be consumed again
//!     assert_eq!(evens.sum::<i64>(), 20);
//!
//!     // Single-pass: terminals share one cursor
//!     let once = evens.nonreentrant();
//!     assert_eq!(once.take(2), vec![0, 2]);
//!     assert_eq!(once.take(2), vec![4, 6]);
//!
//!     let total = Stream::of(vec![3, 1, 2]).sort().reduce(|a, b| a * 10 + b)?;
//!     assert_eq!(total, 123);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod deferred;
pub mod seq;
pub mod sinks;
pub mod sources;
pub mod stages;
pub mod stream;
pub mod tabular;
pub mod util;

mod telemetry;

// Re-export commonly used items
pub mod prelude {
    pub use crate::core::{Error, Result, ReversibleSource, Sink, Source, Truthy};
    pub use crate::sinks::{CollectSink, CountSink};
    pub use crate::stream::Stream;
    pub use crate::tabular::{Column, CsvReadOptions, Dialect, Field, Row};
    pub use crate::util::{from_fn, sink_from_fn};
}

// Re-export main types
pub use crate::core::{Error, Result};
pub use deferred::Deferred;
pub use seq::{Cursor, Iter};
pub use stream::Stream;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Sink implementations for the lazystream library.
//!
//! This module provides in-memory sinks. The delimited-text sink lives in
//! [`crate::tabular`].

use std::marker::PhantomData;

use crate::core::{Result, Sink};

/// A sink that collects items into a vector.
pub struct CollectSink<T> {
    items: Vec<T>,
}

impl<T> CollectSink<T> {
    /// Create a new collect sink
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Get the collected items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Borrow the collected items
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T> Sink for CollectSink<T> {
    type Item = T;

    fn write(&mut self, item: Self::Item) -> Result<()> {
        self.items.push(item);
        Ok(())
    }
}

impl<T> Default for CollectSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sink that counts items and whether it was finished
pub struct CountSink<T> {
    count: usize,
    finished: bool,
    _phantom: PhantomData<fn(T)>,
}

impl<T> CountSink<T> {
    /// Create a new count sink
    pub fn new() -> Self {
        Self {
            count: 0,
            finished: false,
            _phantom: PhantomData,
        }
    }

    /// Get the current count
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the upstream traversal reached its end
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<T> Sink for CountSink<T> {
    type Item = T;

    fn write(&mut self, _item: Self::Item) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

impl<T> Default for CountSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

//! Terminal operations.
//!
//! Each of these performs one traversal. On a re-entrant stream that
//! traversal starts from the beginning and leaves the stream reusable; on a
//! single-pass stream it consumes from the shared cursor.

use std::fmt::Display;
use std::iter::Sum;
use std::ops::Add;

use crate::core::{Error, Result, Sink, Truthy};
use crate::seq::Iter;
use crate::stream::Stream;

impl<T: 'static> Stream<T> {
    /// Start one traversal
    pub fn iter(&self) -> Iter<T> {
        self.seq.traverse()
    }

    /// Collect every value into a container
    pub fn to<C: FromIterator<T>>(&self) -> C {
        self.iter().collect()
    }

    /// Hand one traversal to `f`
    pub fn to_with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(Iter<T>) -> R,
    {
        f(self.iter())
    }

    /// The next value, or `None` when exhausted
    pub fn take_one(&self) -> Option<T> {
        self.iter().next()
    }

    /// The next value, or `default` when exhausted
    pub fn take_one_or(&self, default: T) -> T {
        self.take_one().unwrap_or(default)
    }

    /// Up to `count` values; fewer when the stream runs out
    pub fn take(&self, count: usize) -> Vec<T> {
        self.iter().take(count).collect()
    }

    /// Exactly `count` values, padded with `default` when the stream runs
    /// out.
    ///
    /// ```rust
    /// use lazystream::Stream;
    ///
    /// let s = Stream::of(vec![2, 3, 5, 7]).filter(|x| *x > 3);
    /// assert_eq!(s.take_padded(5, 0), vec![5, 7, 0, 0, 0]);
    /// ```
    pub fn take_padded(&self, count: usize, default: T) -> Vec<T>
    where
        T: Clone,
    {
        self.iter()
            .chain(std::iter::repeat(default))
            .take(count)
            .collect()
    }

    /// Left fold seeded with the first value.
    ///
    /// Fails with [`Error::EmptyReduce`] on an empty stream.
    pub fn reduce<F>(&self, f: F) -> Result<T>
    where
        F: FnMut(T, T) -> T,
    {
        self.iter().reduce(f).ok_or(Error::EmptyReduce)
    }

    /// Left fold seeded with `initial`
    pub fn fold<R, F>(&self, initial: R, f: F) -> R
    where
        F: FnMut(R, T) -> R,
    {
        self.iter().fold(initial, f)
    }

    /// Number of values
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Whether every value matches; true when empty. Stops at the first
    /// miss.
    pub fn all<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().all(|x| predicate(&x))
    }

    /// Whether any value matches; false when empty. Stops at the first hit.
    pub fn any<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().any(|x| predicate(&x))
    }

    /// Whether every value is truthy
    pub fn all_truthy(&self) -> bool
    where
        T: Truthy,
    {
        self.all(Truthy::is_truthy)
    }

    /// Whether any value is truthy
    pub fn any_truthy(&self) -> bool
    where
        T: Truthy,
    {
        self.any(Truthy::is_truthy)
    }

    /// Call `f` on every value
    pub fn foreach<F>(&self, f: F)
    where
        F: FnMut(T),
    {
        self.iter().for_each(f)
    }

    /// Sum of the values
    pub fn sum<S: Sum<T>>(&self) -> S {
        self.iter().sum()
    }

    /// Sum of `initial` and the values
    pub fn sum_from(&self, initial: T) -> T
    where
        T: Add<Output = T>,
    {
        self.fold(initial, |acc, x| acc + x)
    }

    /// Smallest value; the first one wins ties
    pub fn min(&self) -> Option<T>
    where
        T: Ord,
    {
        self.iter().reduce(|best, x| if x < best { x } else { best })
    }

    /// Largest value; the first one wins ties
    pub fn max(&self) -> Option<T>
    where
        T: Ord,
    {
        self.iter().reduce(|best, x| if x > best { x } else { best })
    }

    /// Smallest value, or `default` when empty
    pub fn min_or(&self, default: T) -> T
    where
        T: Ord,
    {
        self.min().unwrap_or(default)
    }

    /// Largest value, or `default` when empty
    pub fn max_or(&self, default: T) -> T
    where
        T: Ord,
    {
        self.max().unwrap_or(default)
    }

    /// Value with the smallest key; the first one wins ties
    pub fn min_by_key<K, F>(&self, key: F) -> Option<T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.extreme_by_key(key, |candidate, best| candidate < best)
    }

    /// Value with the largest key; the first one wins ties
    pub fn max_by_key<K, F>(&self, key: F) -> Option<T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.extreme_by_key(key, |candidate, best| candidate > best)
    }

    fn extreme_by_key<K, F, B>(&self, mut key: F, beats: B) -> Option<T>
    where
        F: FnMut(&T) -> K,
        B: Fn(&K, &K) -> bool,
    {
        let mut best: Option<(K, T)> = None;
        for item in self.iter() {
            let k = key(&item);
            let replace = match &best {
                Some((best_key, _)) => beats(&k, best_key),
                None => true,
            };
            if replace {
                best = Some((k, item));
            }
        }
        best.map(|(_, item)| item)
    }

    /// Concatenate the values' text, separated by `separator`
    pub fn join(&self, separator: &str) -> String
    where
        T: Display,
    {
        let mut out = String::new();
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.push_str(&item.to_string());
        }
        out
    }

    /// Write every value into `sink`, then finish it.
    ///
    /// Returns the number of values written.
    pub fn drain_into<S>(&self, sink: &mut S) -> Result<usize>
    where
        S: Sink<Item = T>,
    {
        let mut written = 0;
        for item in self.iter() {
            sink.write(item)?;
            written += 1;
        }
        sink.finish()?;
        Ok(written)
    }

    /// Expose the stream to async consumers.
    ///
    /// Polling never waits: each poll pulls the next value synchronously.
    pub fn into_async(self) -> impl futures_core::Stream<Item = T> {
        futures::stream::iter(self)
    }
}

impl<T: 'static> IntoIterator for Stream<T> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        self.iter()
    }
}

impl<T: 'static> IntoIterator for &Stream<T> {
    type Item = T;
    type IntoIter = Iter<T>;

    fn into_iter(self) -> Iter<T> {
        self.iter()
    }
}

//! Source implementations for the lazystream library.
//!
//! This module provides the re-entrant sources a stream can start from:
//! fixed collections, integer ranges, self-generating sequences, and
//! deferred eager functions over another stream.

use std::fmt;
use std::iter::FusedIterator;
use std::rc::Rc;

use crate::core::{Error, Result, ReversibleSource, Source};
use crate::deferred::Deferred;
use crate::seq::Iter;
use crate::stream::Stream;

/// A fixed collection shared between traversals
pub struct Shared<T> {
    items: Rc<[T]>,
}

impl<T> Shared<T> {
    /// Create a new shared collection
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T: Clone> Source for Shared<T> {
    type Item = T;
    type Iter = SharedIter<T>;

    fn traverse(&self) -> Self::Iter {
        SharedIter {
            items: self.items.clone(),
            front: 0,
            back: self.items.len(),
        }
    }
}

impl<T: Clone> ReversibleSource for Shared<T> {
    type RevIter = std::iter::Rev<SharedIter<T>>;

    fn traverse_rev(&self) -> Self::RevIter {
        self.traverse().rev()
    }
}

/// A traversal over a [`Shared`] collection
pub struct SharedIter<T> {
    items: Rc<[T]>,
    front: usize,
    back: usize,
}

impl<T: Clone> Iterator for SharedIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let item = self.items[self.front].clone();
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<T: Clone> DoubleEndedIterator for SharedIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.items[self.back].clone())
    }
}

impl<T: Clone> ExactSizeIterator for SharedIter<T> {}

impl<T: Clone> FusedIterator for SharedIter<T> {}

/// An integer range with a step, walked like `start, start + step, ...`
/// up to but excluding `stop`.
///
/// Negative steps count down. The range is empty when the step points
/// away from `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSource {
    start: i64,
    stop: i64,
    step: i64,
}

impl RangeSource {
    /// Create a new range source; a zero step is rejected
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self> {
        if step == 0 {
            return Err(Error::invalid_argument("step", "must not be zero"));
        }
        Ok(Self { start, stop, step })
    }

    /// Create a range counting by one, downwards when `descending` is set
    pub fn counting(start: i64, stop: i64, descending: bool) -> Self {
        let step = if descending { -1 } else { 1 };
        Self { start, stop, step }
    }

    /// Number of values the range yields
    pub fn len(&self) -> usize {
        let (span, step) = if self.step > 0 {
            (self.stop as i128 - self.start as i128, self.step as i128)
        } else {
            (self.start as i128 - self.stop as i128, -(self.step as i128))
        };
        if span <= 0 {
            0
        } else {
            usize::try_from((span + step - 1) / step).unwrap_or(usize::MAX)
        }
    }

    /// Check if the range yields nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn nth_value(&self, index: usize) -> i64 {
        (self.start as i128 + index as i128 * self.step as i128) as i64
    }
}

impl Source for RangeSource {
    type Item = i64;
    type Iter = RangeIter;

    fn traverse(&self) -> Self::Iter {
        RangeIter {
            range: *self,
            front: 0,
            back: self.len(),
        }
    }
}

impl ReversibleSource for RangeSource {
    type RevIter = std::iter::Rev<RangeIter>;

    fn traverse_rev(&self) -> Self::RevIter {
        self.traverse().rev()
    }
}

/// A traversal over a [`RangeSource`]
#[derive(Debug, Clone)]
pub struct RangeIter {
    range: RangeSource,
    front: usize,
    back: usize,
}

impl Iterator for RangeIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.front == self.back {
            return None;
        }
        let value = self.range.nth_value(self.front);
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for RangeIter {
    fn next_back(&mut self) -> Option<i64> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.range.nth_value(self.back))
    }
}

impl FusedIterator for RangeIter {}

/// A source that iterates a step function over a seed:
/// `seed, f(seed), f(f(seed)), ...` without end.
///
/// Every traversal starts over from the seed.
pub struct Iterate<T, F> {
    seed: T,
    f: Rc<F>,
}

impl<T, F> Iterate<T, F>
where
    F: Fn(&T) -> T,
{
    /// Create a new iterate source
    pub fn new(seed: T, f: F) -> Self {
        Self {
            seed,
            f: Rc::new(f),
        }
    }
}

impl<T: Clone, F: Fn(&T) -> T> Source for Iterate<T, F> {
    type Item = T;
    type Iter = IterateIter<T, F>;

    fn traverse(&self) -> Self::Iter {
        IterateIter {
            current: self.seed.clone(),
            started: false,
            f: self.f.clone(),
        }
    }
}

/// A traversal over an [`Iterate`] source
pub struct IterateIter<T, F> {
    current: T,
    started: bool,
    f: Rc<F>,
}

impl<T: Clone, F: Fn(&T) -> T> Iterator for IterateIter<T, F> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.started {
            self.current = (self.f)(&self.current);
        } else {
            self.started = true;
        }
        Some(self.current.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<T, F> fmt::Debug for IterateIter<T, F>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterateIter")
            .field("current", &self.current)
            .field("started", &self.started)
            .finish()
    }
}

/// A source that runs an eager whole-sequence function over an upstream
/// stream, deferred until the first element of a traversal is pulled.
///
/// Each traversal re-runs the function once against a fresh traversal of
/// the upstream, so this source restarts cleanly only when the upstream is
/// re-entrant. Over a single-pass upstream the first traversal sees all
/// the data and later ones see whatever the shared cursor has left.
pub struct LazyEvaluate<T, F> {
    upstream: Stream<T>,
    f: Rc<F>,
}

impl<T, F, J> LazyEvaluate<T, F>
where
    F: Fn(Iter<T>) -> J,
    J: IntoIterator,
{
    /// Create a new lazily evaluated source
    pub fn new(upstream: Stream<T>, f: F) -> Self {
        Self {
            upstream,
            f: Rc::new(f),
        }
    }
}

impl<T, F, J> Source for LazyEvaluate<T, F>
where
    T: 'static,
    F: Fn(Iter<T>) -> J + 'static,
    J: IntoIterator,
{
    type Item = J::Item;
    type Iter = Deferred<Iter<T>, Box<dyn FnOnce(Iter<T>) -> J>, J>;

    fn traverse(&self) -> Self::Iter {
        let f = self.f.clone();
        let transform: Box<dyn FnOnce(Iter<T>) -> J> = Box::new(move |it| f(it));
        Deferred::new(self.upstream.iter(), transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_walks_both_ways() {
        let shared = Shared::new(vec!['a', 'b', 'c']);
        assert_eq!(shared.traverse().collect::<String>(), "abc");
        assert_eq!(shared.traverse_rev().collect::<String>(), "cba");
        assert_eq!(shared.len(), 3);
    }

    #[test]
    fn range_matches_stepped_semantics() {
        let up = RangeSource::new(1, 10, 3).unwrap();
        assert_eq!(up.traverse().collect::<Vec<_>>(), vec![1, 4, 7]);
        assert_eq!(up.traverse_rev().collect::<Vec<_>>(), vec![7, 4, 1]);

        let down = RangeSource::new(5, 0, -2).unwrap();
        assert_eq!(down.traverse().collect::<Vec<_>>(), vec![5, 3, 1]);

        let away = RangeSource::new(0, 5, -1).unwrap();
        assert!(away.is_empty());
    }

    #[test]
    fn range_rejects_zero_step() {
        let err = RangeSource::new(0, 5, 0).unwrap_err();
        assert!(err.is_misuse());
    }

    #[test]
    fn iterate_restarts_from_seed() {
        let source = Iterate::new(1u64, |x| x * 3);
        let first: Vec<_> = source.traverse().take(5).collect();
        let second: Vec<_> = source.traverse().take(2).collect();
        assert_eq!(first, vec![1, 3, 9, 27, 81]);
        assert_eq!(second, vec![1, 3]);
        assert_eq!(source.traverse().size_hint(), (usize::MAX, None));
    }

    #[test]
    fn lazy_evaluate_reruns_per_traversal_over_reentrant_input() {
        let source = LazyEvaluate::new(Stream::of(vec![3, 5, 4, 2, 1]), |it| {
            let mut v: Vec<i32> = it.collect();
            v.sort();
            v
        });
        assert_eq!(source.traverse().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(source.traverse().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }
}

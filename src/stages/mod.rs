//! Stage implementations for the lazystream library.
//!
//! This module provides the cursors behind the stateful intermediate
//! operations of a stream. Each one pulls from its upstream on demand.

use std::iter::{Fuse, FusedIterator};

/// A stage that aggregates the i-th element of every inner sequence.
///
/// Without a fill value it stops at the shortest inner sequence; with one
/// it runs to the longest and fills the gaps.
pub struct ZipAll<I: Iterator> {
    iters: Vec<Fuse<I>>,
    fill: Option<I::Item>,
    done: bool,
}

impl<I: Iterator> ZipAll<I> {
    /// Create a new zip stage over the given inner sequences
    pub fn new(iters: Vec<I>, fill: Option<I::Item>) -> Self {
        Self {
            iters: iters.into_iter().map(Iterator::fuse).collect(),
            fill,
            done: false,
        }
    }
}

impl<I> Iterator for ZipAll<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.iters.is_empty() {
            return None;
        }

        let row = match &self.fill {
            None => self.iters.iter_mut().map(Iterator::next).collect(),
            Some(fill) => {
                let mut any = false;
                let row: Vec<_> = self
                    .iters
                    .iter_mut()
                    .map(|it| match it.next() {
                        Some(item) => {
                            any = true;
                            item
                        }
                        None => fill.clone(),
                    })
                    .collect();
                any.then_some(row)
            }
        };

        if row.is_none() {
            self.done = true;
        }
        row
    }
}

impl<I> FusedIterator for ZipAll<I>
where
    I: Iterator,
    I::Item: Clone,
{
}

/// A stage that partitions items into groups of a fixed size.
///
/// The last group may be short; with a fill value it is padded instead.
pub struct Group<I: Iterator> {
    inner: I,
    size: usize,
    fill: Option<I::Item>,
    done: bool,
}

impl<I: Iterator> Group<I> {
    /// Create a new group stage; `size` must be positive
    pub fn new(inner: I, size: usize, fill: Option<I::Item>) -> Self {
        Self {
            inner,
            size,
            fill,
            done: false,
        }
    }
}

impl<I> Iterator for Group<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut group = Vec::with_capacity(self.size);
        group.extend(self.inner.by_ref().take(self.size));

        if group.len() == self.size {
            return Some(group);
        }

        self.done = true;
        if group.is_empty() {
            return None;
        }
        if let Some(fill) = &self.fill {
            group.resize(self.size, fill.clone());
        }
        Some(group)
    }
}

impl<I> FusedIterator for Group<I>
where
    I: Iterator,
    I::Item: Clone,
{
}

/// A stage that splits items into runs of consecutive equal keys.
///
/// Each run is buffered before it is yielded, so it stays readable after
/// the stage moves on to the next run.
pub struct GroupRuns<I: Iterator, F, K> {
    inner: I,
    key: F,
    pending: Option<(K, I::Item)>,
}

impl<I, F, K> GroupRuns<I, F, K>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
{
    /// Create a new run-grouping stage
    pub fn new(inner: I, key: F) -> Self {
        Self {
            inner,
            key,
            pending: None,
        }
    }
}

impl<I, F, K> Iterator for GroupRuns<I, F, K>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    K: PartialEq,
{
    type Item = (K, Vec<I::Item>);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, first) = match self.pending.take() {
            Some(pending) => pending,
            None => {
                let item = self.inner.next()?;
                ((self.key)(&item), item)
            }
        };

        let mut run = vec![first];
        for item in self.inner.by_ref() {
            let next_key = (self.key)(&item);
            if next_key != key {
                self.pending = Some((next_key, item));
                break;
            }
            run.push(item);
        }
        Some((key, run))
    }
}

/// A stage that replays its upstream endlessly.
///
/// The first pass is pulled lazily from upstream and cached; later passes
/// replay the cache, so a single-pass upstream works. An empty upstream
/// yields nothing.
pub struct CycleCached<I: Iterator> {
    inner: Option<I>,
    cache: Vec<I::Item>,
    pos: usize,
}

impl<I: Iterator> CycleCached<I> {
    /// Create a new caching cycle stage
    pub fn new(inner: I) -> Self {
        Self {
            inner: Some(inner),
            cache: Vec::new(),
            pos: 0,
        }
    }
}

impl<I> Iterator for CycleCached<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(inner) = self.inner.as_mut() {
            match inner.next() {
                Some(item) => {
                    self.cache.push(item.clone());
                    return Some(item);
                }
                None => self.inner = None,
            }
        }

        if self.cache.is_empty() {
            return None;
        }
        let item = self.cache[self.pos % self.cache.len()].clone();
        self.pos = (self.pos + 1) % self.cache.len();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = self.inner.as_ref().map_or(0, |inner| inner.size_hint().0);
        if pending > 0 || !self.cache.is_empty() {
            (usize::MAX, None)
        } else {
            (0, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_stops_at_shortest() {
        let rows = vec![vec![1, 2, 3].into_iter(), vec![4, 5].into_iter()];
        let zipped: Vec<_> = ZipAll::new(rows, None).collect();
        assert_eq!(zipped, vec![vec![1, 4], vec![2, 5]]);
    }

    #[test]
    fn zip_fills_to_longest() {
        let rows = vec![vec![1, 2, 3].into_iter(), vec![4].into_iter()];
        let zipped: Vec<_> = ZipAll::new(rows, Some(0)).collect();
        assert_eq!(zipped, vec![vec![1, 4], vec![2, 0], vec![3, 0]]);
    }

    #[test]
    fn zip_of_nothing_is_empty() {
        let rows: Vec<std::vec::IntoIter<i32>> = Vec::new();
        assert_eq!(ZipAll::new(rows, Some(0)).count(), 0);
    }

    #[test]
    fn group_short_and_padded() {
        let short: Vec<_> = Group::new(0..10, 3, None).collect();
        assert_eq!(short.last(), Some(&vec![9]));
        assert_eq!(short.len(), 4);

        let padded: Vec<_> = Group::new(0..10, 3, Some(0)).collect();
        assert_eq!(padded.last(), Some(&vec![9, 0, 0]));

        let exact: Vec<_> = Group::new(0..6, 3, Some(0)).collect();
        assert_eq!(exact, vec![vec![0, 1, 2], vec![3, 4, 5]]);

        let mut nothing = Group::new(std::iter::empty::<i32>(), 3, Some(0));
        assert_eq!(nothing.next(), None);
        assert_eq!(nothing.next(), None);
    }

    #[test]
    fn runs_split_on_key_change() {
        let runs: Vec<_> = GroupRuns::new(vec![1, 1, 2, 1].into_iter(), |x: &i32| *x).collect();
        assert_eq!(
            runs,
            vec![(1, vec![1, 1]), (2, vec![2]), (1, vec![1])]
        );
    }

    #[test]
    fn cycle_replays_single_pass_input() {
        let once = vec![1, 2].into_iter();
        let cycled: Vec<_> = CycleCached::new(once).take(5).collect();
        assert_eq!(cycled, vec![1, 2, 1, 2, 1]);

        let mut empty = CycleCached::new(std::iter::empty::<i32>());
        assert_eq!(empty.next(), None);
    }
}

//! The chainable stream.
//!
//! A [`Stream`] holds one sequence reference. Intermediate operations take
//! the stream by value and hand back a new one wrapping the composed
//! sequence; nothing is pulled until a terminal operation (see
//! [`terminal`]) asks for it.
//!
//! A stream is either *re-entrant* (every traversal starts over from the
//! beginning) or *single-pass* (traversals share one cursor). Stages that
//! work element by element keep the mode of their upstream; stages that
//! need the whole upstream before producing anything are deferred and
//! always single-pass.
//!
//! Streams are not `Send`. A single-pass cursor is meant for exactly one
//! consumer at a time.

pub mod terminal;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::ops::Range;
use std::rc::Rc;

use crate::core::{Error, Result, ReversibleSource, Source, Truthy, Unpack};
use crate::deferred::Deferred;
use crate::seq::{BoxIter, Cursor, Factory, Iter, Seq};
use crate::sources::{Iterate, LazyEvaluate, RangeSource, Shared};
use crate::stages::{CycleCached, Group, GroupRuns, ZipAll};
use crate::telemetry::debug;

/// A lazy, chainable sequence pipeline.
///
/// # Examples
///
/// ```rust
/// use lazystream::Stream;
///
/// let total = Stream::of(vec![1, 2, 3])
///     .map(|x| x * x)
///     .filter(|x| x % 2 == 1)
///     .sum::<i32>();
/// assert_eq!(total, 10);
/// ```
pub struct Stream<T> {
    seq: Seq<T>,
    /// Set when the stream is known never to end
    endless: bool,
}

impl<T> Clone for Stream<T> {
    /// Re-entrant clones restart independently; single-pass clones share
    /// the cursor.
    fn clone(&self) -> Self {
        Self {
            seq: self.seq.clone(),
            endless: self.endless,
        }
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match &self.seq {
            Seq::Reentrant { backward, .. } if backward.is_some() => "reentrant+reversible",
            Seq::Reentrant { .. } => "reentrant",
            Seq::SinglePass(_) => "single-pass",
        };
        f.debug_struct("Stream")
            .field("mode", &mode)
            .field("endless", &self.endless)
            .finish()
    }
}

// Constructors
impl<T: 'static> Stream<T> {
    fn from_seq(seq: Seq<T>) -> Self {
        Self {
            seq,
            endless: false,
        }
    }

    fn mark_endless(mut self, endless: bool) -> Self {
        self.endless = endless;
        self
    }

    /// An empty re-entrant stream
    pub fn empty() -> Self {
        let none: Factory<T> = Rc::new(|| Box::new(std::iter::empty()) as BoxIter<T>);
        Self::from_seq(Seq::Reentrant {
            forward: none.clone(),
            backward: Some(none),
        })
    }

    /// A single-pass stream over any iterable.
    ///
    /// The iterable is traversed at most once; every traversal of the
    /// stream pulls from the same cursor.
    pub fn single_pass<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::from_seq(Seq::SinglePass(Cursor::new(iter.into_iter())))
    }

    /// A re-entrant stream over a source descriptor
    pub fn from_source<S>(source: S) -> Self
    where
        S: Source<Item = T> + 'static,
        S::Iter: 'static,
    {
        Self::from_seq(Seq::Reentrant {
            forward: Rc::new(move || Box::new(source.traverse()) as BoxIter<T>),
            backward: None,
        })
    }

    /// A re-entrant stream over a source that can also walk backwards;
    /// `reverse` on such a stream stays re-entrant and copies nothing.
    pub fn from_reversible<S>(source: S) -> Self
    where
        S: ReversibleSource<Item = T> + 'static,
        S::Iter: 'static,
        S::RevIter: 'static,
    {
        let source = Rc::new(source);
        let rev = source.clone();
        Self::from_seq(Seq::Reentrant {
            forward: Rc::new(move || Box::new(source.traverse()) as BoxIter<T>),
            backward: Some(Rc::new(move || Box::new(rev.traverse_rev()) as BoxIter<T>)),
        })
    }

    /// Build a stream from zero, one or many sources.
    ///
    /// No sources give an empty re-entrant stream, one source is adopted
    /// as is, and several are concatenated into a single-pass stream.
    ///
    /// ```rust
    /// use lazystream::Stream;
    ///
    /// let s = Stream::new([vec![1, 2], vec![3, 4], vec![5]]);
    /// assert_eq!(s.to::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    /// assert!(!s.is_reentrant());
    /// ```
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Stream<T>>,
    {
        let mut streams: Vec<Stream<T>> = sources.into_iter().map(Into::into).collect();
        match streams.len() {
            0 => Self::empty(),
            1 => streams.remove(0),
            _ => Self::concat(streams),
        }
    }

    fn concat(streams: Vec<Stream<T>>) -> Self {
        let endless = streams.iter().any(|s| s.endless);
        Self::single_pass(streams.into_iter().flatten()).mark_endless(endless)
    }

    /// A stream that runs an eager whole-sequence function over `upstream`,
    /// deferred until the first element is pulled.
    ///
    /// The result is re-entrant when `upstream` is, re-running `f` once per
    /// traversal.
    pub fn lazy_evaluate<U, F, J>(upstream: Stream<U>, f: F) -> Self
    where
        U: 'static,
        F: Fn(Iter<U>) -> J + 'static,
        J: IntoIterator<Item = T> + 'static,
        J::IntoIter: 'static,
    {
        let endless = upstream.endless;
        let stream = if upstream.is_reentrant() {
            Self::from_source(LazyEvaluate::new(upstream, f))
        } else {
            Self::single_pass(Deferred::new(upstream.iter(), f))
        };
        stream.mark_endless(endless)
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// A re-entrant, reversible stream over fixed values
    pub fn of(values: Vec<T>) -> Self {
        Self::from_reversible(Shared::new(values))
    }

    /// An endless re-entrant stream `seed, f(seed), f(f(seed)), ...`
    ///
    /// ```rust
    /// use lazystream::Stream;
    ///
    /// let powers = Stream::iterate(1, |x| x * 3);
    /// assert_eq!(powers.take(5), vec![1, 3, 9, 27, 81]);
    /// ```
    pub fn iterate<F>(seed: T, f: F) -> Self
    where
        F: Fn(&T) -> T + 'static,
    {
        Self::from_source(Iterate::new(seed, f)).mark_endless(true)
    }
}

impl Stream<i64> {
    /// A re-entrant, reversible stream over `range`
    pub fn range(range: Range<i64>) -> Self {
        Self::from_reversible(RangeSource::counting(range.start, range.end, false))
    }

    /// A re-entrant stream `start, start + step, ...` stopping before
    /// `stop`, or unbounded when `stop` is `None`. A zero step is rejected.
    pub fn range_by(start: i64, stop: Option<i64>, step: i64) -> Result<Self> {
        let endless = stop.is_none();
        let stop = stop.unwrap_or(if step < 0 { i64::MIN } else { i64::MAX });
        Ok(Self::from_reversible(RangeSource::new(start, stop, step)?).mark_endless(endless))
    }

    /// Like [`range_by`](Stream::range_by) with the step chosen from the
    /// bounds: `-1` when `start > stop`, `1` otherwise.
    pub fn range_auto(start: i64, stop: Option<i64>) -> Self {
        let source = match stop {
            Some(stop) => RangeSource::counting(start, stop, start > stop),
            None => RangeSource::counting(start, i64::MAX, false),
        };
        Self::from_reversible(source).mark_endless(stop.is_none())
    }
}

impl<T: Clone + 'static> From<Vec<T>> for Stream<T> {
    fn from(values: Vec<T>) -> Self {
        Self::of(values)
    }
}

impl From<Range<i64>> for Stream<i64> {
    fn from(range: Range<i64>) -> Self {
        Self::range(range)
    }
}

impl<T: Clone + 'static> FromIterator<T> for Stream<T> {
    /// Collects the values; the result is re-entrant.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::of(iter.into_iter().collect())
    }
}

// Reentrancy
impl<T: 'static> Stream<T> {
    /// Whether traversals of this stream start over from the beginning
    pub fn is_reentrant(&self) -> bool {
        matches!(self.seq, Seq::Reentrant { .. })
    }

    /// Whether the stream is known never to end.
    ///
    /// Set by `iterate`, `cycle` and ranges without a stop, and carried
    /// through later stages until `limit` or a bounded `slice`.
    pub fn is_endless(&self) -> bool {
        self.endless
    }

    /// Make the stream single-pass; a no-op when it already is.
    pub fn nonreentrant(self) -> Self {
        let endless = self.endless;
        let stream = match self.seq {
            Seq::Reentrant { forward, .. } => Self::single_pass(forward()),
            single => Self::from_seq(single),
        };
        stream.mark_endless(endless)
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// Make the stream re-entrant by caching every remaining value; a no-op
    /// when it already is.
    ///
    /// Fails with [`Error::Endless`] when the stream is known to be endless
    /// (built on `iterate`, `cycle` or a range without a stop) or when the
    /// cursor reports more values than a `Vec` can hold. An endless custom
    /// cursor that does not say so never returns.
    pub fn reentrant(self) -> Result<Self> {
        if self.endless && !self.is_reentrant() {
            return Err(Error::Endless);
        }
        let cursor = match self.seq {
            Seq::SinglePass(cursor) => cursor,
            reentrant => return Ok(Self::from_seq(reentrant).mark_endless(self.endless)),
        };
        let capacity = isize::MAX as usize / std::mem::size_of::<T>().max(1);
        if cursor.size_hint().0 > capacity {
            return Err(Error::Endless);
        }
        let items: Vec<T> = cursor.collect();
        debug!(items = items.len(), "cached single-pass stream");
        Ok(Self::of(items))
    }
}

// Element-wise stages
impl<T: 'static> Stream<T> {
    /// Apply `stage` to every traversal. On a re-entrant stream the stage
    /// is re-applied per traversal, and to the reverse traversal as well
    /// when `keeps_reverse` is set.
    fn restage<U, G>(self, stage: G, keeps_reverse: bool) -> Stream<U>
    where
        U: 'static,
        G: Fn(BoxIter<T>) -> BoxIter<U> + 'static,
    {
        let endless = self.endless;
        let stream = match self.seq {
            Seq::Reentrant { forward, backward } => {
                let stage = Rc::new(stage);
                let backward = match backward {
                    Some(backward) if keeps_reverse => {
                        let stage = stage.clone();
                        let factory: Factory<U> = Rc::new(move || stage(backward()));
                        Some(factory)
                    }
                    _ => None,
                };
                Stream::from_seq(Seq::Reentrant {
                    forward: Rc::new(move || stage(forward())),
                    backward,
                })
            }
            Seq::SinglePass(cursor) => Stream::single_pass(stage(Box::new(cursor))),
        };
        stream.mark_endless(endless)
    }

    /// Run `transform` over the whole upstream on first pull
    fn deferred<U, F, J>(self, transform: F) -> Stream<U>
    where
        U: 'static,
        F: FnOnce(Iter<T>) -> J + 'static,
        J: IntoIterator<Item = U> + 'static,
        J::IntoIter: 'static,
    {
        let endless = self.endless;
        Stream::single_pass(Deferred::new(self.iter(), transform)).mark_endless(endless)
    }

    /// Apply `f` to each value
    pub fn map<U, F>(self, f: F) -> Stream<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        let f = Rc::new(f);
        self.restage(
            move |it| {
                let f = f.clone();
                Box::new(it.map(move |x| f(x))) as BoxIter<U>
            },
            true,
        )
    }

    /// Apply `f` to each value unpacked as positional arguments.
    ///
    /// ```rust
    /// use lazystream::Stream;
    ///
    /// let s = Stream::of(vec![(2i64, 5u32), (3, 2), (10, 3)]).starmap(|b: i64, e: u32| b.pow(e));
    /// assert_eq!(s.to::<Vec<_>>(), vec![32, 9, 1000]);
    /// ```
    pub fn starmap<F>(self, f: F) -> Stream<F::Output>
    where
        F: Unpack<T> + 'static,
        F::Output: 'static,
    {
        self.map(move |args| f.call_unpacked(args))
    }

    /// Keep the values matching `predicate`
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        self.restage(
            move |it| {
                let predicate = predicate.clone();
                Box::new(it.filter(move |x| predicate(x))) as BoxIter<T>
            },
            true,
        )
    }

    /// Keep the truthy values
    pub fn filter_truthy(self) -> Self
    where
        T: Truthy,
    {
        self.filter(Truthy::is_truthy)
    }

    /// Pair each value with its zero-based position
    pub fn enumerate(self) -> Stream<(usize, T)> {
        self.restage(|it| Box::new(it.enumerate()) as BoxIter<(usize, T)>, false)
    }

    /// Keep the values at positions `start, start + step, ...` before
    /// `stop` (unbounded when `None`). A zero step is rejected.
    ///
    /// ```rust
    /// use lazystream::Stream;
    ///
    /// let s = Stream::range(0..10).slice(1, Some(5), 2).unwrap();
    /// assert_eq!(s.to::<Vec<_>>(), vec![1, 3]);
    /// ```
    pub fn slice(self, start: usize, stop: Option<usize>, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(Error::invalid_argument("step", "must be positive"));
        }
        let bounded = stop.is_some();
        let sliced = self.restage(
            move |it| {
                let it = it.skip(start);
                match stop {
                    Some(stop) => {
                        Box::new(it.take(stop.saturating_sub(start)).step_by(step)) as BoxIter<T>
                    }
                    None => Box::new(it.step_by(step)) as BoxIter<T>,
                }
            },
            false,
        );
        Ok(if bounded { sliced.mark_endless(false) } else { sliced })
    }

    /// Keep only the first `count` values
    pub fn limit(self, count: usize) -> Self {
        self.restage(move |it| Box::new(it.take(count)) as BoxIter<T>, false)
            .mark_endless(false)
    }

    /// Drop the first `count` values
    pub fn skip(self, count: usize) -> Self {
        self.restage(move |it| Box::new(it.skip(count)) as BoxIter<T>, false)
    }

    /// Splice `sources` in front of this stream; the result is single-pass
    /// unless `sources` is empty.
    pub fn prepend<I, S>(self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Stream<T>>,
    {
        let mut streams: Vec<Stream<T>> = sources.into_iter().map(Into::into).collect();
        if streams.is_empty() {
            return self;
        }
        streams.push(self);
        Self::concat(streams)
    }

    /// Splice `sources` after this stream; the result is single-pass unless
    /// `sources` is empty.
    pub fn append<I, S>(self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Stream<T>>,
    {
        let mut streams = vec![self];
        streams.extend(sources.into_iter().map(Into::into));
        if streams.len() == 1 {
            return streams.remove(0);
        }
        Self::concat(streams)
    }

    /// Replay the stream endlessly.
    ///
    /// The first pass is cached as it is pulled, so a single-pass upstream
    /// works too. The result is single-pass and counts as endless even when
    /// the upstream turns out to be empty.
    pub fn cycle(self) -> Self
    where
        T: Clone,
    {
        Self::single_pass(CycleCached::new(self.iter())).mark_endless(true)
    }

    /// Split into runs of consecutive values with equal keys.
    ///
    /// Only adjacent values are merged, so a key that reappears later
    /// starts a new group. Each group is buffered and stays readable after
    /// the next one is pulled. The result is single-pass.
    pub fn group_runs<K, F>(self, key: F) -> Stream<(K, Stream<T>)>
    where
        K: PartialEq + 'static,
        F: Fn(&T) -> K + 'static,
    {
        let endless = self.endless;
        let runs = GroupRuns::new(self.iter(), key);
        Stream::single_pass(runs.map(|(key, run)| (key, Stream::single_pass(run))))
            .mark_endless(endless)
    }
}

// Whole-sequence stages
impl<T: 'static> Stream<T> {
    /// Concatenate the inner sequences of each value
    pub fn flatten(self) -> Stream<T::Item>
    where
        T: IntoIterator,
        T::Item: 'static,
        T::IntoIter: 'static,
    {
        self.deferred(|it| it.flatten())
    }

    fn sorted_by<C>(self, compare: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering + 'static,
    {
        self.deferred(move |it| {
            let mut items: Vec<T> = it.collect();
            debug!(items = items.len(), "sorting stream");
            items.sort_by(|a, b| compare(a, b));
            items
        })
    }

    /// Sort ascending; equal values keep their order
    pub fn sort(self) -> Self
    where
        T: Ord,
    {
        self.sorted_by(|a, b| a.cmp(b))
    }

    /// Sort descending; equal values keep their order
    pub fn sort_desc(self) -> Self
    where
        T: Ord,
    {
        self.sorted_by(|a, b| b.cmp(a))
    }

    /// Stable sort by `key`, computed once per value
    pub fn sort_by_key<K, F>(self, key: F, reverse: bool) -> Self
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.deferred(move |it| {
            let mut keyed: Vec<(K, T)> = it.map(|x| (key(&x), x)).collect();
            debug!(items = keyed.len(), reverse, "sorting stream by key");
            if reverse {
                keyed.sort_by(|a, b| b.0.cmp(&a.0));
            } else {
                keyed.sort_by(|a, b| a.0.cmp(&b.0));
            }
            keyed.into_iter().map(|(_, x)| x)
        })
    }

    /// Group by key, one group per distinct key in ascending key order.
    ///
    /// Sorts first so that equal keys become adjacent, then behaves like
    /// [`group_runs`](Stream::group_runs).
    ///
    /// ```rust
    /// use lazystream::Stream;
    ///
    /// let groups = Stream::of(vec![("a", 1), ("b", 2), ("a", 2)])
    ///     .group_by(|x| x.0)
    ///     .map(|(k, g)| (k, g.map(|x| x.1).to::<Vec<_>>()))
    ///     .to::<Vec<_>>();
    /// assert_eq!(groups, vec![("a", vec![1, 2]), ("b", vec![2])]);
    /// ```
    pub fn group_by<K, F>(self, key: F) -> Stream<(K, Stream<T>)>
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        let key = Rc::new(key);
        let run_key = key.clone();
        self.sort_by_key(move |x| key(x), false)
            .group_runs(move |x| run_key(x))
    }

    /// Reverse the order of the values.
    ///
    /// A reversible re-entrant stream is walked backwards in place and
    /// stays re-entrant; anything else is collected first and becomes
    /// single-pass.
    pub fn reverse(self) -> Self {
        let endless = self.endless;
        match self.seq {
            Seq::Reentrant {
                forward,
                backward: Some(backward),
            } => Self::from_seq(Seq::Reentrant {
                forward: backward,
                backward: Some(forward),
            })
            .mark_endless(endless),
            seq => Self::from_seq(seq).mark_endless(endless).deferred(|it| {
                let mut items: Vec<T> = it.collect();
                items.reverse();
                items
            }),
        }
    }

    /// Aggregate the i-th element of every inner sequence into one row per
    /// index.
    ///
    /// Without `fill` the rows stop at the shortest inner sequence; with it
    /// they run to the longest, padding missing slots.
    pub fn zip<U>(self, fill: Option<U>) -> Stream<Vec<U>>
    where
        T: IntoIterator<Item = U>,
        T::IntoIter: 'static,
        U: Clone + 'static,
    {
        self.deferred(move |it| ZipAll::new(it.map(IntoIterator::into_iter).collect(), fill))
    }

    /// Partition into groups of `count` consecutive values.
    ///
    /// The last group is short unless `fill` pads it to `count`. A zero
    /// count is rejected.
    pub fn group(self, count: usize, fill: Option<T>) -> Result<Stream<Vec<T>>>
    where
        T: Clone,
    {
        if count == 0 {
            return Err(Error::invalid_argument("count", "must be positive"));
        }
        Ok(self.deferred(move |it| Group::new(it, count, fill)))
    }

    /// Keep the first occurrence of every value, in order
    pub fn unique(self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        self.deferred(|it| {
            let mut seen = HashSet::new();
            let items: Vec<T> = it.filter(|x| seen.insert(x.clone())).collect();
            debug!(items = items.len(), "deduplicated stream");
            items
        })
    }

    /// Repeat the whole stream `times` times
    pub fn repeat(self, times: usize) -> Self
    where
        T: Clone,
    {
        self.deferred(move |it| {
            let items: Vec<T> = it.collect();
            debug!(items = items.len(), times, "repeating stream");
            std::iter::repeat(items).take(times).flatten()
        })
    }
}

//! Deferred whole-sequence evaluation.
//!
//! [`Deferred`] holds an upstream traversal and a transform that needs the
//! entire upstream before it can produce anything (sorting, deduplication,
//! grouping). Nothing runs until the first element is requested; the
//! transform then runs exactly once and every later request draws from its
//! result. Once that result is exhausted the cursor stays exhausted.

use std::fmt;

use crate::telemetry::debug;

enum State<I, F, J> {
    Pending { upstream: I, transform: F },
    Resolving,
    Resolved(J),
}

/// A cursor that postpones a whole-sequence transform until first pulled.
///
/// # Examples
///
/// ```rust
/// use lazystream::Deferred;
///
/// let mut sorted = Deferred::new(vec![3, 1, 2].into_iter(), |it| {
///     let mut v: Vec<_> = it.collect();
///     v.sort();
///     v
/// });
/// assert!(!sorted.is_resolved());
/// assert_eq!(sorted.next(), Some(1));
/// assert!(sorted.is_resolved());
/// ```
pub struct Deferred<I, F, J>
where
    J: IntoIterator,
{
    state: State<I, F, J::IntoIter>,
}

impl<I, F, J> Deferred<I, F, J>
where
    F: FnOnce(I) -> J,
    J: IntoIterator,
{
    /// Wrap `upstream` so that `transform` runs on first pull
    pub fn new(upstream: I, transform: F) -> Self {
        Self {
            state: State::Pending {
                upstream,
                transform,
            },
        }
    }

    /// Whether the transform has already been invoked
    pub fn is_resolved(&self) -> bool {
        !matches!(self.state, State::Pending { .. })
    }

    fn resolve(&mut self) -> Option<&mut J::IntoIter> {
        if let State::Pending { .. } = self.state {
            if let State::Pending {
                upstream,
                transform,
            } = std::mem::replace(&mut self.state, State::Resolving)
            {
                debug!("resolving deferred stage");
                self.state = State::Resolved(transform(upstream).into_iter());
            }
        }
        match &mut self.state {
            State::Resolved(result) => Some(result),
            // Only reachable after the transform panicked.
            _ => None,
        }
    }
}

impl<I, F, J> Iterator for Deferred<I, F, J>
where
    F: FnOnce(I) -> J,
    J: IntoIterator,
{
    type Item = J::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.resolve()?.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.state {
            State::Resolved(result) => result.size_hint(),
            _ => (0, None),
        }
    }
}

impl<I, F, J> fmt::Debug for Deferred<I, F, J>
where
    J: IntoIterator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::Pending { .. } => "pending",
            State::Resolving => "resolving",
            State::Resolved(_) => "resolved",
        };
        f.debug_struct("Deferred").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn transform_runs_once_on_first_pull() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut deferred = Deferred::new(vec![3, 1, 2].into_iter(), move |it| {
            counter.set(counter.get() + 1);
            let mut v: Vec<i32> = it.collect();
            v.sort();
            v
        });

        assert_eq!(calls.get(), 0);
        assert_eq!(deferred.next(), Some(1));
        assert_eq!(deferred.next(), Some(2));
        assert_eq!(deferred.next(), Some(3));
        assert_eq!(deferred.next(), None);
        assert_eq!(deferred.next(), None);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn never_pulled_never_runs() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let deferred = Deferred::new(0..10, move |it| {
            counter.set(counter.get() + 1);
            it
        });
        assert!(!deferred.is_resolved());
        drop(deferred);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn size_hint_is_unknown_until_resolved() {
        let mut deferred = Deferred::new(0..4, |it| it.collect::<Vec<_>>());
        assert_eq!(deferred.size_hint(), (0, None));
        deferred.next();
        assert_eq!(deferred.size_hint(), (3, Some(3)));
    }
}

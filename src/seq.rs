//! The sequence reference a stream holds.
//!
//! A sequence is either re-entrant, backed by factories that start a fresh
//! traversal on every call, or single-pass, backed by one shared cursor.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub(crate) type BoxIter<T> = Box<dyn Iterator<Item = T>>;
pub(crate) type Factory<T> = Rc<dyn Fn() -> BoxIter<T>>;

pub(crate) enum Seq<T> {
    Reentrant {
        forward: Factory<T>,
        /// Present when the source can be walked back to front directly.
        backward: Option<Factory<T>>,
    },
    SinglePass(Cursor<T>),
}

impl<T> Clone for Seq<T> {
    fn clone(&self) -> Self {
        match self {
            Seq::Reentrant { forward, backward } => Seq::Reentrant {
                forward: forward.clone(),
                backward: backward.clone(),
            },
            Seq::SinglePass(cursor) => Seq::SinglePass(cursor.clone()),
        }
    }
}

impl<T: 'static> Seq<T> {
    pub(crate) fn traverse(&self) -> Iter<T> {
        match self {
            Seq::Reentrant { forward, .. } => Iter(forward()),
            Seq::SinglePass(cursor) => Iter(Box::new(cursor.clone())),
        }
    }
}

/// A shared single-pass cursor.
///
/// Clones advance the same underlying state. Pulling from a cursor while
/// it is already being pulled (from inside one of its own stage closures)
/// panics.
pub struct Cursor<T> {
    inner: Rc<RefCell<BoxIter<T>>>,
}

impl<T> Cursor<T> {
    pub(crate) fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = T> + 'static,
    {
        Self {
            inner: Rc::new(RefCell::new(Box::new(iter))),
        }
    }
}

impl<T> Clone for Cursor<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.borrow_mut().next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.borrow().size_hint()
    }
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("holders", &Rc::strong_count(&self.inner))
            .finish()
    }
}

/// One traversal of a stream.
///
/// For a re-entrant stream this is an independent walk from the start; for
/// a single-pass stream it pulls from the stream's shared cursor.
pub struct Iter<T>(pub(crate) BoxIter<T>);

impl<T> Iterator for Iter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> fmt::Debug for Iter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.0.size_hint()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_clones_share_state() {
        let mut a = Cursor::new(1..=3);
        let mut b = a.clone();
        assert_eq!(a.next(), Some(1));
        assert_eq!(b.next(), Some(2));
        assert_eq!(a.next(), Some(3));
        assert_eq!(b.next(), None);
    }

    #[test]
    fn reentrant_traversals_are_independent() {
        let data: Rc<[i32]> = Rc::from(vec![1, 2]);
        let seq = Seq::Reentrant {
            forward: Rc::new(move || Box::new(data.to_vec().into_iter()) as BoxIter<i32>),
            backward: None,
        };
        let mut first = seq.traverse();
        let second: Vec<_> = seq.traverse().collect();
        assert_eq!(first.next(), Some(1));
        assert_eq!(second, vec![1, 2]);
    }
}

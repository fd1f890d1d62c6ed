//! Utility functions and helper types.

use crate::core::{Result, Sink, Source};

/// Helper function to create a re-entrant source from a function that
/// starts a new traversal each time it is called
///
/// ```rust
/// use lazystream::util::from_fn;
/// use lazystream::Stream;
///
/// let s = Stream::from_source(from_fn(|| "a,b,c".split(',')));
/// assert_eq!(s.join(""), "abc");
/// assert_eq!(s.join("-"), "a-b-c");
/// ```
pub fn from_fn<F, I>(f: F) -> FnSource<F>
where
    F: Fn() -> I,
    I: Iterator,
{
    FnSource { f }
}

/// A source created from a function
pub struct FnSource<F> {
    pub f: F,
}

impl<F, I> Source for FnSource<F>
where
    F: Fn() -> I,
    I: Iterator,
{
    type Item = I::Item;
    type Iter = I;

    fn traverse(&self) -> Self::Iter {
        (self.f)()
    }
}

/// Helper function to create a simple sink from a function
pub fn sink_from_fn<F, T>(f: F) -> FnSink<F, T>
where
    F: FnMut(T) -> Result<()>,
{
    FnSink {
        f,
        _phantom: std::marker::PhantomData,
    }
}

/// A sink created from a function
pub struct FnSink<F, T>
where
    F: FnMut(T) -> Result<()>,
{
    pub f: F,
    _phantom: std::marker::PhantomData<fn(T)>,
}

impl<F, T> Sink for FnSink<F, T>
where
    F: FnMut(T) -> Result<()>,
{
    type Item = T;

    fn write(&mut self, item: Self::Item) -> Result<()> {
        (self.f)(item)
    }
}

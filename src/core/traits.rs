//! Core traits for sources, sinks and element adapters.
//!
//! A [`Source`] is the re-entrant side of the source contract: a descriptor
//! that can start a fresh, independent traversal every time it is asked.
//! Anything that can only be traversed once enters a stream as a plain
//! iterator instead (see `Stream::single_pass`).

use crate::core::error::Result;

/// A re-entrant sequence descriptor.
///
/// Every call to [`traverse`](Source::traverse) must start from the
/// beginning and must not disturb traversals already in progress.
///
/// # Examples
///
/// ```rust
/// use lazystream::core::Source;
/// use lazystream::Stream;
///
/// struct Countdown(u32);
///
/// impl Source for Countdown {
///     type Item = u32;
///     type Iter = std::iter::Rev<std::ops::RangeInclusive<u32>>;
///
///     fn traverse(&self) -> Self::Iter {
///         (1..=self.0).rev()
///     }
/// }
///
/// let s = Stream::from_source(Countdown(3));
/// assert_eq!(s.to::<Vec<_>>(), vec![3, 2, 1]);
/// assert_eq!(s.to::<Vec<_>>(), vec![3, 2, 1]);
/// ```
pub trait Source {
    /// The type of items this source yields
    type Item;
    /// The traversal cursor handed out per request
    type Iter: Iterator<Item = Self::Item>;

    /// Start a new traversal from the beginning.
    fn traverse(&self) -> Self::Iter;
}

/// A re-entrant source that can also be traversed back to front without
/// materialising it first.
pub trait ReversibleSource: Source {
    /// The reverse traversal cursor
    type RevIter: Iterator<Item = Self::Item>;

    /// Start a new traversal from the end.
    fn traverse_rev(&self) -> Self::RevIter;
}

/// A sink accepts the items of a finished traversal.
///
/// # Examples
///
/// ```rust
/// use lazystream::core::{Result, Sink};
/// use lazystream::Stream;
///
/// struct Total(i64);
///
/// impl Sink for Total {
///     type Item = i64;
///
///     fn write(&mut self, item: i64) -> Result<()> {
///         self.0 += item;
///         Ok(())
///     }
/// }
///
/// let mut total = Total(0);
/// Stream::range(1..5).drain_into(&mut total).unwrap();
/// assert_eq!(total.0, 10);
/// ```
pub trait Sink {
    /// The type of items this sink accepts
    type Item;

    /// Write a single item.
    fn write(&mut self, item: Self::Item) -> Result<()>;

    /// Called once the traversal is exhausted.
    ///
    /// This allows sinks to flush any buffered state.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Calls a function with a tuple unpacked into its positional arguments.
///
/// Implemented for every `Fn` of arity one to six, which is what lets
/// `Stream::starmap` feed tuple elements to a multi-argument closure.
/// Closures passed this way need annotated parameter types.
pub trait Unpack<Args> {
    type Output;

    fn call_unpacked(&self, args: Args) -> Self::Output;
}

macro_rules! impl_unpack {
    ($($arg:ident),+) => {
        impl<Func, Out, $($arg),+> Unpack<($($arg,)+)> for Func
        where
            Func: Fn($($arg),+) -> Out,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn call_unpacked(&self, ($($arg,)+): ($($arg,)+)) -> Out {
                self($($arg),+)
            }
        }
    };
}

impl_unpack!(A);
impl_unpack!(A, B);
impl_unpack!(A, B, C);
impl_unpack!(A, B, C, D);
impl_unpack!(A, B, C, D, E);
impl_unpack!(A, B, C, D, E, G);

/// Value truthiness, the default predicate of `filter`, `all` and `any`.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

macro_rules! impl_truthy_num {
    ($zero:expr => $($t:ty),+) => {
        $(
            impl Truthy for $t {
                fn is_truthy(&self) -> bool {
                    *self != $zero
                }
            }
        )+
    };
}

impl_truthy_num!(0 => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_truthy_num!(0.0 => f32, f64);

impl Truthy for char {
    fn is_truthy(&self) -> bool {
        true
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for [T] {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

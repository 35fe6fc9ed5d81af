//! Type-level indices into a member list.
//!
//! An index is a Peano-style chain of marker types: [`Here`] is position 0
//! and [`There<I>`] is one past `I`. The markers carry no data; they only
//! exist so that trait resolution can pick *which* position of a member list
//! a type lives at. Each marker exposes its position as [`Index::VALUE`].
//!
//! Callers never name these types directly. They are inferred through
//! [`Contains`](crate::Contains) bounds, e.g. `union.get::<i32, _>()`.

use core::marker::PhantomData;

/// A type-level position in a member list.
pub trait Index: 'static {
    /// Zero-based position this marker stands for.
    const VALUE: usize;
}

/// Position 0 of a member list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Here;

/// The position directly after `I`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct There<I>(PhantomData<I>);

impl Index for Here {
    const VALUE: usize = 0;
}

impl<I: Index> Index for There<I> {
    const VALUE: usize = 1 + I::VALUE;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_values() {
        assert_eq!(Here::VALUE, 0);
        assert_eq!(<There<Here>>::VALUE, 1);
        assert_eq!(<There<There<There<Here>>>>::VALUE, 3);
    }

    #[test]
    fn test_markers_are_zero_sized() {
        static_assertions::assert_eq_size!(Here, ());
        static_assertions::assert_eq_size!(There<There<Here>>, ());
    }
}

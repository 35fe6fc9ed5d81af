use core::fmt;

/// A zero-sized placeholder member.
///
/// Listing `U0` in a union lets "holds nothing meaningful" be an ordinary
/// member state, distinct from the union being empty.
///
/// # Examples
///
/// ```
/// use holyunion::{U0, Union};
///
/// let mut union = Union::<(U0, i32, f64)>::new();
/// union.set(U0);
/// assert!(union.is::<U0, _>());
/// assert!(!union.is_empty());
/// assert_eq!(union.to_string(), "U0");
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct U0;

impl U0 {
    /// Size of a `U0` in bytes. Always `0`.
    pub const SIZE: usize = size_of::<Self>();

    /// Always `true`.
    #[inline]
    #[must_use]
    pub const fn is_void() -> bool {
        true
    }
}

impl fmt::Display for U0 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("U0")
    }
}

impl fmt::Debug for U0 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("U0")
    }
}

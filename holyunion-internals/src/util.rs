//! Internal utility types.

/// Marker type used when type-erasing union storage.
///
/// Pointers into a union's storage are handled as `NonNull<Erased>` whenever
/// the concrete member type is not known at the current scope. Only the
/// vtable selected by the discriminant knows the real type and casts the
/// pointer back.
///
/// Using a distinct marker type (rather than `u8` or `()`) makes it obvious
/// in signatures that the pointee type has been forgotten.
#[derive(Debug, Clone, Copy)]
pub struct Erased;

/// Returns the larger of two `usize` values in a `const` context.
#[inline]
pub(crate) const fn const_max(a: usize, b: usize) -> usize {
    if a > b { a } else { b }
}

//! Member lists: the fixed, ordered set of types a union may hold.
//!
//! A member list is a tuple `(T1, ..., Tn)` with `1 <= n <= 12`. For every
//! such tuple this module provides:
//!
//! - [`Members`]: the storage shape and the destructor table.
//! - [`CloneMembers`], [`DisplayMembers`], [`DebugMembers`]: the clone and
//!   formatting tables, available when every member supports the operation.
//! - [`Contains<T, I>`]: one impl per position, mapping a member type `T` to
//!   its index marker `I`.
//!
//! Resolving a member's index is plain trait resolution. A type missing
//! from the list has no [`Contains`] impl, and a type listed twice has two
//! impls whose index markers differ, so inference of `I` is ambiguous. Both
//! cases are rejected at compile time:
//!
//! ```compile_fail
//! use holyunion_internals::{Contains, RawUnion};
//!
//! let mut raw = RawUnion::<(i32, u8)>::new();
//! raw.write(1.5f64); // `f64` is not a member
//! ```
//!
//! ```compile_fail
//! use holyunion_internals::RawUnion;
//!
//! let mut raw = RawUnion::<(i32, i32)>::new();
//! raw.write(1i32); // ambiguous: `i32` is listed twice
//! ```

use crate::{
    index::{Here, Index, There},
    storage::{End, Slot},
    util::const_max,
    variant::{CloneVtable, FormatVtable, MemberVtable},
};

/// A fixed, ordered list of member types.
///
/// # Safety
///
/// Implementors must guarantee:
///
/// 1. `VTABLES[i]` was created by [`MemberVtable::new::<Ti>()`] where `Ti`
///    is the member at position `i`.
/// 2. `Storage` is at least as large and at least as aligned as every
///    member type.
/// 3. `VTABLES.len()` fits in an `i32`.
///
/// [`MemberVtable::new::<Ti>()`]: MemberVtable::new
pub unsafe trait Members: Sized + 'static {
    /// Type whose layout is the storage layout of the union.
    type Storage;

    /// Destructor table, indexed by discriminant.
    const VTABLES: &'static [&'static MemberVtable];

    /// Number of members in the list.
    const LEN: usize = Self::VTABLES.len();

    /// `max(size_of::<Ti>())` over all members.
    const MAX_SIZE: usize = max_size(Self::VTABLES);

    /// `max(align_of::<Ti>())` over all members.
    const MAX_ALIGN: usize = max_align(Self::VTABLES);
}

/// A member list whose members are all [`Clone`].
///
/// # Safety
///
/// Implementors must guarantee that `CLONE_VTABLES[i]` was created by
/// [`CloneVtable::new::<Ti>()`](CloneVtable::new) for the member at
/// position `i`, for every position of the list.
pub unsafe trait CloneMembers: Members {
    /// Clone table, indexed by discriminant.
    const CLONE_VTABLES: &'static [&'static CloneVtable];
}

/// A member list whose members all implement
/// [`Display`](core::fmt::Display).
///
/// # Safety
///
/// Implementors must guarantee that `DISPLAY_VTABLES[i]` was created by
/// [`FormatVtable::display::<Ti>()`](FormatVtable::display) for the member
/// at position `i`, for every position of the list.
pub unsafe trait DisplayMembers: Members {
    /// Display table, indexed by discriminant.
    const DISPLAY_VTABLES: &'static [&'static FormatVtable];
}

/// A member list whose members all implement [`Debug`](core::fmt::Debug).
///
/// # Safety
///
/// Implementors must guarantee that `DEBUG_VTABLES[i]` was created by
/// [`FormatVtable::debug::<Ti>()`](FormatVtable::debug) for the member at
/// position `i`, for every position of the list.
pub unsafe trait DebugMembers: Members {
    /// Debug table, indexed by discriminant.
    const DEBUG_VTABLES: &'static [&'static FormatVtable];
}

/// States that `T` is the member at position `I` of this list.
///
/// `I` is normally left for inference, which succeeds only when `T` appears
/// once in the list. A list that repeats a type, such as `(i32, i32)`, still
/// implements `Contains` once per position, so naming the index explicitly
/// (`write::<i32, Here>` or `write::<i32, There<Here>>`) compiles and selects
/// that position.
///
/// # Safety
///
/// Implementors must guarantee that the member at position `I::VALUE` of
/// the list is exactly `T`.
pub unsafe trait Contains<T: 'static, I: Index>: Members {
    /// Discriminant of `T` within this list.
    const INDEX: usize = I::VALUE;
}

/// Largest member size in a vtable table.
const fn max_size(vtables: &[&MemberVtable]) -> usize {
    let mut max = 0;
    let mut i = 0;
    while i < vtables.len() {
        max = const_max(max, vtables[i].size());
        i += 1;
    }
    max
}

/// Largest member alignment in a vtable table.
const fn max_align(vtables: &[&MemberVtable]) -> usize {
    let mut max = 1;
    let mut i = 0;
    while i < vtables.len() {
        max = const_max(max, vtables[i].align());
        i += 1;
    }
    max
}

/// Implements the member-list traits for one tuple arity.
macro_rules! impl_members {
    (@shape $head:ident) => {
        Slot<$head, End>
    };
    (@shape $head:ident, $($rest:ident),+) => {
        Slot<$head, impl_members!(@shape $($rest),+)>
    };
    (@contains [$($member:ident),+] $index:ty;) => {};
    (@contains [$($member:ident),+] $index:ty; $head:ident $(, $rest:ident)*) => {
        // SAFETY: `$index` counts one `There` per member before `$head`, so
        // `$index::VALUE` is the position of `$head` in the tuple.
        unsafe impl<$($member: 'static),+> Contains<$head, $index> for ($($member,)+) {}

        impl_members!(@contains [$($member),+] There<$index>; $($rest),*);
    };
    ($($member:ident),+) => {
        // SAFETY:
        // 1. The table lists `MemberVtable::new::<T>()` in tuple order.
        // 2. The storage shape is a `Slot` chain holding every member.
        // 3. Tuples have at most twelve members.
        unsafe impl<$($member: 'static),+> Members for ($($member,)+) {
            type Storage = impl_members!(@shape $($member),+);

            const VTABLES: &'static [&'static MemberVtable] =
                &[$(MemberVtable::new::<$member>()),+];
        }

        // SAFETY: The table lists `CloneVtable::new::<T>()` in tuple order.
        unsafe impl<$($member: Clone + 'static),+> CloneMembers for ($($member,)+) {
            const CLONE_VTABLES: &'static [&'static CloneVtable] =
                &[$(CloneVtable::new::<$member>()),+];
        }

        // SAFETY: The table lists `FormatVtable::display::<T>()` in tuple order.
        unsafe impl<$($member: core::fmt::Display + 'static),+> DisplayMembers
            for ($($member,)+)
        {
            const DISPLAY_VTABLES: &'static [&'static FormatVtable] =
                &[$(FormatVtable::display::<$member>()),+];
        }

        // SAFETY: The table lists `FormatVtable::debug::<T>()` in tuple order.
        unsafe impl<$($member: core::fmt::Debug + 'static),+> DebugMembers
            for ($($member,)+)
        {
            const DEBUG_VTABLES: &'static [&'static FormatVtable] =
                &[$(FormatVtable::debug::<$member>()),+];
        }

        impl_members!(@contains [$($member),+] Here; $($member),+);
    };
}

impl_members!(A);
impl_members!(A, B);
impl_members!(A, B, C);
impl_members!(A, B, C, D);
impl_members!(A, B, C, D, E);
impl_members!(A, B, C, D, E, F);
impl_members!(A, B, C, D, E, F, G);
impl_members!(A, B, C, D, E, F, G, H);
impl_members!(A, B, C, D, E, F, G, H, I);
impl_members!(A, B, C, D, E, F, G, H, I, J);
impl_members!(A, B, C, D, E, F, G, H, I, J, K);
impl_members!(A, B, C, D, E, F, G, H, I, J, K, L);

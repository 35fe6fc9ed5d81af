//! Vtables for type-erased member operations.
//!
//! A union only remembers the *index* of its active member. The vtables in
//! this module turn that index back into typed behavior: each member list
//! owns one static array of vtables per capability (see
//! [`Members`](crate::Members) and friends), and the discriminant selects
//! the entry built for the active member's type.
//!
//! The fields of every vtable are private to this module. This visibility
//! restriction guarantees the safety invariant: **a vtable created by
//! `new::<T>()` only ever contains function pointers instantiated with that
//! same `T`**.

use core::{any::TypeId, fmt, ptr::NonNull};

use crate::util::Erased;

/// Vtable holding the identity, layout and destructor of one member type.
///
/// # Safety Invariant
///
/// The field `drop` is guaranteed to point to the function `drop::<T>`
/// below, instantiated with the type `T` that was used to create this
/// [`MemberVtable`], and `size`/`align` are the layout of that `T`.
#[derive(Clone, Copy)]
pub struct MemberVtable {
    /// Gets the [`TypeId`] of the member type.
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the member type.
    type_name: fn() -> &'static str,
    /// `size_of::<T>()`
    size: usize,
    /// `align_of::<T>()`
    align: usize,
    /// Drops a `T` in place.
    drop: unsafe fn(NonNull<Erased>),
}

impl MemberVtable {
    /// Creates the [`MemberVtable`] for the member type `T`.
    #[must_use]
    pub const fn new<T: 'static>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<T>,
                type_name: core::any::type_name::<T>,
                size: size_of::<T>(),
                align: align_of::<T>(),
                drop: drop::<T>,
            }
        }
    }

    /// Gets the [`TypeId`] of the member type this vtable was created for.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the name of the member type this vtable was created for.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Size in bytes of the member type.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Alignment in bytes of the member type.
    #[inline]
    pub const fn align(&self) -> usize {
        self.align
    }

    /// Drops the member stored at `ptr` in place.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to an initialized value of the type this vtable was
    ///    created for, and is valid for writes.
    /// 2. The value is not used again after this call, and ownership of it
    ///    is transferred to this call.
    #[inline]
    pub(crate) unsafe fn drop(&self, ptr: NonNull<Erased>) {
        // SAFETY: `self.drop` points to `drop::<T>` for the type `T` this
        // vtable was created for. Its requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe {
            (self.drop)(ptr);
        }
    }
}

/// Vtable holding the clone operation of one member type.
///
/// # Safety Invariant
///
/// The field `clone_into` is guaranteed to point to `clone_into::<T>` for
/// the type `T` used to create this [`CloneVtable`].
#[derive(Clone, Copy)]
pub struct CloneVtable {
    /// Clones a `T` from one location into another.
    clone_into: unsafe fn(NonNull<Erased>, NonNull<Erased>),
}

impl CloneVtable {
    /// Creates the [`CloneVtable`] for the member type `T`.
    #[must_use]
    pub const fn new<T: Clone + 'static>() -> &'static Self {
        const {
            &Self {
                clone_into: clone_into::<T>,
            }
        }
    }

    /// Clones the member at `source` and writes the clone to `target`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source` points to an initialized value of the type this vtable
    ///    was created for, valid for reads for the duration of the call.
    /// 2. `target` is valid for writes of that type, is suitably aligned,
    ///    and does not overlap `source`.
    /// 3. `target` does not hold a value that still needs to be dropped.
    #[inline]
    pub(crate) unsafe fn clone_into(&self, source: NonNull<Erased>, target: NonNull<Erased>) {
        // SAFETY: `self.clone_into` points to `clone_into::<T>` for the type
        // `T` this vtable was created for. Its requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.clone_into)(source, target);
        }
    }
}

/// Vtable holding one formatting operation of one member type.
///
/// The same shape serves both [`Display`](core::fmt::Display) and
/// [`Debug`](core::fmt::Debug) tables; which trait is used is decided by
/// the constructor.
///
/// # Safety Invariant
///
/// The field `fmt` is guaranteed to point to `display::<T>` or `debug::<T>`
/// for the type `T` used to create this [`FormatVtable`].
#[derive(Clone, Copy)]
pub struct FormatVtable {
    /// Formats a `T`.
    fmt: unsafe fn(NonNull<Erased>, &mut fmt::Formatter<'_>) -> fmt::Result,
}

impl FormatVtable {
    /// Creates a [`FormatVtable`] that formats `T` through its
    /// [`Display`](core::fmt::Display) implementation.
    #[must_use]
    pub const fn display<T: fmt::Display + 'static>() -> &'static Self {
        const { &Self { fmt: display::<T> } }
    }

    /// Creates a [`FormatVtable`] that formats `T` through its
    /// [`Debug`](core::fmt::Debug) implementation.
    #[must_use]
    pub const fn debug<T: fmt::Debug + 'static>() -> &'static Self {
        const { &Self { fmt: debug::<T> } }
    }

    /// Formats the member stored at `ptr`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `ptr` points to an initialized value of the type this vtable was
    ///    created for, valid for reads for the duration of the call.
    #[inline]
    pub(crate) unsafe fn fmt(
        &self,
        ptr: NonNull<Erased>,
        formatter: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        // SAFETY: `self.fmt` points to `display::<T>` or `debug::<T>` for the
        // type `T` this vtable was created for. Its requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.fmt)(ptr, formatter) }
    }
}

/// Drops the `T` stored at `ptr` in place.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` points to an initialized `T` that is valid for writes.
/// 2. The `T` is not used again after this call.
unsafe fn drop<T: 'static>(ptr: NonNull<Erased>) {
    let ptr: NonNull<T> = ptr.cast::<T>();
    // SAFETY:
    // 1. Guaranteed by the caller
    // 2. Guaranteed by the caller
    unsafe {
        ptr.as_ptr().drop_in_place();
    }
}

/// Clones the `T` at `source` into `target`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `source` points to an initialized `T`, valid for reads.
/// 2. `target` is valid and aligned for writes of a `T` and does not overlap
///    `source`.
unsafe fn clone_into<T: Clone + 'static>(source: NonNull<Erased>, target: NonNull<Erased>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &T = unsafe { source.cast::<T>().as_ref() };
    let clone = value.clone();
    // SAFETY:
    // 2. Guaranteed by the caller
    unsafe {
        target.cast::<T>().as_ptr().write(clone);
    }
}

/// Formats the `T` at `ptr` using [`Display`](core::fmt::Display).
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` points to an initialized `T`, valid for reads.
unsafe fn display<T: fmt::Display + 'static>(
    ptr: NonNull<Erased>,
    formatter: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &T = unsafe { ptr.cast::<T>().as_ref() };
    fmt::Display::fmt(value, formatter)
}

/// Formats the `T` at `ptr` using [`Debug`](core::fmt::Debug).
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `ptr` points to an initialized `T`, valid for reads.
unsafe fn debug<T: fmt::Debug + 'static>(
    ptr: NonNull<Erased>,
    formatter: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &T = unsafe { ptr.cast::<T>().as_ref() };
    fmt::Debug::fmt(value, formatter)
}

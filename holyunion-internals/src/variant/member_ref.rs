//! Type-erased borrowed access to the active member of a union.
//!
//! This module encapsulates the fields of [`RawMemberRef`], ensuring they
//! are only visible within this module. This visibility restriction
//! guarantees the safety invariant: **the pointer always refers to an
//! initialized member at position `index` of the list `M`, borrowed for
//! `'a`**.

use core::{any::TypeId, fmt, marker::PhantomData, ptr::NonNull};

use crate::{
    members::{DebugMembers, DisplayMembers, Members},
    util::Erased,
    variant::{raw::RawUnion, vtable::MemberVtable},
};

/// A shared reference to the active member of a [`RawUnion`], with the
/// member's type only known through its index.
///
/// # Safety Invariant
///
/// `ptr` points to an initialized value of the member at position `index`
/// of `M`, and that value stays alive and unmodified for `'a`.
pub struct RawMemberRef<'a, M: Members> {
    /// Pointer to the member value.
    ptr: NonNull<Erased>,
    /// Position of the member in `M`.
    index: usize,
    /// Marker for the borrow of the owning union.
    _marker: PhantomData<&'a RawUnion<M>>,
}

impl<M: Members> Clone for RawMemberRef<'_, M> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: Members> Copy for RawMemberRef<'_, M> {}

impl<'a, M: Members> RawMemberRef<'a, M> {
    /// Creates a new [`RawMemberRef`].
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `index < M::LEN` and `ptr` points to an initialized value of the
    ///    member at position `index`.
    /// 2. The value is not dropped or mutated for the lifetime `'a`.
    #[inline]
    pub(crate) unsafe fn new(ptr: NonNull<Erased>, index: usize) -> Self {
        Self {
            ptr,
            index,
            _marker: PhantomData,
        }
    }

    /// Position of the member in the member list.
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }

    /// Vtable of the member type.
    #[inline]
    pub fn vtable(self) -> &'static MemberVtable {
        M::VTABLES[self.index]
    }

    /// The [`TypeId`] of the member type.
    #[inline]
    pub fn type_id(self) -> TypeId {
        self.vtable().type_id()
    }

    /// The name of the member type.
    #[inline]
    pub fn type_name(self) -> &'static str {
        self.vtable().type_name()
    }

    /// Pointer to the member value.
    #[inline]
    pub fn as_ptr(self) -> NonNull<Erased> {
        self.ptr
    }

    /// Reinterprets the member as a `T` without checking its type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `T` is the member type at [`Self::index`].
    #[inline]
    pub unsafe fn downcast_unchecked<T: 'static>(self) -> &'a T {
        // SAFETY:
        // 1. By the invariant of this type `ptr` points to an initialized
        //    member that lives for `'a`, and the caller guarantees that member
        //    is a `T`.
        unsafe { self.ptr.cast::<T>().as_ref() }
    }

    /// Returns the member as a `T` if that is its type.
    #[inline]
    pub fn downcast<T: 'static>(self) -> Option<&'a T> {
        if self.type_id() == TypeId::of::<T>() {
            // SAFETY:
            // 1. The type ids match, so the member is a `T`.
            Some(unsafe { self.downcast_unchecked::<T>() })
        } else {
            None
        }
    }

    /// Formats the member with its [`Display`](core::fmt::Display)
    /// implementation.
    #[inline]
    pub fn display(self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        M: DisplayMembers,
    {
        let vtable = M::DISPLAY_VTABLES[self.index];
        // SAFETY:
        // 1. `vtable` was created for the member type at `index`, and `ptr`
        //    points to such a member for the duration of this call.
        unsafe { vtable.fmt(self.ptr, formatter) }
    }

    /// Formats the member with its [`Debug`](core::fmt::Debug)
    /// implementation.
    #[inline]
    pub fn debug(self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        M: DebugMembers,
    {
        let vtable = M::DEBUG_VTABLES[self.index];
        // SAFETY:
        // 1. `vtable` was created for the member type at `index`, and `ptr`
        //    points to such a member for the duration of this call.
        unsafe { vtable.fmt(self.ptr, formatter) }
    }
}

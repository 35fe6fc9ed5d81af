//! The raw tagged union.
//!
//! This module encapsulates the `active` field of [`RawUnion`], ensuring it
//! is only visible within this module. This visibility restriction
//! guarantees the safety invariant: **`active` is `-1` exactly when no value
//! lives in the storage, and otherwise names the member list position whose
//! type is stored there**.
//!
//! # Safety Invariant
//!
//! `active` only changes inside the methods below, each of which updates it
//! in the same step as it constructs, destroys or relocates the stored value.
//! Every typed access compares `active` against the index resolved by a
//! [`Contains`] bound before touching the storage.
//!
//! # Layout
//!
//! [`RawUnion`] is `#[repr(C)]` with the `i32` discriminant declared first.
//! The discriminant therefore sits at offset 0 and the payload starts at
//! [`RawUnion::PAYLOAD_OFFSET`], the first offset after the discriminant
//! that satisfies the payload's alignment.

use core::{any::TypeId, marker::PhantomData};

use crate::{
    index::Index,
    members::{CloneMembers, Contains, Members},
    storage::RawStorage,
    variant::member_ref::RawMemberRef,
};

/// Discriminant of a union that holds no value.
pub const EMPTY: i32 = -1;

/// A union over the member list `M` that owns at most one value.
///
/// The value lives inline in raw storage; the discriminant records which
/// member type it is.
#[repr(C)]
pub struct RawUnion<M: Members> {
    /// Index of the active member, or [`EMPTY`].
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. `active` is either [`EMPTY`] or a valid index into `M::VTABLES`.
    /// 2. If `active == i` with `i >= 0`, `storage` holds an initialized value
    ///    of the member at position `i`, owned by this union.
    /// 3. If `active == EMPTY`, `storage` holds no value that needs dropping.
    active: i32,
    /// Inline storage for the active member.
    storage: RawStorage<M::Storage>,
    /// Tells the compiler that this union owns values of the member types.
    _members: PhantomData<M>,
}

impl<M: Members> RawUnion<M> {
    /// Offset of the payload from the start of the union.
    pub const PAYLOAD_OFFSET: usize = core::mem::offset_of!(Self, storage);

    /// Size in bytes of the payload storage.
    pub const STORAGE_SIZE: usize = RawStorage::<M::Storage>::SIZE;

    /// Alignment in bytes of the payload storage.
    pub const STORAGE_ALIGN: usize = RawStorage::<M::Storage>::ALIGN;

    /// Creates an empty union with zero-filled storage.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        // SAFETY: We must uphold the safety invariants of the `active` field:
        // 1. `EMPTY` is allowed
        // 2. Not applicable
        // 3. The storage is freshly zeroed
        Self {
            active: EMPTY,
            storage: RawStorage::zeroed(),
            _members: PhantomData,
        }
    }

    /// Returns the raw discriminant: `-1` when empty, otherwise the index of
    /// the active member.
    #[inline]
    pub fn active(&self) -> i32 {
        self.active
    }

    /// Returns the index of the active member, or `None` when empty.
    #[inline]
    pub fn active_index(&self) -> Option<usize> {
        usize::try_from(self.active).ok()
    }

    /// Returns `true` when the union holds no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active == EMPTY
    }

    /// Returns a type-erased reference to the active member.
    #[inline]
    pub fn active_member(&self) -> Option<RawMemberRef<'_, M>> {
        let index = self.active_index()?;
        // SAFETY:
        // 1. `index` is the active discriminant, so by the invariants of the
        //    `active` field the storage holds an initialized member at that
        //    position.
        // 2. The returned reference borrows `self`, so the value can neither be
        //    dropped nor replaced while it exists.
        Some(unsafe { RawMemberRef::new(self.storage.as_ptr(), index) })
    }

    /// Returns `true` when the active member is `T`.
    #[inline]
    pub fn holds<T, I>(&self) -> bool
    where
        T: 'static,
        I: Index,
        M: Contains<T, I>,
    {
        self.active_index() == Some(<M as Contains<T, I>>::INDEX)
    }

    /// Drops the active member, if any, and leaves the union empty.
    ///
    /// Calling this on an empty union does nothing.
    pub fn reset(&mut self) {
        let Some(index) = self.active_index() else {
            return;
        };
        let vtable = M::VTABLES[index];

        // Clear the discriminant first so that a panicking destructor can not
        // lead to a second drop of the same value.
        self.active = EMPTY;

        // SAFETY:
        // 1. `index` was the active discriminant, so the storage holds an
        //    initialized member at that position and `M::VTABLES[index]` was
        //    created for its type (guaranteed by `Members`).
        // 2. The discriminant is now `EMPTY`, so the value is never used again.
        unsafe {
            vtable.drop(self.storage.as_mut_ptr());
        }
    }

    /// Drops the active member, if any, and moves `value` into the union.
    pub fn write<T, I>(&mut self, value: T)
    where
        T: 'static,
        I: Index,
        M: Contains<T, I>,
    {
        let index = <M as Contains<T, I>>::INDEX;
        debug_assert_eq!(M::VTABLES[index].type_id(), TypeId::of::<T>());

        self.reset();
        self.storage.write(value);

        // SAFETY: We must uphold the safety invariants of the `active` field:
        // 1. `index` is a valid index as guaranteed by `Contains`
        // 2. A `T` was just written, and `T` is the member at `index`
        // 3. Not applicable
        self.active = discriminant(index);
    }

    /// Returns a reference to the active member if it is a `T`.
    #[inline]
    pub fn get<T, I>(&self) -> Option<&T>
    where
        T: 'static,
        I: Index,
        M: Contains<T, I>,
    {
        if !self.holds::<T, I>() {
            return None;
        }
        let ptr = self.storage.as_ptr().cast::<T>();
        // SAFETY: The active member is `T`, so the storage holds an initialized
        // and aligned `T`. The reference borrows `self`.
        Some(unsafe { ptr.as_ref() })
    }

    /// Returns a mutable reference to the active member if it is a `T`.
    #[inline]
    pub fn get_mut<T, I>(&mut self) -> Option<&mut T>
    where
        T: 'static,
        I: Index,
        M: Contains<T, I>,
    {
        if !self.holds::<T, I>() {
            return None;
        }
        let mut ptr = self.storage.as_mut_ptr().cast::<T>();
        // SAFETY: The active member is `T`, so the storage holds an initialized
        // and aligned `T`. The reference borrows `self` mutably.
        Some(unsafe { ptr.as_mut() })
    }

    /// Moves the active member out if it is a `T`, leaving the union empty.
    pub fn take_value<T, I>(&mut self) -> Option<T>
    where
        T: 'static,
        I: Index,
        M: Contains<T, I>,
    {
        if !self.holds::<T, I>() {
            return None;
        }

        // SAFETY: We must uphold the safety invariants of the `active` field:
        // 1. `EMPTY` is allowed
        // 2. Not applicable
        // 3. Ownership of the value is moved out by the read below
        self.active = EMPTY;

        let ptr = self.storage.as_ptr().cast::<T>();
        // SAFETY: The storage held an initialized `T`. The discriminant is
        // already `EMPTY`, so the union never drops or reads it again and the
        // read transfers ownership to the caller.
        Some(unsafe { ptr.as_ptr().read() })
    }

    /// Moves the active member of `source` into `self`, leaving `source`
    /// empty.
    ///
    /// Any member `self` held before is dropped first. The payload is
    /// relocated by copying its bytes; its destructor does not run and it is
    /// not cloned.
    pub fn move_from(&mut self, source: &mut Self) {
        self.reset();
        if source.is_empty() {
            return;
        }

        self.storage.copy_bytes_from(&source.storage);

        // SAFETY: We must uphold the safety invariants of both `active` fields:
        // 1. `source.active` was valid for the same member list
        // 2. `self.storage` now holds the bytes of `source`'s member, and since
        //    every Rust value may be moved by copying its bytes, it is a valid
        //    owned value of that member
        // 3. `source` gives up ownership, so its bytes are no longer a value
        self.active = source.active;
        source.active = EMPTY;
    }

    /// Moves the active member into a new union, leaving `self` empty.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        let mut target = Self::new();
        target.move_from(self);
        target
    }

    /// Reads the first bytes of the storage as a `T`, regardless of the
    /// active member.
    ///
    /// Fails to compile if `T` is larger than the storage.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The first `size_of::<T>()` bytes of the storage form a valid `T`.
    ///    The storage is zero-filled on construction and keeps the bytes of
    ///    every member written since, so this holds e.g. for integer types
    ///    that fit within bytes written before.
    #[inline]
    pub unsafe fn reinterpret<T: Copy>(&self) -> T {
        // SAFETY:
        // 1. Guaranteed by the caller
        unsafe { self.storage.read::<T>() }
    }

    /// Clones the active member of `source` into `self`.
    ///
    /// `self` must be empty.
    fn clone_construct_from(&mut self, source: &Self)
    where
        M: CloneMembers,
    {
        debug_assert!(self.is_empty());
        let Some(index) = source.active_index() else {
            return;
        };
        let vtable = M::CLONE_VTABLES[index];

        // SAFETY:
        // 1. `source` holds an initialized member at `index`, and
        //    `M::CLONE_VTABLES[index]` was created for its type (guaranteed by
        //    `CloneMembers`).
        // 2. `self.storage` has the same layout as `source.storage`, so it is
        //    valid and aligned for that type, and the two borrows do not
        //    overlap.
        // 3. `self` is empty.
        unsafe {
            vtable.clone_into(source.storage.as_ptr(), self.storage.as_mut_ptr());
        }

        // SAFETY: We must uphold the safety invariants of the `active` field:
        // 1. `source.active` is valid for the same member list
        // 2. A clone of the member at that index was just written
        // 3. Not applicable
        self.active = source.active;
    }
}

impl<M: Members> Default for RawUnion<M> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Members> Drop for RawUnion<M> {
    #[inline]
    fn drop(&mut self) {
        self.reset();
    }
}

impl<M: CloneMembers> Clone for RawUnion<M> {
    fn clone(&self) -> Self {
        let mut target = Self::new();
        target.clone_construct_from(self);
        target
    }

    fn clone_from(&mut self, source: &Self) {
        self.reset();
        self.clone_construct_from(source);
    }
}

/// Converts a member index to its discriminant.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn discriminant(index: usize) -> i32 {
    // Member lists are bounded by `Members`, so the index always fits.
    index as i32
}

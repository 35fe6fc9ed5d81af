//! Raw, untyped storage for union payloads.
//!
//! The storage block of a member list `(T1, ..., Tn)` is shaped by the
//! nested [`Slot`] union `Slot<T1, Slot<T2, ... Slot<Tn, End>>>`. Because a
//! `#[repr(C)]` union places every field at offset 0 and is as large and as
//! aligned as its largest and most aligned field, the nested union has
//! exactly the size and alignment required to hold any one of the members.
//! The fields are never accessed; they only shape the layout.
//!
//! [`RawStorage`] wraps that shape in [`MaybeUninit`] so that the bytes carry
//! no type information at all. It hands out raw pointers and performs
//! layout-checked writes and reads, but it never interprets its contents.
//! Deciding which type lives in the block is the job of
//! [`RawUnion`](crate::RawUnion).

use core::{
    mem::{ManuallyDrop, MaybeUninit},
    ptr::NonNull,
};

use crate::util::Erased;

/// One level of a member list's storage shape.
///
/// `H` is the member at this position and `T` is the shape of the remaining
/// members, terminated by [`End`].
#[repr(C)]
#[allow(dead_code)]
pub union Slot<H, T> {
    /// The member at this position.
    head: ManuallyDrop<H>,
    /// The remaining members.
    tail: ManuallyDrop<T>,
}

/// Terminator of a [`Slot`] chain.
#[derive(Debug, Clone, Copy)]
pub struct End;

/// A block of bytes with the size and alignment of `S`, without any value of
/// `S` (or anything else) being considered initialized.
///
/// The block starts out zero-filled so that reading it through an unchecked
/// reinterpretation never observes uninitialized memory that was not written
/// by a member.
#[repr(transparent)]
pub struct RawStorage<S> {
    /// The bytes, shaped like `S`.
    bytes: MaybeUninit<S>,
}

impl<S> RawStorage<S> {
    /// Size of the block in bytes.
    pub const SIZE: usize = size_of::<S>();

    /// Alignment of the block in bytes.
    pub const ALIGN: usize = align_of::<S>();

    /// Creates a zero-filled block.
    #[inline]
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            bytes: MaybeUninit::zeroed(),
        }
    }

    /// Returns a pointer to the start of the block.
    ///
    /// The pointer is valid for reads of [`Self::SIZE`] bytes for as long as
    /// `self` is borrowed.
    #[inline]
    pub fn as_ptr(&self) -> NonNull<Erased> {
        NonNull::from(&self.bytes).cast::<Erased>()
    }

    /// Returns a pointer to the start of the block that may be written
    /// through.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> NonNull<Erased> {
        NonNull::from(&mut self.bytes).cast::<Erased>()
    }

    /// Moves `value` into the block, placing it at offset 0.
    ///
    /// Whatever was stored before is overwritten without being dropped.
    ///
    /// Fails to compile if `T` does not fit the block's size or alignment.
    #[inline]
    pub fn write<T>(&mut self, value: T) {
        const {
            assert!(
                size_of::<T>() <= size_of::<S>(),
                "value is larger than the storage block"
            );
            assert!(
                align_of::<T>() <= align_of::<S>(),
                "value is more aligned than the storage block"
            );
        }

        let ptr = self.as_mut_ptr().cast::<T>();
        // SAFETY: `ptr` comes from a mutable borrow of `self.bytes`, so it is
        // valid for writes and nothing else aliases it. The const assertions
        // above guarantee that a `T` fits inside the block and that the block's
        // alignment satisfies `T`'s alignment.
        unsafe {
            ptr.as_ptr().write(value);
        }
    }

    /// Reads the first `size_of::<T>()` bytes of the block as a `T`.
    ///
    /// The read is unaligned, so `T` may be more aligned than the block.
    /// Fails to compile if `T` is larger than the block.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The first `size_of::<T>()` bytes of the block are initialized and
    ///    form a valid bit pattern for `T`.
    #[inline]
    pub unsafe fn read<T: Copy>(&self) -> T {
        const {
            assert!(
                size_of::<T>() <= size_of::<S>(),
                "reinterpreted type is larger than the storage block"
            );
        }

        let ptr = self.as_ptr().cast::<T>();
        // SAFETY:
        // - `ptr` is valid for reads of `size_of::<T>()` bytes by the const
        //   assertion above and the shared borrow of `self`.
        // - `read_unaligned` places no alignment requirement on `ptr`.
        // - The bytes are a valid `T`, as guaranteed by the caller.
        unsafe { ptr.as_ptr().read_unaligned() }
    }

    /// Copies every byte of `source` into `self`.
    ///
    /// This duplicates bytes, not values: if `source` holds an object, the
    /// caller is responsible for treating exactly one of the two blocks as
    /// its owner afterwards.
    #[inline]
    pub fn copy_bytes_from(&mut self, source: &Self) {
        let src: *const MaybeUninit<S> = &source.bytes;
        let dst: *mut MaybeUninit<S> = &mut self.bytes;
        // SAFETY:
        // - Both pointers come from live references, so they are valid and
        //   aligned for one `MaybeUninit<S>`.
        // - `self` is borrowed mutably and `source` shared, so the two regions
        //   cannot overlap.
        // - Copying a `MaybeUninit<S>` never requires its contents to be
        //   initialized.
        unsafe {
            core::ptr::copy_nonoverlapping(src, dst, 1);
        }
    }
}

impl<S> Default for RawStorage<S> {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Shape3 = Slot<u8, Slot<u32, Slot<u16, End>>>;

    #[test]
    fn test_slot_layout() {
        assert_eq!(size_of::<Slot<u8, End>>(), 1);
        assert_eq!(size_of::<Shape3>(), 4);
        assert_eq!(align_of::<Shape3>(), 4);

        assert_eq!(size_of::<Slot<[u8; 5], Slot<u32, End>>>(), 8);
        assert_eq!(align_of::<Slot<u64, Slot<u8, End>>>(), align_of::<u64>());
        assert_eq!(size_of::<Slot<End, End>>(), 0);
    }

    #[test]
    fn test_storage_constants() {
        assert_eq!(RawStorage::<Shape3>::SIZE, 4);
        assert_eq!(RawStorage::<Shape3>::ALIGN, 4);
        static_assertions::assert_eq_size!(RawStorage<Shape3>, Shape3);
        static_assertions::assert_eq_align!(RawStorage<Shape3>, Shape3);
    }

    #[test]
    fn test_storage_starts_zeroed() {
        let storage = RawStorage::<Shape3>::zeroed();
        // SAFETY: the block is zero-filled and zero is a valid `u32`.
        let value = unsafe { storage.read::<u32>() };
        assert_eq!(value, 0);
    }

    #[test]
    fn test_write_then_read() {
        let mut storage = RawStorage::<Shape3>::zeroed();
        storage.write::<u32>(0x4142_4344);

        // SAFETY: a `u32` was just written at offset 0.
        let value = unsafe { storage.read::<u32>() };
        assert_eq!(value, 0x4142_4344);

        // SAFETY: every byte of the block was initialized by the write.
        let bytes = unsafe { storage.read::<[u8; 4]>() };
        assert_eq!(bytes, 0x4142_4344u32.to_ne_bytes());
    }

    #[test]
    fn test_smaller_write_keeps_tail_bytes() {
        let mut storage = RawStorage::<Shape3>::zeroed();
        storage.write::<u32>(u32::MAX);
        storage.write::<u8>(0);

        // SAFETY: all four bytes were initialized by the first write.
        let bytes = unsafe { storage.read::<[u8; 4]>() };
        assert_eq!(bytes, [0, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_copy_bytes_from() {
        let mut source = RawStorage::<Shape3>::zeroed();
        source.write::<u16>(0xBEEF);
        let mut target = RawStorage::<Shape3>::zeroed();
        target.copy_bytes_from(&source);

        // SAFETY: the copied block holds a `u16` at offset 0.
        let value = unsafe { target.read::<u16>() };
        assert_eq!(value, 0xBEEF);
    }

    #[test]
    fn test_pointers_agree() {
        let mut storage = RawStorage::<Shape3>::zeroed();
        let read_ptr = storage.as_ptr().as_ptr().cast_const();
        let write_ptr = storage.as_mut_ptr().as_ptr().cast_const();
        assert_eq!(read_ptr, write_ptr);
    }
}

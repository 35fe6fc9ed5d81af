use core::marker::PhantomData;

use holyunion_internals::{Contains, Index, Members, RawStorage};

/// Storage shared by the member types `L`, without a discriminant.
///
/// This is the counterpart of an anonymous C union: values can be written
/// into it and the bytes read back as any type, but nothing records which
/// type was written. Because no destructor could be selected, only [`Copy`]
/// members can be written.
///
/// # Examples
///
/// ```
/// use holyunion::Untagged;
///
/// let mut raw = Untagged::<(u32, [u8; 4])>::new();
/// raw.init(0x0102_0304u32);
/// // SAFETY: four bytes were written and any bytes form a `[u8; 4]`.
/// let bytes = unsafe { raw.reinterpret::<[u8; 4]>() };
/// assert_eq!(bytes, 0x0102_0304u32.to_ne_bytes());
/// ```
#[repr(transparent)]
pub struct Untagged<L: Members> {
    storage: RawStorage<L::Storage>,
    _members: PhantomData<L>,
}

impl<L: Members> Untagged<L> {
    /// Creates zero-filled storage.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            storage: RawStorage::zeroed(),
            _members: PhantomData,
        }
    }

    /// Largest member size in bytes.
    #[inline]
    #[must_use]
    pub const fn size() -> usize {
        L::MAX_SIZE
    }

    /// Writes `value` at the start of the storage.
    ///
    /// Bytes past `size_of::<T>()` keep whatever they held before.
    #[inline]
    pub fn init<T, I>(&mut self, value: T)
    where
        T: Copy + 'static,
        I: Index,
        L: Contains<T, I>,
    {
        self.storage.write(value);
    }

    /// Reads the leading bytes of the storage as a `T`.
    ///
    /// A `T` larger than the storage is rejected at compile time.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The first `size_of::<T>()` bytes of the storage form a valid `T`.
    #[inline]
    pub unsafe fn reinterpret<T: Copy>(&self) -> T {
        // SAFETY:
        // 1. Guaranteed by the caller
        unsafe { self.storage.read::<T>() }
    }
}

impl<L: Members> Default for Untagged<L> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Members> Clone for Untagged<L> {
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        copy.storage.copy_bytes_from(&self.storage);
        copy
    }
}

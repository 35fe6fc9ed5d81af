use core::fmt;

use holyunion_internals::{
    CloneMembers, Contains, DebugMembers, DisplayMembers, Index, Members, RawMemberRef, RawUnion,
};

use crate::error::WrongActiveType;

/// A tagged union holding at most one value out of the member list `L`.
///
/// `L` is a tuple of 1 to 12 distinct `'static` types, e.g. `(i32, u8)`. The
/// value is stored inline, next to an `i32` discriminant that is `-1` while
/// the union is empty and otherwise the position of the active member in
/// `L`.
///
/// Member types are named at the call site and their position is inferred,
/// hence the `_` in `get::<i32, _>()`. Naming a type that is not in `L` is a
/// compile error:
///
/// ```compile_fail
/// use holyunion::Union;
///
/// let union = Union::<(i32, u8)>::new();
/// union.is::<f64, _>();
/// ```
///
/// # Examples
///
/// ```
/// use holyunion::Union;
///
/// let mut union = Union::<(i32, u8)>::new();
/// assert_eq!(union.active(), -1);
///
/// union.set(32i32);
/// assert_eq!(union.get::<i32, _>(), Ok(&32));
///
/// union.set(b'A');
/// assert_eq!(union.get::<u8, _>(), Ok(&b'A'));
/// assert!(union.get::<i32, _>().is_err());
/// ```
///
/// # Layout
///
/// `Union<L>` is `#[repr(transparent)]` over a `#[repr(C)]` record: the
/// discriminant sits at offset 0 and the payload starts at
/// [`Self::PAYLOAD_OFFSET`].
#[repr(transparent)]
pub struct Union<L: Members> {
    raw: RawUnion<L>,
}

impl<L: Members> Union<L> {
    /// Size of the whole union in bytes, discriminant included.
    pub const SIZE: usize = size_of::<Self>();

    /// Alignment of the union in bytes.
    pub const ALIGN: usize = align_of::<Self>();

    /// Offset of the payload from the start of the union.
    pub const PAYLOAD_OFFSET: usize = RawUnion::<L>::PAYLOAD_OFFSET;

    /// Number of member types.
    pub const MEMBER_COUNT: usize = L::LEN;

    /// Creates an empty union.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: RawUnion::new(),
        }
    }

    /// Creates a union holding `value`.
    #[inline]
    #[must_use]
    pub fn with<T, I>(value: T) -> Self
    where
        T: 'static,
        I: Index,
        L: Contains<T, I>,
    {
        let mut union = Self::new();
        union.set(value);
        union
    }

    /// Largest member size in bytes.
    #[inline]
    #[must_use]
    pub const fn size() -> usize {
        L::MAX_SIZE
    }

    /// Largest member alignment in bytes.
    #[inline]
    #[must_use]
    pub const fn alignment() -> usize {
        L::MAX_ALIGN
    }

    /// Replaces the current value with `value`.
    ///
    /// The previous value, whatever its type, is dropped first.
    pub fn set<T, I>(&mut self, value: T)
    where
        T: 'static,
        I: Index,
        L: Contains<T, I>,
    {
        self.raw.write(value);
        trace_lifecycle!(
            index = <L as Contains<T, I>>::INDEX,
            member = core::any::type_name::<T>(),
            "set union member"
        );
    }

    /// Drops the current value, leaving the union empty.
    ///
    /// Does nothing if the union is already empty.
    pub fn reset(&mut self) {
        trace_lifecycle!(
            active = self.raw.active(),
            member = self.active_type_name().unwrap_or("<none>"),
            "reset union"
        );
        self.raw.reset();
    }

    /// Returns a reference to the value if the union holds a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`WrongActiveType`] if the union is empty or holds another
    /// member type.
    pub fn get<T, I>(&self) -> Result<&T, WrongActiveType>
    where
        T: 'static,
        I: Index,
        L: Contains<T, I>,
    {
        self.raw
            .get::<T, I>()
            .ok_or_else(|| self.wrong_type::<T, I>())
    }

    /// Returns a mutable reference to the value if the union holds a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`WrongActiveType`] if the union is empty or holds another
    /// member type.
    pub fn get_mut<T, I>(&mut self) -> Result<&mut T, WrongActiveType>
    where
        T: 'static,
        I: Index,
        L: Contains<T, I>,
    {
        if !self.is::<T, I>() {
            return Err(self.wrong_type::<T, I>());
        }
        self.raw
            .get_mut::<T, I>()
            .ok_or_else(Self::missing::<T, I>)
    }

    /// Returns `true` if the union holds a `T`.
    #[inline]
    pub fn is<T, I>(&self) -> bool
    where
        T: 'static,
        I: Index,
        L: Contains<T, I>,
    {
        self.raw.holds::<T, I>()
    }

    /// Moves the value out if the union holds a `T`, leaving it empty.
    ///
    /// # Errors
    ///
    /// Returns [`WrongActiveType`] and leaves the union untouched if it is
    /// empty or holds another member type.
    pub fn remove<T, I>(&mut self) -> Result<T, WrongActiveType>
    where
        T: 'static,
        I: Index,
        L: Contains<T, I>,
    {
        if !self.is::<T, I>() {
            return Err(self.wrong_type::<T, I>());
        }
        self.raw
            .take_value::<T, I>()
            .ok_or_else(Self::missing::<T, I>)
    }

    /// Moves the value into a new union, leaving `self` empty.
    ///
    /// The value is relocated, not cloned, and is not dropped.
    #[must_use]
    pub fn take(&mut self) -> Self {
        trace_lifecycle!(active = self.raw.active(), "take union");
        Self {
            raw: self.raw.take(),
        }
    }

    /// Moves the value of `source` into `self`, leaving `source` empty.
    ///
    /// The value `self` held before is dropped first.
    pub fn move_from(&mut self, source: &mut Self) {
        trace_lifecycle!(
            from = source.raw.active(),
            replaced = self.raw.active(),
            "move union"
        );
        self.raw.move_from(&mut source.raw);
    }

    /// The raw discriminant: `-1` when empty, otherwise the position of the
    /// active member.
    #[inline]
    pub fn active(&self) -> i32 {
        self.raw.active()
    }

    /// Position of the active member, or `None` when empty.
    #[inline]
    pub fn active_index(&self) -> Option<usize> {
        self.raw.active_index()
    }

    /// Type name of the active member, or `None` when empty.
    #[inline]
    pub fn active_type_name(&self) -> Option<&'static str> {
        self.raw.active_member().map(RawMemberRef::type_name)
    }

    /// Returns `true` if the union holds no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Reads the leading bytes of the payload as a `T`, whatever the active
    /// member is.
    ///
    /// This is the unchecked counterpart of [`get`](Self::get). The payload
    /// is zero-filled when the union is created and keeps the bytes of every
    /// value written since, so reading an integer narrower than the last
    /// written value yields its leading bytes in native byte order. A `T`
    /// larger than the payload is rejected at compile time.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The first `size_of::<T>()` bytes of the payload form a valid `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use holyunion::Union;
    ///
    /// let mut union = Union::<(u32, u8)>::new();
    /// union.set(0x0000_0141u32);
    /// // SAFETY: every byte pattern is a valid `u8`, and the first byte was
    /// // written by the `u32` above.
    /// let low = unsafe { union.reinterpret::<u8>() };
    /// assert_eq!(low, 0x0000_0141u32.to_ne_bytes()[0]);
    /// ```
    #[inline]
    pub unsafe fn reinterpret<T: Copy>(&self) -> T {
        // SAFETY:
        // 1. Guaranteed by the caller
        unsafe { self.raw.reinterpret::<T>() }
    }

    /// Builds the error for an access as `T` that did not match.
    fn wrong_type<T, I>(&self) -> WrongActiveType
    where
        T: 'static,
        I: Index,
        L: Contains<T, I>,
    {
        WrongActiveType::new(
            core::any::type_name::<T>(),
            <L as Contains<T, I>>::INDEX,
            self.active_type_name(),
        )
    }

    /// Builds the error for an access as `T` on a union with no value.
    fn missing<T, I>() -> WrongActiveType
    where
        T: 'static,
        I: Index,
        L: Contains<T, I>,
    {
        WrongActiveType::new(core::any::type_name::<T>(), <L as Contains<T, I>>::INDEX, None)
    }
}

impl<L: Members> Default for Union<L> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<L: CloneMembers> Clone for Union<L> {
    fn clone(&self) -> Self {
        trace_lifecycle!(active = self.raw.active(), "clone union");
        Self {
            raw: self.raw.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        trace_lifecycle!(
            from = source.raw.active(),
            replaced = self.raw.active(),
            "clone union into existing"
        );
        self.raw.clone_from(&source.raw);
    }
}

impl<L: DisplayMembers> fmt::Display for Union<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.raw.active_member() {
            Some(member) => member.display(f),
            None => f.write_str("<empty union>"),
        }
    }
}

impl<L: DebugMembers> fmt::Debug for Union<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        /// Debug-formats the active member through its vtable.
        struct Member<'a, L: Members>(RawMemberRef<'a, L>);

        impl<L: DebugMembers> fmt::Debug for Member<'_, L> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.debug(f)
            }
        }

        let mut debug = f.debug_struct("Union");
        debug.field("active", &self.raw.active());
        if let Some(member) = self.raw.active_member() {
            debug.field("value", &Member(member));
        }
        debug.finish()
    }
}

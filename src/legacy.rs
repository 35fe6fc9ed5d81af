//! C-compatible tagged values and commonly used union instantiations.
//!
//! [`Value`] is a hand-written tagged union with a fixed layout: an `i32` tag
//! at offset 0 followed by an untagged [`ValuePayload`]. It exists for code
//! that exchanges such records with C, where a [`Union`] with its generated
//! layout would not do. Unlike a raw C union, every typed accessor checks
//! the tag.
//!
//! ```
//! use holyunion::legacy::{FLOAT_TYPE, Value};
//!
//! let mut value = Value::from_float(4.2);
//! assert_eq!(value.tag(), FLOAT_TYPE);
//! assert_eq!(value.as_float(), Ok(4.2));
//! assert_eq!(value.to_string(), "Float: 4.2");
//!
//! value.set_char(b'A');
//! assert!(value.as_float().is_err());
//! assert_eq!(value.to_string(), "Char: 'A'");
//! ```

use core::{any::type_name, fmt};

use crate::{U0, Union, error::WrongActiveType};

/// A union over `i32` and `u8`.
pub type Example = Union<(i32, u8)>;

/// A union whose first member is the void placeholder [`U0`].
pub type VoidUnion = Union<(U0, i32, f64)>;

/// A union over an untyped pointer and 64-bit integers.
pub type PtrUnion = Union<(*mut (), i64, u64)>;

/// Tag of a [`Value`] holding an `f64`.
pub const FLOAT_TYPE: i32 = 0;
/// Tag of a [`Value`] holding a `u8` character.
pub const CHAR_TYPE: i32 = 1;
/// Tag of a [`Value`] holding a pointer to another [`Value`].
pub const VALUE_TYPE: i32 = 2;
/// Tag of a [`Value`] holding an `i32`.
pub const INT_TYPE: i32 = 3;
/// Tag of a [`Value`] holding a `u32`.
pub const UINT_TYPE: i32 = 4;
/// Tag of an empty [`Value`].
pub const EMPTY_TYPE: i32 = -1;

/// The untagged payload of a [`Value`].
#[repr(C)]
#[derive(Clone, Copy)]
pub union ValuePayload {
    /// Valid when the tag is [`FLOAT_TYPE`].
    pub f: f64,
    /// Valid when the tag is [`CHAR_TYPE`].
    pub ch: u8,
    /// Valid when the tag is [`VALUE_TYPE`].
    pub val: *mut Value,
    /// Valid when the tag is [`INT_TYPE`].
    pub i: i32,
    /// Valid when the tag is [`UINT_TYPE`].
    pub u: u32,
}

/// A C-layout tagged value.
///
/// `tag` is private so that it always agrees with the payload: it is set
/// only together with the matching payload field.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct Value {
    tag: i32,
    payload: ValuePayload,
}

/// A [`Value`] decoded according to its tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    /// [`FLOAT_TYPE`]
    Float(f64),
    /// [`CHAR_TYPE`]
    Char(u8),
    /// [`VALUE_TYPE`]
    ValuePtr(*mut Value),
    /// [`INT_TYPE`]
    Int(i32),
    /// [`UINT_TYPE`]
    UInt(u32),
    /// [`EMPTY_TYPE`] or a tag that names no field.
    Invalid(i32),
}

/// Generates the checked accessor and the setter for one tag.
macro_rules! value_accessors {
    ($(
        $tag:ident, $field:ident: $ty:ty,
        $is:ident, $as_:ident, $set:ident, $from:ident;
    )*) => {
        $(
            #[doc = concat!("Creates a value tagged [`", stringify!($tag), "`].")]
            #[must_use]
            pub const fn $from(value: $ty) -> Self {
                let mut payload = ValuePayload { f: 0.0 };
                payload.$field = value;
                Self {
                    tag: $tag,
                    payload,
                }
            }

            #[doc = concat!("Returns `true` if the tag is [`", stringify!($tag), "`].")]
            #[inline]
            #[must_use]
            pub fn $is(&self) -> bool {
                self.tag == $tag
            }

            #[doc = concat!("Returns the `", stringify!($ty), "` payload.")]
            ///
            /// # Errors
            ///
            /// Returns [`WrongActiveType`] if the value holds another kind.
            #[inline]
            pub fn $as_(&self) -> Result<$ty, WrongActiveType> {
                if self.tag != $tag {
                    return Err(self.wrong_type::<$ty>($tag));
                }
                // SAFETY: The tag says the field was the last one written.
                Ok(unsafe { self.payload.$field })
            }

            #[doc = concat!("Stores `value` and sets the tag to [`", stringify!($tag), "`].")]
            ///
            /// Payload bytes beyond the new field keep their previous contents.
            #[inline]
            pub fn $set(&mut self, value: $ty) {
                self.payload.$field = value;
                self.tag = $tag;
            }
        )*
    };
}

impl Value {
    value_accessors! {
        FLOAT_TYPE, f: f64, is_float, as_float, set_float, from_float;
        CHAR_TYPE, ch: u8, is_char, as_char, set_char, from_char;
        VALUE_TYPE, val: *mut Value, is_value_ptr, as_value_ptr, set_value_ptr, from_value_ptr;
        INT_TYPE, i: i32, is_int, as_int, set_int, from_int;
        UINT_TYPE, u: u32, is_uint, as_uint, set_uint, from_uint;
    }

    /// Creates an empty value with a zeroed payload.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tag: EMPTY_TYPE,
            payload: ValuePayload { f: 0.0 },
        }
    }

    /// The tag: one of the `*_TYPE` constants.
    #[inline]
    #[must_use]
    pub fn tag(&self) -> i32 {
        self.tag
    }

    /// Decodes the payload according to the tag.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self.tag {
            // SAFETY: The tag says `f` was the last field written.
            FLOAT_TYPE => ValueKind::Float(unsafe { self.payload.f }),
            // SAFETY: The tag says `ch` was the last field written.
            CHAR_TYPE => ValueKind::Char(unsafe { self.payload.ch }),
            // SAFETY: The tag says `val` was the last field written.
            VALUE_TYPE => ValueKind::ValuePtr(unsafe { self.payload.val }),
            // SAFETY: The tag says `i` was the last field written.
            INT_TYPE => ValueKind::Int(unsafe { self.payload.i }),
            // SAFETY: The tag says `u` was the last field written.
            UINT_TYPE => ValueKind::UInt(unsafe { self.payload.u }),
            tag => ValueKind::Invalid(tag),
        }
    }

    /// Returns `true` if the value holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tag == EMPTY_TYPE
    }

    /// Reads the leading payload bytes as a `T`, ignoring the tag.
    ///
    /// A `T` larger than the payload is rejected at compile time.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The first `size_of::<T>()` bytes of the payload form a valid `T`.
    #[inline]
    pub unsafe fn reinterpret<T: Copy>(&self) -> T {
        const {
            assert!(
                size_of::<T>() <= size_of::<ValuePayload>(),
                "reinterpreted type is larger than the payload"
            );
        }
        let ptr: *const T = (&raw const self.payload).cast::<T>();
        // SAFETY:
        // 1. `ptr` is valid for reads of `size_of::<T>()` bytes by the const
        //    assertion above, `read_unaligned` has no alignment requirement
        //    and the caller guarantees the bytes form a valid `T`.
        unsafe { ptr.read_unaligned() }
    }

    /// Name of the payload type for the current tag.
    fn held_type_name(&self) -> Option<&'static str> {
        match self.tag {
            FLOAT_TYPE => Some(type_name::<f64>()),
            CHAR_TYPE => Some(type_name::<u8>()),
            VALUE_TYPE => Some(type_name::<*mut Value>()),
            INT_TYPE => Some(type_name::<i32>()),
            UINT_TYPE => Some(type_name::<u32>()),
            _ => None,
        }
    }

    /// Builds the error for a read as `T` under the tag `expected`.
    #[allow(clippy::cast_sign_loss)]
    fn wrong_type<T>(&self, expected: i32) -> WrongActiveType {
        WrongActiveType::new(type_name::<T>(), expected as usize, self.held_type_name())
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ValueKind::Float(value) => write!(f, "Float: {value}"),
            ValueKind::Char(value) => write!(f, "Char: '{}'", char::from(value)),
            ValueKind::ValuePtr(value) => write!(f, "Value pointer: {value:p}"),
            ValueKind::Int(value) => write!(f, "Int: {value}"),
            ValueKind::UInt(value) => write!(f, "UInt: {value}"),
            ValueKind::Invalid(_) => f.write_str("<invalid Value>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("tag", &self.tag)
            .field("payload", &format_args!("{self}"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use core::mem::offset_of;

    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(offset_of!(Value, tag), 0);
        assert_eq!(
            offset_of!(Value, payload),
            align_of::<ValuePayload>().max(size_of::<i32>())
        );
        assert_eq!(size_of::<ValuePayload>(), 8);
        assert_eq!(offset_of!(ValuePayload, f), 0);
        assert_eq!(offset_of!(ValuePayload, ch), 0);
        assert_eq!(offset_of!(ValuePayload, u), 0);
    }

    #[test]
    fn test_tags_and_checked_access() {
        let mut value = Value::new();
        assert!(value.is_empty());
        assert_eq!(value.tag(), EMPTY_TYPE);
        assert_eq!(value.as_int().unwrap_err().found(), None);

        value.set_int(-12);
        assert!(value.is_int());
        assert_eq!(value.tag(), INT_TYPE);
        assert_eq!(value.as_int(), Ok(-12));

        let error = value.as_uint().unwrap_err();
        assert_eq!(error.expected(), "u32");
        assert_eq!(error.expected_index(), 4);
        assert_eq!(error.found(), Some("i32"));

        value.set_uint(7);
        assert!(value.is_uint());
        assert_eq!(value.as_uint(), Ok(7));
    }

    #[test]
    fn test_value_pointer() {
        let mut inner = Value::from_float(1.5);
        let outer = Value::from_value_ptr(&raw mut inner);
        assert!(outer.is_value_ptr());

        let ptr = outer.as_value_ptr().unwrap();
        // SAFETY: `ptr` points to `inner`, which is alive and not borrowed.
        let inner_ref = unsafe { &*ptr };
        assert_eq!(inner_ref.as_float(), Ok(1.5));
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::from_char(b'z').kind(), ValueKind::Char(b'z'));
        assert_eq!(Value::from_float(0.5).kind(), ValueKind::Float(0.5));
        assert_eq!(Value::new().kind(), ValueKind::Invalid(EMPTY_TYPE));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Value::from_float(4.2)), "Float: 4.2");
        assert_eq!(format!("{}", Value::from_char(b'A')), "Char: 'A'");
        assert_eq!(format!("{}", Value::from_int(-5)), "Int: -5");
        assert_eq!(format!("{}", Value::from_uint(5)), "UInt: 5");
        assert_eq!(format!("{}", Value::new()), "<invalid Value>");
        assert!(
            format!("{}", Value::from_value_ptr(core::ptr::null_mut()))
                .starts_with("Value pointer: 0x")
        );
        assert_eq!(
            format!("{:?}", Value::from_int(3)),
            "Value { tag: 3, payload: Int: 3 }"
        );
    }

    #[test]
    fn test_reinterpret_payload() {
        let value = Value::from_uint(0x4142_4344);
        // SAFETY: the `u32` initialized the first four bytes.
        assert_eq!(unsafe { value.reinterpret::<i32>() }, 0x4142_4344);
        // SAFETY: the first byte was written by the `u32`.
        let low = unsafe { value.reinterpret::<u8>() };
        assert_eq!(low, 0x4142_4344u32.to_ne_bytes()[0]);

        let float = Value::from_float(1.0);
        // SAFETY: the `f64` initialized all eight bytes.
        assert_eq!(unsafe { float.reinterpret::<u64>() }, 1.0f64.to_bits());
    }

    #[test]
    fn test_aliases() {
        let mut example = Example::new();
        example.set(b'A');
        assert!(example.is::<u8, _>());

        let void = VoidUnion::with(U0);
        assert_eq!(void.active(), 0);

        let mut ptrs = PtrUnion::new();
        ptrs.set(core::ptr::null_mut::<()>());
        assert!(ptrs.get::<*mut (), _>().unwrap().is_null());
        ptrs.set(-1i64);
        assert_eq!(ptrs.get::<i64, _>(), Ok(&-1));
    }
}

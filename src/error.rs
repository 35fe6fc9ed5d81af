use core::fmt;

/// The error returned when a union is accessed as a member type that is not
/// the one it currently holds.
///
/// This is the only runtime failure of [`Union`](crate::Union): asking for a
/// type that is not a member at all is rejected at compile time instead.
///
/// # Examples
///
/// ```
/// use holyunion::Union;
///
/// let mut union = Union::<(i32, u8)>::new();
/// union.set(b'A');
///
/// let error = union.get::<i32, _>().unwrap_err();
/// assert_eq!(error.expected(), "i32");
/// assert_eq!(error.found(), Some("u8"));
/// assert_eq!(
///     error.to_string(),
///     "wrong active type in union: expected `i32`, union holds `u8`"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WrongActiveType {
    expected: &'static str,
    expected_index: usize,
    found: Option<&'static str>,
}

impl WrongActiveType {
    pub(crate) fn new(
        expected: &'static str,
        expected_index: usize,
        found: Option<&'static str>,
    ) -> Self {
        Self {
            expected,
            expected_index,
            found,
        }
    }

    /// Name of the requested member type.
    #[must_use]
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    /// Discriminant of the requested member type.
    #[must_use]
    pub fn expected_index(&self) -> usize {
        self.expected_index
    }

    /// Name of the member type the union held, or `None` if it was empty.
    #[must_use]
    pub fn found(&self) -> Option<&'static str> {
        self.found
    }
}

impl fmt::Display for WrongActiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.found {
            Some(found) => write!(
                f,
                "wrong active type in union: expected `{}`, union holds `{found}`",
                self.expected
            ),
            None => write!(
                f,
                "wrong active type in union: expected `{}`, union is empty",
                self.expected
            ),
        }
    }
}

impl core::error::Error for WrongActiveType {}

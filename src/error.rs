/// An error that can occur in this crate.
///
/// There is exactly one way for an operation in this crate to fail: asking
/// [`round_to_nearest_hours`](crate::round_to_nearest_hours) (or
/// [`DateTime::round`](crate::civil::DateTime::round)) to round to a number
/// of hours outside the supported range. Everything else, including rounding
/// an invalid datetime, is communicated through the value returned and not
/// through an error. See the [`crate::civil::DateTime::is_valid`] predicate.
///
/// This type provides `Display` and `Debug` impls, and implements
/// `std::error::Error` when the `std` feature is enabled. Introspection is
/// otherwise limited to the [`Error::is_range`] predicate.
///
/// # Example
///
/// ```
/// use nearest_hours::{civil::DateTime, HourRound};
///
/// let dt = DateTime::constant(2014, 7, 10, 12, 0, 0, 0);
/// let err = dt.round(HourRound::new().nearest_to(13)).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "parameter 'nearest_to' with value 13 is \
///      not in the required range of 1..=12",
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
}

#[derive(Clone, Debug)]
enum ErrorKind {
    Range(RangeError),
}

impl Error {
    /// Creates a new error indicating that a `given` value is out of the
    /// specified `min..=max` range. The given `what` label is used in the
    /// error message as a human readable description of what exactly is out
    /// of range.
    #[inline(never)]
    #[cold]
    pub(crate) fn range(
        what: &'static str,
        given: i64,
        min: i64,
        max: i64,
    ) -> Error {
        let kind = ErrorKind::Range(RangeError { what, given, min, max });
        Error { kind }
    }

    /// Returns true when this error is a result of a parameter being out of
    /// its allowed range.
    ///
    /// At present this is true for every error this crate produces, but
    /// callers should not rely on that.
    pub fn is_range(&self) -> bool {
        matches!(self.kind, ErrorKind::Range(_))
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.kind {
            ErrorKind::Range(ref err) => err.fmt(f),
        }
    }
}

/// An error that occurs when an input value is out of bounds.
///
/// The error message produced by this type includes a name describing which
/// input was out of bounds, the value given and its minimum and maximum
/// allowed values.
#[derive(Clone, Debug)]
struct RangeError {
    what: &'static str,
    given: i64,
    min: i64,
    max: i64,
}

impl core::fmt::Display for RangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let RangeError { what, given, min, max } = *self;
        write!(
            f,
            "parameter '{what}' with value {given} \
             is not in the required range of {min}..={max}",
        )
    }
}

use alloc::{boxed::Box, sync::Arc};

use crate::util::escape;

/// An error that can occur when parsing fails for good.
///
/// An error always means the input is wrong for the format: a literal or
/// width mismatch, data left over after the format was exhausted, a
/// malformed or self-contradictory UTC offset, or an invalid combination
/// of directives discovered after the walk (for example, an ISO week
/// without an ISO year). Formats this crate merely doesn't handle are never
/// errors; those come back as [`Outcome::Deferred`](crate::Outcome).
///
/// # Introspection is limited
///
/// Other than implementing the [`std::error::Error`] trait when the `std`
/// feature is enabled, the [`core::fmt::Debug`] trait and the
/// [`core::fmt::Display`] trait, this error type provides no introspection.
/// The `Display` output is itself stable: messages use the same wording as
/// the reference strptime implementation this crate accelerates, so callers
/// that match on message text see identical failures from the fast path and
/// from their fallback.
#[derive(Clone)]
pub struct Error {
    /// The `Arc` keeps `Error` one word big and makes clones cheap. There
    /// is no cause chain. Every failure here is terminal and flat, and
    /// gluing context onto the front of a message would break the wording
    /// contract described above.
    inner: Arc<ErrorKind>,
}

impl Error {
    /// Creates a new error value from `core::fmt::Arguments`.
    ///
    /// It is expected to use [`format_args!`](format_args) from Rust's
    /// standard library (available in `core`) to create a
    /// `core::fmt::Arguments`.
    ///
    /// Callers should generally use their own error types. This exists so
    /// that a [`WarningSink`](crate::WarningSink) which escalates warnings
    /// can manufacture the error it aborts the parse with.
    ///
    /// # Example
    ///
    /// ```
    /// use trice::Error;
    ///
    /// let err = Error::from_args(format_args!("something failed"));
    /// assert_eq!(err.to_string(), "something failed");
    /// ```
    pub fn from_args<'a>(message: core::fmt::Arguments<'a>) -> Error {
        use alloc::string::ToString;

        Error::from(ErrorKind::Adhoc(message.to_string().into_boxed_str()))
    }

    /// The generic mismatch: some literal, width or range requirement of
    /// the format was not satisfied by the data. Quotes both inputs whole.
    #[inline(never)]
    #[cold]
    pub(crate) fn mismatch(data: &[u8], format: &[u8]) -> Error {
        Error::from(ErrorKind::Mismatch {
            data: data.into(),
            format: format.into(),
        })
    }

    /// The short mismatch raised from inside the UTC offset grammar, which
    /// doesn't have the whole inputs in hand.
    #[inline(never)]
    #[cold]
    pub(crate) fn offset_mismatch() -> Error {
        Error::from(ErrorKind::OffsetMismatch)
    }

    /// The format was exhausted but data remains.
    #[inline(never)]
    #[cold]
    pub(crate) fn unconverted(remaining: &[u8]) -> Error {
        Error::from(ErrorKind::Unconverted { remaining: remaining.into() })
    }

    /// A colon-strict offset directive matched an offset, but the next
    /// unconsumed byte isn't the colon it promised.
    #[inline(never)]
    #[cold]
    pub(crate) fn missing_colon(rest: &[u8], data: &[u8]) -> Error {
        Error::from(ErrorKind::MissingColon {
            rest: rest.into(),
            data: data.into(),
        })
    }

    /// Colon placement within one offset contradicts itself.
    #[inline(never)]
    #[cold]
    pub(crate) fn inconsistent_colon(offset: &[u8]) -> Error {
        Error::from(ErrorKind::InconsistentColon { offset: offset.into() })
    }

    /// An ISO week number beyond the week count of its ISO year.
    #[inline(never)]
    #[cold]
    pub(crate) fn invalid_week(week: i32) -> Error {
        Error::from(ErrorKind::InvalidWeek { week })
    }

    /// `%j` and `%G` in one format.
    #[inline(never)]
    #[cold]
    pub(crate) fn day_of_year_with_iso_year() -> Error {
        Error::from(ErrorKind::DayOfYearWithIsoYear)
    }

    /// `%G` without `%V` or without any weekday directive.
    #[inline(never)]
    #[cold]
    pub(crate) fn iso_year_incomplete() -> Error {
        Error::from(ErrorKind::IsoYearIncomplete)
    }

    /// `%V` without `%G`, and also missing a plain year or weekday.
    #[inline(never)]
    #[cold]
    pub(crate) fn iso_week_incomplete() -> Error {
        Error::from(ErrorKind::IsoWeekIncomplete)
    }

    /// `%V` combined with `%Y` instead of `%G`.
    #[inline(never)]
    #[cold]
    pub(crate) fn iso_week_with_calendar_year() -> Error {
        Error::from(ErrorKind::IsoWeekWithCalendarYear)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.inner, f)
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error").field("kind", &self.inner).finish()
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { inner: Arc::new(kind) }
    }
}

/// The underlying kind of a [`Error`].
///
/// The `Display` impl is the single place where diagnostic wording lives.
#[derive(Debug)]
enum ErrorKind {
    Adhoc(Box<str>),
    Mismatch { data: Box<[u8]>, format: Box<[u8]> },
    OffsetMismatch,
    Unconverted { remaining: Box<[u8]> },
    MissingColon { rest: Box<[u8]>, data: Box<[u8]> },
    InconsistentColon { offset: Box<[u8]> },
    InvalidWeek { week: i32 },
    DayOfYearWithIsoYear,
    IsoYearIncomplete,
    IsoWeekIncomplete,
    IsoWeekWithCalendarYear,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match *self {
            Adhoc(ref message) => f.write_str(message),
            Mismatch { ref data, ref format } => write!(
                f,
                "time data {data:?} does not match format {format:?}",
                data = escape::Bytes(data),
                format = escape::Bytes(format),
            ),
            OffsetMismatch => {
                f.write_str("time data does not match format")
            }
            Unconverted { ref remaining } => write!(
                f,
                "unconverted data remains: {remaining}",
                remaining = escape::Bytes(remaining),
            ),
            MissingColon { ref rest, ref data } => write!(
                f,
                "Missing colon in %:z before {rest:?}, got {data:?}",
                rest = escape::Bytes(rest),
                data = escape::Bytes(data),
            ),
            InconsistentColon { ref offset } => write!(
                f,
                "Inconsistent use of : in {offset}",
                offset = escape::Bytes(offset),
            ),
            InvalidWeek { week } => write!(f, "Invalid week: {week}"),
            DayOfYearWithIsoYear => f.write_str(
                "Day of the year directive '%j' is not compatible with \
                 ISO year directive '%G'. Use '%Y' instead.",
            ),
            IsoYearIncomplete => f.write_str(
                "ISO year directive '%G' must be used with the ISO week \
                 directive '%V' and a weekday directive ('%A', '%a', '%w', \
                 or '%u').",
            ),
            IsoWeekIncomplete => f.write_str(
                "ISO week directive '%V' must be used with the ISO year \
                 directive '%G' and a weekday directive ('%A', '%a', '%w', \
                 or '%u').",
            ),
            IsoWeekWithCalendarYear => f.write_str(
                "ISO week directive '%V' is incompatible with the year \
                 directive '%Y'. Use the ISO year '%G' instead.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // An `Error` should stay pointer-sized. An `Error` is the size of a
    // result's payload in most of this crate's call paths, so it matters
    // a little more than usual.
    #[test]
    fn error_size() {
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn display_mismatch() {
        let err = Error::mismatch(b"2023-06-32", b"%Y-%m-%d");
        insta::assert_snapshot!(
            err,
            @"time data '2023-06-32' does not match format '%Y-%m-%d'",
        );
    }

    #[test]
    fn display_missing_colon() {
        let err = Error::missing_colon(b"30", b"-01:3030");
        insta::assert_snapshot!(
            err,
            @"Missing colon in %:z before '30', got '-01:3030'",
        );
    }

    #[test]
    fn display_inconsistent_colon() {
        let err = Error::inconsistent_colon(b"-0130:30");
        insta::assert_snapshot!(err, @"Inconsistent use of : in -0130:30");
    }

    #[test]
    fn display_unconverted() {
        let err = Error::unconverted(b"am");
        insta::assert_snapshot!(err, @"unconverted data remains: am");
    }

    #[test]
    fn display_invalid_week() {
        insta::assert_snapshot!(Error::invalid_week(53), @"Invalid week: 53");
    }
}

/*!
A fast path for `strptime`-style timestamp parsing.

This crate parses timestamp strings against `strftime`-style formats, but
only for the directives it can handle exactly. Everything else is
*deferred*: [`parse`] returns [`Outcome::Deferred`] and the caller hands
the same data and format to whatever full (and slower) implementation it
keeps as a fallback. The contract is strict in both directions. When this
crate says [`Outcome::Parsed`], the result is exactly what the reference
implementation would have produced, including its quirks. When it defers,
it has consumed nothing and decided nothing, so the fallback sees a
completely untouched parse. Deferral is a property of the *format* alone;
bad data for a supported format is a hard error with the standard
diagnostics, never a deferral.

# Example

```
use trice::{Outcome, Weekday};

let outcome = trice::parse("2023-06-15 04:05:06", "%Y-%m-%d %H:%M:%S")?;
let Outcome::Parsed(tm) = outcome else { unreachable!() };
assert_eq!(tm.year(), 2023);
assert_eq!(tm.month(), 6);
assert_eq!(tm.day(), 15);
assert_eq!(tm.hour(), 4);
assert_eq!(tm.weekday(), Weekday::Thursday);
assert_eq!(tm.day_of_year(), 166);

// Month names are locale work, so this format is deferred.
let outcome = trice::parse("15 June 2023", "%d %B %Y")?;
assert_eq!(outcome, Outcome::Deferred);

// Data that contradicts a supported format is an error, not a deferral.
let err = trice::parse("2023-06-32", "%Y-%m-%d").unwrap_err();
assert_eq!(
    err.to_string(),
    "time data '2023-06-32' does not match format '%Y-%m-%d'",
);
# Ok::<(), trice::Error>(())
```

# Supported directives

| Directive | Matches |
| --------- | ------- |
| `%Y`, `%G` | year and ISO 8601 week-based year, exactly four digits |
| `%y` | two-digit year, widened with the 1969..=2068 pivot |
| `%C` | two-digit century, combined with `%y` |
| `%m` | month, `1..=12` |
| `%d`, `%e` | day of month, `1..=31`, optionally space padded |
| `%H`, `%k` | hour, `0..=23`, optionally space padded |
| `%M` | minute, `0..=59` |
| `%S` | second, `0..=61` |
| `%f` | fractional second, one to six digits |
| `%j` | day of year, `1..=366` |
| `%w`, `%u` | numeric weekday, Sunday-based and ISO |
| `%V` | ISO 8601 week, `1..=53` |
| `%U`, `%W` | week of year from Sunday or Monday, `0..=53` |
| `%z`, `%:z` | UTC offset, optional in the data |
| `%F`, `%T`, `%R` | `%Y-%m-%d`, `%H:%M:%S` and `%H:%M` |
| `%%`, `%n`, `%t` | a literal `%`, newline and tab |

Padding and case flags (`-`, `_`, `0`, `^`, `#`) and widths after `%` are
accepted and ignored. Whitespace in the format matches a run of one or
more whitespace bytes in the data. Everything else in the format matches
itself.

Locale-dependent directives (`%a`, `%A`, `%b`, `%B`, `%p`, `%P`, `%c`,
`%x`, `%X`, `%r`, `%Z`), the 12-hour clock (`%I`, `%l`), `%E`/`%O`
alternative representations and anything unrecognized all defer. So do
data or format strings that are not valid UTF-8.

# Warnings

Parsing a day of the month from a format with no year directive succeeds
but is flagged, since the resulting date is ambiguous and a leap day
cannot round trip. [`parse`] logs the warning (see the `logging`
feature); [`parse_with`] hands it to a caller-supplied [`WarningSink`]
that may escalate it to an error.

# Crate features

* **std** (enabled by default) - When enabled, this crate implements the
  standard library's `Error` trait for [`Error`]. Otherwise, this crate
  is `no_std`, although it always requires `alloc`.
* **logging** - When enabled, deferrals and warnings are reported through
  the [`log`](https://docs.rs/log) crate. Useful for seeing why a parse
  was handed to the fallback.
* **serde** - When enabled, the public value types implement serde's
  `Serialize` and `Deserialize`.
*/

#![no_std]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs)]
// We generally want all types to impl Debug.
#![warn(missing_debug_implementations)]

#[cfg(any(test, feature = "std"))]
extern crate std;

// Error messages and the time zone name slot allocate. A core-only mode
// isn't worth making every use of the heap conditional.
extern crate alloc;

pub use crate::{
    civil::{Dst, Weekday},
    error::Error,
    fields::BrokenDownTime,
};

#[macro_use]
mod logging;

mod civil;
mod error;
mod fields;
mod offset;
mod parse;
mod util;

/// The result of a parse attempt that did not fail.
///
/// The two variants are not degrees of success. `Parsed` means this
/// crate owned the parse and the result is final. `Deferred` means this
/// crate never owned it: the format (or a non-UTF-8 input) needs the
/// caller's full implementation, and nothing has been decided about
/// whether the data matches.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The format was fully handled and the data matched it.
    Parsed(BrokenDownTime),
    /// The format needs capabilities this crate does not have. The
    /// caller's fallback owns this parse, errors and all.
    Deferred,
}

impl Outcome {
    /// Returns true when the parse was handed back to the caller.
    pub fn is_deferred(&self) -> bool {
        matches!(*self, Outcome::Deferred)
    }

    /// Returns the parsed time, or `None` when the parse was deferred.
    pub fn into_parsed(self) -> Option<BrokenDownTime> {
        match self {
            Outcome::Parsed(tm) => Some(tm),
            Outcome::Deferred => None,
        }
    }
}

/// A non-fatal observation made during a successful parse.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Warning {
    /// The format has a day-of-month directive but no year directive.
    /// The parse succeeds against a default year, but the result is
    /// ambiguous and a leap day fails to parse at all.
    DayOfMonthWithoutYear,
}

impl core::fmt::Display for Warning {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Warning::DayOfMonthWithoutYear => write!(
                f,
                "parsing a day of the month without a year is ambiguous, \
                 and a leap day fails to parse; add a year to the data \
                 and format",
            ),
        }
    }
}

/// A receiver for [`Warning`]s raised while parsing.
///
/// A sink can escalate: returning an error aborts the parse with that
/// error. Closures of type `FnMut(Warning) -> Result<(), Error>`
/// implement this trait, so most callers never name it.
pub trait WarningSink {
    /// Receives one warning.
    fn warn(&mut self, warning: Warning) -> Result<(), Error>;
}

impl<F: FnMut(Warning) -> Result<(), Error>> WarningSink for F {
    fn warn(&mut self, warning: Warning) -> Result<(), Error> {
        (self)(warning)
    }
}

/// The sink used by [`parse`]: report through the logging shim and move
/// on.
struct LogSink;

impl WarningSink for LogSink {
    fn warn(&mut self, warning: Warning) -> Result<(), Error> {
        match warning {
            Warning::DayOfMonthWithoutYear => {
                warn!("{}", warning);
            }
        }
        Ok(())
    }
}

/// Parses `data` against the strftime-style `format`.
///
/// Returns `Ok(Outcome::Parsed(..))` when this crate handled the parse,
/// `Ok(Outcome::Deferred)` when the format (or a non-UTF-8 input) is
/// outside its remit and the caller's fallback should run instead, and
/// `Err(..)` when the format is handled but the data doesn't match it.
///
/// Warnings are logged when the `logging` feature is enabled and
/// otherwise dropped; use [`parse_with`] to intercept them.
///
/// # Example
///
/// ```
/// use trice::Outcome;
///
/// let outcome = trice::parse("2024-02-29T23:59:60.5+05:30", "%FT%T.%f%z")?;
/// let Outcome::Parsed(tm) = outcome else { unreachable!() };
/// assert_eq!(tm.second(), 60);
/// assert_eq!(tm.subsec_micros(), 500_000);
/// assert_eq!(tm.utc_offset(), Some(19_800));
/// # Ok::<(), trice::Error>(())
/// ```
pub fn parse(
    data: impl AsRef<[u8]>,
    format: impl AsRef<[u8]>,
) -> Result<Outcome, Error> {
    parse_mono(data.as_ref(), format.as_ref(), &mut LogSink)
}

/// Parses `data` against `format`, sending warnings to `sink`.
///
/// This behaves exactly like [`parse`], except any [`Warning`] raised is
/// handed to `sink` before field resolution. If the sink returns an
/// error, the parse is abandoned and fails with that error.
///
/// # Example
///
/// Escalating the ambiguous-date warning into a hard failure:
///
/// ```
/// use trice::{Error, Warning};
///
/// let mut sink = |warning: Warning| -> Result<(), Error> {
///     Err(Error::from_args(format_args!("refusing: {warning}")))
/// };
/// let err = trice::parse_with("06-15", "%m-%d", &mut sink).unwrap_err();
/// assert!(err.to_string().starts_with("refusing:"));
/// ```
pub fn parse_with(
    data: impl AsRef<[u8]>,
    format: impl AsRef<[u8]>,
    sink: &mut dyn WarningSink,
) -> Result<Outcome, Error> {
    parse_mono(data.as_ref(), format.as_ref(), sink)
}

fn parse_mono(
    data: &[u8],
    format: &[u8],
    sink: &mut dyn WarningSink,
) -> Result<Outcome, Error> {
    // Inputs outside UTF-8 are out of scope, not wrong: the reference
    // semantics are defined on text, so the fallback owns them.
    if core::str::from_utf8(data).is_err()
        || core::str::from_utf8(format).is_err()
    {
        trace!("data or format is not valid UTF-8, deferring");
        return Ok(Outcome::Deferred);
    }

    let mut fields = fields::Fields::default();
    let mut parser = parse::Parser {
        fmt: format,
        inp: data,
        data,
        format,
        fields: &mut fields,
    };
    if let parse::Step::Defer = parser.parse()? {
        return Ok(Outcome::Deferred);
    }

    // The warning is about the format, so it is raised after a full
    // match but before resolution, whether or not resolution would
    // succeed.
    if fields.saw_day_of_month && !fields.saw_year_directive {
        sink.warn(Warning::DayOfMonthWithoutYear)?;
    }

    let tm = fields.resolve()?;
    Ok(Outcome::Parsed(tm))
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};

    use super::*;

    fn parsed(data: &str, format: &str) -> BrokenDownTime {
        let _ = env_logger::try_init();
        match parse(data, format) {
            Ok(Outcome::Parsed(tm)) => tm,
            other => panic!("{data:?} with {format:?}: got {other:?}"),
        }
    }

    #[test]
    fn full_timestamp() {
        let tm = parsed("2023-06-15 04:05:06", "%Y-%m-%d %H:%M:%S");
        assert_eq!(tm.year(), 2023);
        assert_eq!(tm.month(), 6);
        assert_eq!(tm.day(), 15);
        assert_eq!(tm.hour(), 4);
        assert_eq!(tm.minute(), 5);
        assert_eq!(tm.second(), 6);
        assert_eq!(tm.weekday(), Weekday::Thursday);
        assert_eq!(tm.day_of_year(), 166);
        assert_eq!(tm.subsec_micros(), 0);
        assert_eq!(tm.dst(), Dst::Unknown);
        assert_eq!(tm.tz_name(), None);
        assert_eq!(tm.utc_offset(), None);
        assert_eq!(tm.utc_offset_subsec_micros(), 0);
    }

    #[test]
    fn offsets_and_fractions() {
        let tm = parsed("2024-02-29T23:59:60.5+05:30", "%FT%T.%f%z");
        assert_eq!(tm.second(), 60);
        assert_eq!(tm.subsec_micros(), 500_000);
        assert_eq!(tm.utc_offset(), Some(19_800));

        let tm = parsed("2023-06-15 -01:30:30.25", "%F %:z");
        assert_eq!(tm.utc_offset(), Some(-5430));
        assert_eq!(tm.utc_offset_subsec_micros(), -250_000);

        let tm = parsed("2023-06-15 Z", "%F %z");
        assert_eq!(tm.utc_offset(), Some(0));
        assert_eq!(tm.utc_offset_subsec_micros(), 0);
    }

    #[test]
    fn deferred_formats() {
        let _ = env_logger::try_init();
        for (data, format) in [
            ("15 June 2023", "%d %B %Y"),
            ("Thu Jun 15", "%a %b %d"),
            ("04:05 PM", "%I:%M %p"),
            ("2023 UTC", "%Y %Z"),
            ("2023 ", "%Y %"),
            ("whatever", "%&"),
        ] {
            assert_eq!(
                parse(data, format).unwrap(),
                Outcome::Deferred,
                "{data:?} with {format:?}",
            );
        }
    }

    #[test]
    fn invalid_utf8_defers() {
        let _ = env_logger::try_init();
        let outcome = parse(b"2023\xFF".as_slice(), "%Y").unwrap();
        assert_eq!(outcome, Outcome::Deferred);
        let outcome = parse("2023", b"%Y\xFF".as_slice()).unwrap();
        assert_eq!(outcome, Outcome::Deferred);
    }

    #[test]
    fn warning_is_observable() {
        let _ = env_logger::try_init();
        fn collect(
            data: &str,
            format: &str,
        ) -> (Outcome, Vec<Warning>) {
            let mut seen = Vec::new();
            let mut sink = |warning: Warning| -> Result<(), Error> {
                seen.push(warning);
                Ok(())
            };
            let outcome = parse_with(data, format, &mut sink).unwrap();
            (outcome, seen)
        }

        let (outcome, seen) = collect("15", "%d");
        assert!(!outcome.is_deferred());
        assert_eq!(seen, [Warning::DayOfMonthWithoutYear]);

        // Any year directive quiets it, including the two-digit year.
        let (outcome, seen) = collect("15 23", "%d %y");
        assert!(!outcome.is_deferred());
        assert!(seen.is_empty());

        // The century directive alone does not.
        let (_, seen) = collect("15 20", "%d %C");
        assert_eq!(seen, [Warning::DayOfMonthWithoutYear]);
    }

    #[test]
    fn warning_escalation_aborts() {
        let _ = env_logger::try_init();
        let mut sink = |_: Warning| -> Result<(), Error> {
            Err(Error::from_args(format_args!("no dateless days")))
        };
        let err = parse_with("15", "%d", &mut sink).unwrap_err();
        assert_eq!(err.to_string(), "no dateless days");
    }

    #[test]
    fn no_warning_on_mismatch() {
        let _ = env_logger::try_init();
        // The mismatch wins; the sink is never consulted.
        let mut sink = |_: Warning| -> Result<(), Error> {
            Err(Error::from_args(format_args!("unreachable")))
        };
        let err = parse_with("32", "%d", &mut sink).unwrap_err();
        assert_eq!(
            err.to_string(),
            "time data '32' does not match format '%d'",
        );
    }

    #[test]
    fn default_year_and_leap_day() {
        let tm = parsed("06-15", "%m-%d");
        assert_eq!(tm.year(), 1900);
        let tm = parsed("02-29", "%m-%d");
        assert_eq!(tm.year(), 1900);
        assert_eq!(tm.month(), 2);
        assert_eq!(tm.day(), 29);
        assert_eq!(tm.weekday(), Weekday::Monday);
    }

    #[test]
    fn iso_week_date() {
        let tm = parsed("2020 01 1", "%G %V %u");
        assert_eq!(tm.year(), 2019);
        assert_eq!(tm.month(), 12);
        assert_eq!(tm.day(), 30);
    }

    #[test]
    fn same_inputs_same_outcome() {
        let _ = env_logger::try_init();
        let pairs = [
            ("2023-06-15", "%Y-%m-%d"),
            ("15 June 2023", "%d %B %Y"),
            ("169 2016", "%j %Y"),
        ];
        for (data, format) in pairs {
            let first = parse(data, format).unwrap();
            for _ in 0..3 {
                assert_eq!(first, parse(data, format).unwrap());
            }
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let tm = parsed("2023-06-15", "%Y-%m-%d");
        let json = serde_json::to_string(&tm).unwrap();
        let got: BrokenDownTime = serde_json::from_str(&json).unwrap();
        assert_eq!(tm, got);
    }
}

/*!
The parsed-field accumulator and the date resolver.

Directives write into [`Fields`] as they match. Nothing is
cross-validated at that point beyond each directive's own range check, so
the accumulator can hold combinations that make no sense together (a
weekday that contradicts the date, an ISO week with no ISO year). Once
the whole format has matched, [`Fields::resolve`] turns the accumulated
values into a fully populated [`BrokenDownTime`], deriving whatever was
not given: a missing year defaults, a week number and weekday pin down a
date, a date pins down its weekday and day of the year.

The resolver runs fixed steps in a fixed order, and the order is load
bearing. Two-digit years are widened before ISO validation so that `%y`
counts as a calendar year there, and the placeholder-year substitution
happens before any week arithmetic so that week numbers resolve against
the placeholder like any other year.
*/

use alloc::string::String;

use crate::{
    civil::{self, Dst, Weekday, WeekStart},
    error::Error,
    offset::Offset,
};

/// Field values accumulated while matching directives against data.
///
/// `month` through `second` default rather than track absence: a format
/// with no time directives still resolves, to midnight on the given (or
/// defaulted) date. Everything that resolution branches on is an
/// `Option`.
#[derive(Debug)]
pub(crate) struct Fields {
    pub(crate) year: Option<i32>,
    pub(crate) century: Option<i32>,
    pub(crate) iso_year: Option<i32>,
    pub(crate) month: i32,
    pub(crate) day: i32,
    pub(crate) hour: i32,
    pub(crate) minute: i32,
    pub(crate) second: i32,
    pub(crate) subsec_micros: i32,
    pub(crate) weekday: Option<Weekday>,
    pub(crate) day_of_year: Option<i32>,
    pub(crate) iso_week: Option<i32>,
    pub(crate) week_of_year: Option<(i32, WeekStart)>,
    pub(crate) offset: Option<Offset>,
    /// Whether a two-digit year directive was matched. Gates the century
    /// widening step.
    pub(crate) saw_short_year: bool,
    /// Whether a day-of-month directive appeared in the format, whether
    /// or not it matched. Feeds the ambiguous-date warning.
    pub(crate) saw_day_of_month: bool,
    /// Whether any year directive appeared in the format. The century
    /// directive alone does not count.
    pub(crate) saw_year_directive: bool,
    /// Whether the colon-strict offset directive appeared. Changes the
    /// diagnostic when data is left over.
    pub(crate) saw_colon_offset: bool,
}

impl Default for Fields {
    fn default() -> Fields {
        Fields {
            year: None,
            century: None,
            iso_year: None,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            subsec_micros: 0,
            weekday: None,
            day_of_year: None,
            iso_week: None,
            week_of_year: None,
            offset: None,
            saw_short_year: false,
            saw_day_of_month: false,
            saw_year_directive: false,
            saw_colon_offset: false,
        }
    }
}

impl Fields {
    /// Resolves the accumulated fields into a broken down time.
    ///
    /// Fails when the field combination is one of the ISO mixtures that
    /// has no defined meaning, or when an ISO week number exceeds the
    /// week count of its ISO year.
    pub(crate) fn resolve(self) -> Result<BrokenDownTime, Error> {
        let Fields {
            year,
            century,
            iso_year,
            mut month,
            mut day,
            hour,
            minute,
            second,
            subsec_micros,
            weekday,
            mut day_of_year,
            iso_week,
            week_of_year,
            offset,
            saw_short_year,
            ..
        } = self;

        // Widen a two-digit year, with an explicit century when one was
        // parsed and the POSIX 1969..=2068 pivot otherwise.
        let mut year = year;
        if saw_short_year {
            if let Some(year) = year.as_mut() {
                *year += match century {
                    Some(century) => century * 100,
                    None if *year <= 68 => 2000,
                    None => 1900,
                };
            }
        }

        // The ISO field combination rules. An ISO year needs an ISO week
        // and a weekday; an ISO week without an ISO year is an error no
        // matter what else is present.
        if iso_year.is_some() {
            if day_of_year.is_some() {
                return Err(Error::day_of_year_with_iso_year());
            }
            if iso_week.is_none() || weekday.is_none() {
                return Err(Error::iso_year_incomplete());
            }
        } else if iso_week.is_some() {
            if year.is_none() || weekday.is_none() {
                return Err(Error::iso_week_incomplete());
            }
            return Err(Error::iso_week_with_calendar_year());
        }

        // With no year at all, resolve against 1900, or against the leap
        // year 1904 when the date is Feb 29. The substitution is undone
        // at the end; it only exists so that the date arithmetic below
        // has a leap year to work in.
        let mut leap_year_fix = false;
        let mut year = match year {
            Some(year) => year,
            None if month == 2 && day == 29 => {
                leap_year_fix = true;
                1904
            }
            None => 1900,
        };

        // Derive the day of the year from a week number and weekday, or
        // a date from the ISO week fields.
        if day_of_year.is_none() {
            if let Some(wd) = weekday {
                if let Some((week, start)) = week_of_year {
                    day_of_year =
                        Some(civil::week_julian(year, week, wd, start));
                } else if let (Some(iso_year), Some(iso_week)) =
                    (iso_year, iso_week)
                {
                    let iso_weekday =
                        i32::from(wd.to_monday_zero_offset()) + 1;
                    let (y, m, d) = civil::iso_calendar_to_date(
                        iso_year, iso_week, iso_weekday,
                    )?;
                    year = y;
                    month = m;
                    day = d;
                }
                // A week-zero day can land before Jan 1. Roll it into
                // the previous year.
                if let Some(doy) = day_of_year {
                    if doy <= 0 {
                        year -= 1;
                        day_of_year = Some(doy + civil::days_in_year(year));
                    }
                }
            }
        }

        // Make the date and the day of the year agree: derive whichever
        // one is still missing from the other. A derived date keeps the
        // raw day-of-year count even when a late week number pushed it
        // past the end of the year, so the count can exceed 366.
        let day_of_year = match day_of_year {
            None => civil::day_of_year(year, month, day),
            Some(doy) => {
                let ordinal = civil::ordinal_of(year, 1, 1) + doy - 1;
                let (y, m, d) = civil::date_of_ordinal(ordinal);
                year = y;
                month = m;
                day = d;
                doy
            }
        };

        // A parsed weekday is taken at its word, even when it
        // contradicts the date. Only a missing one is computed.
        let weekday = match weekday {
            Some(weekday) => weekday,
            None => civil::weekday_of(year, month, day),
        };

        if leap_year_fix {
            year = 1900;
        }

        // The day is i16 because an ISO week date anchored before year 1
        // resolves to a raw negative day of the month. Every other
        // component is parser-bounded or computed from a bounded value,
        // so those narrowings cannot truncate.
        Ok(BrokenDownTime {
            year: year as i16,
            month: month as i8,
            day: day as i16,
            hour: hour as i8,
            minute: minute as i8,
            second: second as i8,
            weekday,
            day_of_year: day_of_year as i16,
            dst: Dst::Unknown,
            subsec_micros,
            tz_name: None,
            utc_offset: offset.map(|offset| offset.seconds),
            utc_offset_subsec_micros: offset
                .map_or(0, |offset| offset.subsec_micros),
        })
    }
}

/// The result of a successful parse: every component of a timestamp,
/// fully resolved.
///
/// Components the format never mentioned carry their defaults (January,
/// day 1, midnight, year 1900), and redundant components are derived, so
/// `weekday` and `day_of_year` are always populated whether or not any
/// directive set them.
///
/// # Example
///
/// ```
/// use trice::{Outcome, Weekday};
///
/// let outcome = trice::parse("2023-06-15", "%Y-%m-%d")?;
/// let Outcome::Parsed(tm) = outcome else { unreachable!() };
/// assert_eq!(tm.year(), 2023);
/// assert_eq!(tm.weekday(), Weekday::Thursday);
/// assert_eq!(tm.day_of_year(), 166);
/// # Ok::<(), trice::Error>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BrokenDownTime {
    year: i16,
    month: i8,
    day: i16,
    hour: i8,
    minute: i8,
    second: i8,
    weekday: Weekday,
    day_of_year: i16,
    dst: Dst,
    subsec_micros: i32,
    tz_name: Option<String>,
    utc_offset: Option<i32>,
    utc_offset_subsec_micros: i32,
}

impl BrokenDownTime {
    /// Returns the year.
    ///
    /// When the format had no year directive this is the default `1900`,
    /// even for a February 29 that was internally resolved against a
    /// leap year.
    pub fn year(&self) -> i16 {
        self.year
    }

    /// Returns the month, `1..=12`.
    pub fn month(&self) -> i8 {
        self.month
    }

    /// Returns the day of the month, ordinarily `1..=31`.
    ///
    /// When an ISO week date names a week anchored before year 1, the
    /// date conversion passes its out-of-range day count through raw,
    /// which can push this below 1.
    pub fn day(&self) -> i16 {
        self.day
    }

    /// Returns the hour, `0..=23`.
    pub fn hour(&self) -> i8 {
        self.hour
    }

    /// Returns the minute, `0..=59`.
    pub fn minute(&self) -> i8 {
        self.minute
    }

    /// Returns the second, `0..=61`.
    ///
    /// The upper bound admits leap seconds, matching the range the
    /// seconds directive accepts.
    pub fn second(&self) -> i8 {
        self.second
    }

    /// Returns the weekday.
    ///
    /// This is the parsed weekday when a weekday directive matched, with
    /// no check that it agrees with the date. Otherwise it is computed
    /// from the resolved date.
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Returns the day of the year, ordinarily `1..=366`.
    ///
    /// When a week-of-year directive names a week running past the end
    /// of the year, the resolved date rolls into the next year but this
    /// count keeps the raw value, which can then exceed 366.
    pub fn day_of_year(&self) -> i16 {
        self.day_of_year
    }

    /// Returns whether daylight saving time is in effect.
    ///
    /// Always [`Dst::Unknown`]: nothing this parser accepts determines
    /// it.
    pub fn dst(&self) -> Dst {
        self.dst
    }

    /// Returns the fractional second in microseconds, `0..=999_999`.
    pub fn subsec_micros(&self) -> i32 {
        self.subsec_micros
    }

    /// Returns the time zone name, if one was parsed.
    ///
    /// Always `None`: numeric offsets carry no name, and name-based zone
    /// directives are not handled here.
    pub fn tz_name(&self) -> Option<&str> {
        self.tz_name.as_deref()
    }

    /// Returns the UTC offset in signed seconds, or `None` when no
    /// offset directive matched.
    pub fn utc_offset(&self) -> Option<i32> {
        self.utc_offset
    }

    /// Returns the fractional part of the UTC offset in signed
    /// microseconds, or `0` when there was none.
    pub fn utc_offset_subsec_micros(&self) -> i32 {
        self.utc_offset_subsec_micros
    }
}

/*!
Civil calendar types and arithmetic.

Everything here is pure integer math on the proleptic Gregorian calendar,
anchored so that 0001-01-01 has ordinal 1. The parser and the field
resolver both lean on these routines, and the resolver's correctness
depends on them agreeing with each other exactly, so they are written as
one self-consistent family: `date_of_ordinal` is the exact inverse of
`ordinal_of`, `weekday_of` agrees with the ordinal anchor (ordinal 1 was a
Monday) and the ISO week routines are defined in terms of both.
*/

use crate::error::Error;

/// A day of the week.
///
/// Parsing maps every weekday directive onto this one type, regardless of
/// whether the directive counts from Sunday or Monday, starting at zero or
/// one. The conversion routines do the offset arithmetic so callers don't
/// hand-roll modular math.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// Converts an offset in `0..=6`, where `0` is Monday, to a weekday.
    ///
    /// Returns `None` when the offset is out of range.
    pub const fn from_monday_zero_offset(offset: i8) -> Option<Weekday> {
        match offset {
            0 => Some(Weekday::Monday),
            1 => Some(Weekday::Tuesday),
            2 => Some(Weekday::Wednesday),
            3 => Some(Weekday::Thursday),
            4 => Some(Weekday::Friday),
            5 => Some(Weekday::Saturday),
            6 => Some(Weekday::Sunday),
            _ => None,
        }
    }

    /// Converts an offset in `1..=7`, where `1` is Monday, to a weekday.
    ///
    /// This is the numbering used by ISO 8601 weekday directives. Returns
    /// `None` when the offset is out of range.
    pub const fn from_monday_one_offset(offset: i8) -> Option<Weekday> {
        match offset {
            1..=7 => Weekday::from_monday_zero_offset(offset - 1),
            _ => None,
        }
    }

    /// Converts an offset in `0..=6`, where `0` is Sunday, to a weekday.
    ///
    /// This is the numbering used by the non-ISO numeric weekday
    /// directive. Returns `None` when the offset is out of range.
    pub const fn from_sunday_zero_offset(offset: i8) -> Option<Weekday> {
        match offset {
            0 => Some(Weekday::Sunday),
            1..=6 => Weekday::from_monday_zero_offset(offset - 1),
            _ => None,
        }
    }

    /// Returns this weekday as an offset in `0..=6` where `0` is Monday.
    pub const fn to_monday_zero_offset(self) -> i8 {
        self as i8
    }

    /// Returns this weekday as an offset in `0..=6` where `0` is Sunday.
    pub const fn to_sunday_zero_offset(self) -> i8 {
        (self.to_monday_zero_offset() + 1) % 7
    }
}

/// Whether daylight saving time is in effect for a parsed time.
///
/// This engine never determines it: offsets carry no DST information and
/// timezone names are not resolved here, so every parse reports
/// [`Dst::Unknown`]. The type still carries all three states so the result
/// record has the same shape as one filled in by a full parser.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dst {
    /// No determination was made.
    #[default]
    Unknown,
    /// Daylight saving time is not in effect.
    No,
    /// Daylight saving time is in effect.
    Yes,
}

impl Dst {
    /// Returns whether DST is in effect, or `None` when undetermined.
    pub const fn is_dst(self) -> Option<bool> {
        match self {
            Dst::Unknown => None,
            Dst::No => Some(false),
            Dst::Yes => Some(true),
        }
    }
}

/// Which day a week-of-year directive counts weeks from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WeekStart {
    Monday,
    Sunday,
}

/// Cumulative day counts before each month in a non-leap year, indexed by
/// month number. Index 0 is unused padding.
const DAYS_BEFORE_MONTH: [i32; 13] =
    [0, 0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Returns true if `year` is a leap year.
pub(crate) const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns the number of days in `year`.
pub(crate) const fn days_in_year(year: i32) -> i32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Returns the number of days in `year` strictly before `month`.
const fn days_before_month(year: i32, month: i32) -> i32 {
    let mut days = DAYS_BEFORE_MONTH[month as usize];
    if month > 2 && is_leap_year(year) {
        days += 1;
    }
    days
}

/// Returns the 1-based day of the year for `year-month-day`.
pub(crate) const fn day_of_year(year: i32, month: i32, day: i32) -> i32 {
    days_before_month(year, month) + day
}

/// Returns the weekday of `year-month-day`, via Sakamoto's fixed anchor
/// table.
pub(crate) const fn weekday_of(year: i32, month: i32, day: i32) -> Weekday {
    const ANCHOR: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

    let y = if month < 3 { year - 1 } else { year };
    // Sakamoto numbers weekdays from Sunday. Rotate to Monday=0, keeping
    // the result total for any input the resolver can produce.
    let sunday0 = (y + y / 4 - y / 100 + y / 400
        + ANCHOR[(month - 1) as usize]
        + day)
        % 7;
    weekday_from_monday_zero((sunday0 + 6).rem_euclid(7))
}

const fn weekday_from_monday_zero(offset: i32) -> Weekday {
    match offset {
        0 => Weekday::Monday,
        1 => Weekday::Tuesday,
        2 => Weekday::Wednesday,
        3 => Weekday::Thursday,
        4 => Weekday::Friday,
        5 => Weekday::Saturday,
        _ => Weekday::Sunday,
    }
}

/// Returns the proleptic Gregorian ordinal of `year-month-day`, where
/// 0001-01-01 is ordinal 1.
pub(crate) const fn ordinal_of(year: i32, month: i32, day: i32) -> i32 {
    let y = year - 1;
    let days_before_year = y * 365 + y / 4 - y / 100 + y / 400;
    days_before_year + days_before_month(year, month) + day
}

/// Returns the `(year, month, day)` with the given ordinal. The exact
/// inverse of [`ordinal_of`].
pub(crate) const fn date_of_ordinal(ordinal: i32) -> (i32, i32, i32) {
    // Peel off whole 400/100/4/1 year cycles from the 0-based day count.
    let mut n = ordinal - 1;
    let n400 = n / 146_097;
    n %= 146_097;
    let n100 = n / 36_524;
    n %= 36_524;
    let n4 = n / 1_461;
    n %= 1_461;
    let n1 = n / 365;
    n %= 365;

    let mut year = n400 * 400 + n100 * 100 + n4 * 4 + n1 + 1;
    // A remainder bucket of exactly 4 means the count landed on the last
    // day of a leap year: back the year up and pin the day to Dec 31.
    if n1 == 4 || n100 == 4 {
        year -= 1;
        n = 365;
    }

    // `n` is now the 0-based day within `year`.
    let mut month = 12;
    while month >= 1 {
        let days = days_before_month(year, month);
        if n >= days {
            return (year, month, n - days + 1);
        }
        month -= 1;
    }
    (year, 1, n + 1)
}

/// Returns the number of ISO 8601 weeks (52 or 53) in the given ISO year.
pub(crate) const fn iso_weeks_in_year(iso_year: i32) -> i32 {
    // A year has 53 ISO weeks iff Jan 1 or Dec 31 falls on a Thursday.
    let jan1 = weekday_of(iso_year, 1, 1);
    let dec31 = weekday_of(iso_year, 12, 31);
    if matches!(jan1, Weekday::Thursday) || matches!(dec31, Weekday::Thursday)
    {
        53
    } else {
        52
    }
}

/// Converts an ISO 8601 week date to a civil `(year, month, day)`.
///
/// `iso_weekday` is 1=Monday through 7=Sunday. The week number is
/// validated against the week count of `iso_year`; nothing else is, since
/// the parser bounds the other inputs before they get here.
pub(crate) fn iso_calendar_to_date(
    iso_year: i32,
    iso_week: i32,
    iso_weekday: i32,
) -> Result<(i32, i32, i32), Error> {
    if iso_week > iso_weeks_in_year(iso_year) {
        return Err(Error::invalid_week(iso_week));
    }
    // ISO week 1 is the week containing Jan 4, so day 1 of week 1 is the
    // Monday on or before Jan 4. Ordinal 1 was a Monday. The remainder
    // truncates, so an ISO year before 1 gets a negative weekday here and
    // the anchor shifts with it.
    let jan4 = ordinal_of(iso_year, 1, 4);
    let jan4_weekday = (jan4 - 1) % 7;
    let week1_monday = jan4 - jan4_weekday;
    let target = week1_monday + (iso_week - 1) * 7 + (iso_weekday - 1);
    Ok(date_of_ordinal(target))
}

/// Reconstructs a day of the year from a week-of-year number and a
/// weekday (Monday=0).
///
/// For week 0 the result may be zero or negative, meaning the requested
/// day falls before Jan 1; the field resolver rolls such values into the
/// previous year. For late weeks the result may run past the end of the
/// year; ordinal arithmetic rolls those forward.
pub(crate) const fn week_julian(
    year: i32,
    week_of_year: i32,
    weekday: Weekday,
    start: WeekStart,
) -> i32 {
    let mut first_weekday =
        weekday_of(year, 1, 1).to_monday_zero_offset() as i32;
    let mut day_of_week = weekday.to_monday_zero_offset() as i32;
    if matches!(start, WeekStart::Sunday) {
        first_weekday = (first_weekday + 1) % 7;
        day_of_week = (day_of_week + 1) % 7;
    }
    let week_0_length = (7 - first_weekday) % 7;
    if week_of_year == 0 {
        1 + day_of_week - first_weekday
    } else {
        let days_to_week = week_0_length + 7 * (week_of_year - 1);
        1 + days_to_week + day_of_week
    }
}

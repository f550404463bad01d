use trice::{BrokenDownTime, Error, Outcome, Warning, Weekday};

fn init() {
    let _ = env_logger::try_init();
}

fn parsed(data: &str, format: &str) -> anyhow::Result<BrokenDownTime> {
    match trice::parse(data, format)? {
        Outcome::Parsed(tm) => Ok(tm),
        Outcome::Deferred => {
            anyhow::bail!("{data:?} with {format:?} was deferred")
        }
    }
}

/// A sweep of supported formats against the values the reference
/// implementation produces for them, including its quirks: the 1900
/// default year, the two-digit year pivot, week numbers rolling the date
/// across a year boundary and the day-of-year count following them out of
/// range.
#[test]
fn reference_catalog() -> anyhow::Result<()> {
    init();
    let tests: &[(
        &str,
        &str,
        (i16, i8, i16),
        (i8, i8, i8),
        Weekday,
        i16,
    )] = &[
        (
            "2023-06-15 04:05:06",
            "%Y-%m-%d %H:%M:%S",
            (2023, 6, 15),
            (4, 5, 6),
            Weekday::Thursday,
            166,
        ),
        (
            "17/06/2016 23:59:60",
            "%d/%m/%Y %H:%M:%S",
            (2016, 6, 17),
            (23, 59, 60),
            Weekday::Friday,
            169,
        ),
        (
            "2023-06-15T04:05",
            "%FT%R",
            (2023, 6, 15),
            (4, 5, 0),
            Weekday::Thursday,
            166,
        ),
        ("12:34", "%H:%M", (1900, 1, 1), (12, 34, 0), Weekday::Monday, 1),
        ("99", "%y", (1999, 1, 1), (0, 0, 0), Weekday::Friday, 1),
        ("68", "%y", (2068, 1, 1), (0, 0, 0), Weekday::Sunday, 1),
        ("69", "%y", (1969, 1, 1), (0, 0, 0), Weekday::Wednesday, 1),
        ("20 23", "%C %y", (2023, 1, 1), (0, 0, 0), Weekday::Sunday, 1),
        (
            "2016 169",
            "%Y %j",
            (2016, 6, 17),
            (0, 0, 0),
            Weekday::Friday,
            169,
        ),
        (
            "2023- 5- 7",
            "%Y-%e-%k",
            (2023, 1, 5),
            (7, 0, 0),
            Weekday::Thursday,
            5,
        ),
        (
            "2023 24 4",
            "%Y %U %w",
            (2023, 6, 15),
            (0, 0, 0),
            Weekday::Thursday,
            166,
        ),
        (
            "2023 24 3",
            "%Y %W %u",
            (2023, 6, 14),
            (0, 0, 0),
            Weekday::Wednesday,
            165,
        ),
        // Week zero reaches back into the previous year.
        (
            "2025 00 2",
            "%Y %U %w",
            (2024, 12, 31),
            (0, 0, 0),
            Weekday::Tuesday,
            366,
        ),
        // A late week spills forward, and the day-of-year count follows
        // it right out of range.
        (
            "2018 53 0",
            "%Y %W %w",
            (2019, 1, 6),
            (0, 0, 0),
            Weekday::Sunday,
            371,
        ),
        (
            "2020 01 1",
            "%G %V %u",
            (2019, 12, 30),
            (0, 0, 0),
            Weekday::Monday,
            364,
        ),
    ];
    for &(data, format, date, time, weekday, day_of_year) in tests {
        let tm = parsed(data, format)?;
        let got = (
            (tm.year(), tm.month(), tm.day()),
            (tm.hour(), tm.minute(), tm.second()),
            tm.weekday(),
            tm.day_of_year(),
        );
        assert_eq!(
            got,
            (date, time, weekday, day_of_year),
            "\ndata: {data:?}\nformat: {format:?}",
        );
    }
    Ok(())
}

/// An ISO week date can anchor before year 1, where the reconstruction
/// runs on raw ordinals: the resolved day of the month and the day of
/// the year go negative together, matching the reference values rather
/// than wrapping into a small integer.
#[test]
fn iso_week_before_year_one() -> anyhow::Result<()> {
    init();
    let tests: &[(&str, (i16, i8, i16), Weekday, i16)] = &[
        ("0000 01 1", (1, 1, -356), Weekday::Monday, -356),
        ("0000 01 7", (1, 1, -350), Weekday::Sunday, -350),
        ("0001 01 1", (1, 1, 1), Weekday::Monday, 1),
    ];
    for &(data, date, weekday, day_of_year) in tests {
        let tm = parsed(data, "%G %V %u")?;
        let got = (
            (tm.year(), tm.month(), tm.day()),
            tm.weekday(),
            tm.day_of_year(),
        );
        assert_eq!(got, (date, weekday, day_of_year), "\ndata: {data:?}");
        assert_eq!(tm.day(), tm.day_of_year());
    }
    Ok(())
}

#[test]
fn kitchen_sink() -> anyhow::Result<()> {
    init();
    let tm = parsed("2024-02-29T23:59:60.123456+05:30", "%FT%T.%f%z")?;
    assert_eq!(tm.year(), 2024);
    assert_eq!(tm.month(), 2);
    assert_eq!(tm.day(), 29);
    assert_eq!(tm.hour(), 23);
    assert_eq!(tm.minute(), 59);
    assert_eq!(tm.second(), 60);
    assert_eq!(tm.subsec_micros(), 123_456);
    assert_eq!(tm.weekday(), Weekday::Thursday);
    assert_eq!(tm.day_of_year(), 60);
    assert_eq!(tm.utc_offset(), Some(19_800));
    assert_eq!(tm.utc_offset_subsec_micros(), 0);
    assert_eq!(tm.tz_name(), None);
    assert_eq!(tm.dst(), trice::Dst::Unknown);
    Ok(())
}

#[test]
fn offsets() -> anyhow::Result<()> {
    init();
    let tests: &[(&str, &str, i32, i32)] = &[
        ("2023+05:30", "%Y%z", 19_800, 0),
        ("2023-0530", "%Y%z", -19_800, 0),
        ("2023Z", "%Y%z", 0, 0),
        ("2023+05", "%Y%z", 18_000, 0),
        ("2023+05:30:15.25", "%Y%:z", 19_815, 250_000),
        ("2023-013015.5", "%Y%z", -5415, -500_000),
    ];
    for &(data, format, seconds, micros) in tests {
        let tm = parsed(data, format)?;
        assert_eq!(
            (tm.utc_offset(), tm.utc_offset_subsec_micros()),
            (Some(seconds), micros),
            "\ndata: {data:?}\nformat: {format:?}",
        );
    }

    // The offset directive also matches an absent offset.
    let tm = parsed("2023", "%Y%z")?;
    assert_eq!(tm.utc_offset(), None);
    assert_eq!(tm.utc_offset_subsec_micros(), 0);
    Ok(())
}

/// Errors carry the reference implementation's wording, so a caller that
/// matches on message text can't tell the fast path from its fallback.
#[test]
fn failure_wording() {
    init();
    let tests: &[(&str, &str, &str)] = &[
        (
            "2023-06-32",
            "%Y-%m-%d",
            "time data '2023-06-32' does not match format '%Y-%m-%d'",
        ),
        ("13", "%m", "time data '13' does not match format '%m'"),
        ("0", "%d", "time data '0' does not match format '%d'"),
        ("62", "%S", "time data '62' does not match format '%S'"),
        ("367", "%j", "time data '367' does not match format '%j'"),
        (
            "2023 54 1",
            "%G %V %u",
            "time data '2023 54 1' does not match format '%G %V %u'",
        ),
        ("2023 +1", "%Y %z", "time data does not match format"),
        ("2023-06-15xyz", "%Y-%m-%d", "unconverted data remains: xyz"),
        ("2023z", "%Y%z", "unconverted data remains: z"),
        (
            "2023 +0130:30",
            "%Y %z",
            "Inconsistent use of : in +0130:30",
        ),
        (
            "2023 +01:3030",
            "%Y %z",
            "Inconsistent use of : in +01:3030",
        ),
        (
            "2023 -01:3030",
            "%Y %:z",
            "Missing colon in %:z before '30', got '2023 -01:3030'",
        ),
        (
            "169 2016",
            "%j %G",
            "Day of the year directive '%j' is not compatible with ISO \
             year directive '%G'. Use '%Y' instead.",
        ),
        (
            "2016 17",
            "%G %V",
            "ISO year directive '%G' must be used with the ISO week \
             directive '%V' and a weekday directive ('%A', '%a', '%w', \
             or '%u').",
        ),
        (
            "17 3",
            "%V %u",
            "ISO week directive '%V' must be used with the ISO year \
             directive '%G' and a weekday directive ('%A', '%a', '%w', \
             or '%u').",
        ),
        (
            "2016 17",
            "%Y %V",
            "ISO week directive '%V' must be used with the ISO year \
             directive '%G' and a weekday directive ('%A', '%a', '%w', \
             or '%u').",
        ),
        (
            "2016 17 3",
            "%Y %V %u",
            "ISO week directive '%V' is incompatible with the year \
             directive '%Y'. Use the ISO year '%G' instead.",
        ),
        ("2019 53 1", "%G %V %u", "Invalid week: 53"),
    ];
    for &(data, format, message) in tests {
        let err = trice::parse(data, format).unwrap_err();
        assert_eq!(
            err.to_string(),
            message,
            "\ndata: {data:?}\nformat: {format:?}",
        );
    }
}

/// Everything the engine doesn't own comes back as a deferral, with the
/// data untouched and unjudged, even when it plainly wouldn't match.
#[test]
fn deferral_catalog() {
    init();
    let tests: &[(&str, &str)] = &[
        ("Thu", "%a"),
        ("Thursday", "%A"),
        ("Jun", "%b"),
        ("June", "%B"),
        ("Thu Jun 15 04:05:06 2023", "%c"),
        ("06/15/23", "%x"),
        ("04:05:06", "%X"),
        ("04:05:06 AM", "%r"),
        ("AM", "%p"),
        ("am", "%P"),
        ("UTC", "%Z"),
        ("11", "%I"),
        ("11", "%l"),
        ("2023", "%EY"),
        ("06", "%Om"),
        ("nonsense either way", "%"),
        ("nonsense either way", "%-"),
        ("nonsense either way", "%q"),
        ("nonsense either way", "%:q"),
        ("nonsense either way", "%:"),
    ];
    for &(data, format) in tests {
        assert_eq!(
            trice::parse(data, format).unwrap(),
            Outcome::Deferred,
            "\ndata: {data:?}\nformat: {format:?}",
        );
    }
}

#[test]
fn non_ascii_literals() -> anyhow::Result<()> {
    init();
    let tm = parsed("café 2023", "café %Y")?;
    assert_eq!(tm.year(), 2023);

    // The modifier-letter apostrophe in data matches an ASCII one in the
    // format.
    let tm = parsed("4\u{02BC}30", "%H'%M")?;
    assert_eq!((tm.hour(), tm.minute()), (4, 30));
    let tm = parsed("4'30", "%H'%M")?;
    assert_eq!((tm.hour(), tm.minute()), (4, 30));
    Ok(())
}

#[test]
fn day_without_year_warns() -> anyhow::Result<()> {
    init();
    let mut seen = Vec::new();
    let outcome = trice::parse_with(
        "02-29",
        "%m-%d",
        &mut |warning: Warning| -> Result<(), Error> {
            seen.push(warning);
            Ok(())
        },
    )?;
    let Outcome::Parsed(tm) = outcome else {
        anyhow::bail!("leap day was deferred")
    };
    // The ambiguity the warning is about: the leap day parses against a
    // fixup year, but the result still claims the default one.
    assert_eq!(tm.year(), 1900);
    assert_eq!((tm.month(), tm.day()), (2, 29));
    assert_eq!(seen, [Warning::DayOfMonthWithoutYear]);

    // A sink can turn the warning into the parse's failure.
    let err = trice::parse_with(
        "02-29",
        "%m-%d",
        &mut |warning: Warning| -> Result<(), Error> {
            Err(Error::from_args(format_args!("{warning}")))
        },
    )
    .unwrap_err();
    assert!(
        err.to_string().contains("ambiguous"),
        "unexpected message: {err}",
    );
    Ok(())
}

/// Parsing the same inputs any number of times gives the same answer.
/// Nothing about a parse, including a failed or deferred one, leaks into
/// the next.
#[test]
fn parses_are_independent() {
    init();
    let tests: &[(&str, &str)] = &[
        ("2023-06-15", "%Y-%m-%d"),
        ("15 June 2023", "%d %B %Y"),
        ("2023-06-32", "%Y-%m-%d"),
        ("169 2016", "%j %G"),
    ];
    for &(data, format) in tests {
        let first = trice::parse(data, format);
        for _ in 0..3 {
            let again = trice::parse(data, format);
            match (&first, &again) {
                (Ok(a), Ok(b)) => assert_eq!(a, b),
                (Err(a), Err(b)) => {
                    assert_eq!(a.to_string(), b.to_string())
                }
                _ => panic!("outcome flipped for {data:?} / {format:?}"),
            }
        }
    }
}

/*!
The format walker: matches a strftime-style format against data.

The walker makes a single pass over the format. Literals consume
themselves, whitespace consumes a whitespace run, and each `%` directive
dispatches to a routine that consumes a bounded slice of the input and
writes into the shared [`Fields`] accumulator. No cross-field validation
happens here; that is the resolver's job once the whole format has
matched.

Three outcomes are possible at every point, and keeping them distinct is
the whole design. Data that contradicts the format is an error with the
standard diagnostics. A format that asks for something this parser does
not do, like locale-dependent month names or the 12-hour clock, is not an
error at all: the walk stops and reports [`Step::Defer`], and the caller
hands the entire job to its fallback. Deferral must be decided purely by
looking at the format, never by how far the data got, so an unsupported
directive defers even when the data would obviously mismatch.
*/

use crate::{
    civil::{Weekday, WeekStart},
    error::Error,
    fields::Fields,
    offset,
    util::scan::{self, Parsed},
};

/// How a walk of the format ended, short of an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Step {
    /// Every directive and literal in the format matched.
    Matched,
    /// The format needs capabilities this parser does not have. Nothing
    /// is wrong with the data; the caller's fallback owns this parse.
    Defer,
}

pub(crate) struct Parser<'f, 'i, 't> {
    /// What remains of the format.
    pub(crate) fmt: &'f [u8],
    /// What remains of the data.
    pub(crate) inp: &'i [u8],
    /// The full data string, for diagnostics.
    pub(crate) data: &'i [u8],
    /// The full format string, for diagnostics.
    pub(crate) format: &'f [u8],
    pub(crate) fields: &'t mut Fields,
}

impl<'f, 'i, 't> Parser<'f, 'i, 't> {
    /// Matches the whole format against the whole data string.
    ///
    /// On `Step::Matched`, every byte of the data has been consumed and
    /// the accumulator holds everything the format provided. Leftover
    /// data is an error: a prefix match is no match at all.
    pub(crate) fn parse(&mut self) -> Result<Step, Error> {
        if let Step::Defer = self.walk()? {
            return Ok(Step::Defer);
        }
        if !self.inp.is_empty() {
            // When the colon-strict offset directive matched an offset
            // but stopped short, the missing colon is the story worth
            // telling, not the leftover bytes themselves.
            if self.fields.saw_colon_offset
                && self.fields.offset.is_some()
                && self.inp[0] != b':'
            {
                return Err(Error::missing_colon(self.inp, self.data));
            }
            return Err(Error::unconverted(self.inp));
        }
        Ok(Step::Matched)
    }

    /// Walks the format, consuming data as directives and literals
    /// match. Leftover data is the caller's problem: compound directives
    /// walk their expansion as a sub-format that legitimately stops
    /// mid-input.
    fn walk(&mut self) -> Result<Step, Error> {
        while !self.fmt.is_empty() {
            if self.f() != b'%' {
                self.parse_literal()?;
                continue;
            }
            if !self.bump_fmt() {
                trace!("format ends with a bare '%', deferring");
                return Ok(Step::Defer);
            }
            self.skip_extension();
            if self.fmt.is_empty() {
                trace!("format ends after '%' modifier flags, deferring");
                return Ok(Step::Defer);
            }
            match self.f() {
                b'%' => self.parse_percent()?,
                b'C' => self.parse_century()?,
                b'd' | b'e' => self.parse_day()?,
                b'F' => match self.parse_iso_date()? {
                    Step::Matched => {}
                    Step::Defer => return Ok(Step::Defer),
                },
                b'f' => self.parse_fractional()?,
                b'G' => self.parse_iso_week_year()?,
                b'H' | b'k' => self.parse_hour()?,
                b'j' => self.parse_day_of_year()?,
                b'M' => self.parse_minute()?,
                b'm' => self.parse_month()?,
                b'n' => self.parse_newline()?,
                b'R' => match self.parse_clock_nosecs()? {
                    Step::Matched => {}
                    Step::Defer => return Ok(Step::Defer),
                },
                b'S' => self.parse_second()?,
                b'T' => match self.parse_clock_secs()? {
                    Step::Matched => {}
                    Step::Defer => return Ok(Step::Defer),
                },
                b't' => self.parse_tab()?,
                b'U' => self.parse_week_sun()?,
                b'u' => self.parse_weekday_mon()?,
                b'V' => self.parse_week_iso()?,
                b'W' => self.parse_week_mon()?,
                b'w' => self.parse_weekday_sun()?,
                b'Y' => self.parse_year()?,
                b'y' => self.parse_year2()?,
                b'z' => self.parse_offset_nocolon()?,
                b':' => {
                    if self.fmt.get(1) == Some(&b'z') {
                        self.bump_fmt();
                        self.parse_offset_colon()?;
                    } else {
                        trace!("unsupported directive after '%:', deferring");
                        return Ok(Step::Defer);
                    }
                }
                b'I' | b'l' => {
                    // The 12-hour clock needs a meridiem to resolve, and
                    // meridiems are locale work.
                    trace!(
                        "12-hour clock directive '%{}', deferring",
                        crate::util::escape::Byte(self.f()),
                    );
                    return Ok(Step::Defer);
                }
                b'a' | b'A' | b'b' | b'B' | b'p' | b'P' | b'c' | b'r'
                | b'x' | b'X' | b'Z' => {
                    trace!(
                        "locale dependent directive '%{}', deferring",
                        crate::util::escape::Byte(self.f()),
                    );
                    return Ok(Step::Defer);
                }
                b'E' | b'O' => {
                    trace!(
                        "alternative representation modifier '%{}', \
                         deferring",
                        crate::util::escape::Byte(self.f()),
                    );
                    return Ok(Step::Defer);
                }
                _unk => {
                    trace!(
                        "unrecognized directive '%{}', deferring",
                        crate::util::escape::Byte(_unk),
                    );
                    return Ok(Step::Defer);
                }
            }
        }
        Ok(Step::Matched)
    }

    /// Returns the byte at the current position of the format string.
    ///
    /// # Panics
    ///
    /// This panics when the entire format string has been consumed.
    fn f(&self) -> u8 {
        self.fmt[0]
    }

    /// Returns the byte at the current position of the input string.
    ///
    /// # Panics
    ///
    /// This panics when the entire input string has been consumed.
    fn i(&self) -> u8 {
        self.inp[0]
    }

    /// Bumps the position of the format string.
    ///
    /// This returns true in precisely the cases where `self.f()` will
    /// not panic. i.e., When the end of the format string hasn't been
    /// reached yet.
    fn bump_fmt(&mut self) -> bool {
        self.fmt = &self.fmt[1..];
        !self.fmt.is_empty()
    }

    /// Bumps the position of the input string.
    ///
    /// This returns true in precisely the cases where `self.i()` will
    /// not panic. i.e., When the end of the input string hasn't been
    /// reached yet.
    fn bump_input(&mut self) -> bool {
        self.inp = &self.inp[1..];
        !self.inp.is_empty()
    }

    /// The standard match-failure diagnostic. It quotes the data and
    /// format in full, whatever directive the walk died on.
    fn mismatch(&self) -> Error {
        Error::mismatch(self.data, self.format)
    }

    /// Skips padding and case flags and a width after a `%`. They are
    /// accepted and ignored; widths never constrain what a directive
    /// consumes here.
    fn skip_extension(&mut self) {
        while !self.fmt.is_empty()
            && matches!(self.f(), b'-' | b'_' | b'0' | b'^' | b'#')
        {
            self.fmt = &self.fmt[1..];
        }
        while !self.fmt.is_empty() && self.f().is_ascii_digit() {
            self.fmt = &self.fmt[1..];
        }
    }

    // A parsing routine for each directive below. Each assumes the
    // format is positioned on the directive's own byte (after `%` and
    // any flags), and each leaves the format positioned after it.

    /// Parses a literal from the input that matches the current byte in
    /// the format string.
    ///
    /// A whitespace byte in the format requires at least one whitespace
    /// byte in the input, and then consumes the whole whitespace run on
    /// both sides.
    fn parse_literal(&mut self) -> Result<(), Error> {
        if scan::is_ascii_space(self.f()) {
            if self.inp.is_empty() || !scan::is_ascii_space(self.i()) {
                return Err(self.mismatch());
            }
            while scan::is_ascii_space(self.f()) && self.bump_fmt() {}
            while scan::is_ascii_space(self.i()) && self.bump_input() {}
        } else if self.f() == b'\'' {
            // An apostrophe also matches U+02BC MODIFIER LETTER
            // APOSTROPHE, which some locales emit in place of it.
            if self.inp.first() == Some(&b'\'') {
                self.bump_input();
            } else if self.inp.starts_with(&[0xCA, 0xBC]) {
                self.inp = &self.inp[2..];
            } else {
                return Err(self.mismatch());
            }
            self.bump_fmt();
        } else if self.inp.first() == Some(&self.f()) {
            self.bump_input();
            self.bump_fmt();
        } else {
            return Err(self.mismatch());
        }
        Ok(())
    }

    /// Parses a literal `%` from the input.
    fn parse_percent(&mut self) -> Result<(), Error> {
        if self.inp.first() != Some(&b'%') {
            return Err(self.mismatch());
        }
        self.bump_fmt();
        self.bump_input();
        Ok(())
    }

    /// Parses `%n`, which matches exactly one newline.
    fn parse_newline(&mut self) -> Result<(), Error> {
        if self.inp.first() != Some(&b'\n') {
            return Err(self.mismatch());
        }
        self.bump_fmt();
        self.bump_input();
        Ok(())
    }

    /// Parses `%t`, which matches exactly one tab.
    fn parse_tab(&mut self) -> Result<(), Error> {
        if self.inp.first() != Some(&b'\t') {
            return Err(self.mismatch());
        }
        self.bump_fmt();
        self.bump_input();
        Ok(())
    }

    /// Parses `%Y`, a year as exactly four digits.
    fn parse_year(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 4, 4)
        else {
            return Err(self.mismatch());
        };
        self.fields.year = Some(value);
        self.fields.saw_year_directive = true;
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%y`, a year within a century as exactly two digits.
    fn parse_year2(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 2, 2)
        else {
            return Err(self.mismatch());
        };
        self.fields.year = Some(value);
        self.fields.saw_short_year = true;
        self.fields.saw_year_directive = true;
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%C`, a century as exactly two digits.
    fn parse_century(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 2, 2)
        else {
            return Err(self.mismatch());
        };
        self.fields.century = Some(value);
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%m`, a month as one or two digits.
    fn parse_month(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 1, 2)
        else {
            return Err(self.mismatch());
        };
        if value < 1 || value > 12 {
            return Err(self.mismatch());
        }
        self.fields.month = value;
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%d` and `%e`, a day of the month as one or two digits,
    /// optionally preceded by a single padding space.
    fn parse_day(&mut self) -> Result<(), Error> {
        // The directive's presence in the format is recorded whether or
        // not it matches; the ambiguity warning is about the format.
        self.fields.saw_day_of_month = true;
        let mut inp = self.inp;
        if inp.first() == Some(&b' ') {
            inp = &inp[1..];
        }
        let Some(Parsed { value, input }) = scan::digits(inp, 1, 2) else {
            return Err(self.mismatch());
        };
        if value < 1 || value > 31 {
            return Err(self.mismatch());
        }
        self.fields.day = value;
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%H` and `%k`, an hour as one or two digits, optionally
    /// preceded by a single padding space.
    fn parse_hour(&mut self) -> Result<(), Error> {
        let mut inp = self.inp;
        if inp.first() == Some(&b' ') {
            inp = &inp[1..];
        }
        let Some(Parsed { value, input }) = scan::digits(inp, 1, 2) else {
            return Err(self.mismatch());
        };
        if value > 23 {
            return Err(self.mismatch());
        }
        self.fields.hour = value;
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%M`, a minute as one or two digits.
    fn parse_minute(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 1, 2)
        else {
            return Err(self.mismatch());
        };
        if value > 59 {
            return Err(self.mismatch());
        }
        self.fields.minute = value;
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%S`, a second as one or two digits. The upper bound of 61
    /// admits leap seconds.
    fn parse_second(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 1, 2)
        else {
            return Err(self.mismatch());
        };
        if value > 61 {
            return Err(self.mismatch());
        }
        self.fields.second = value;
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%f`, a fractional second as one to six digits,
    /// interpreted as if right-padded with zeros to microseconds.
    fn parse_fractional(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 1, 6)
        else {
            return Err(self.mismatch());
        };
        let ndigits = self.inp.len() - input.len();
        let mut micros = value;
        for _ in ndigits..6 {
            micros *= 10;
        }
        self.fields.subsec_micros = micros;
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%j`, a day of the year as one to three digits.
    fn parse_day_of_year(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 1, 3)
        else {
            return Err(self.mismatch());
        };
        if value < 1 || value > 366 {
            return Err(self.mismatch());
        }
        self.fields.day_of_year = Some(value);
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%w`, a weekday as one digit counting from Sunday as 0.
    fn parse_weekday_sun(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 1, 1)
        else {
            return Err(self.mismatch());
        };
        let Some(weekday) = Weekday::from_sunday_zero_offset(value as i8)
        else {
            return Err(self.mismatch());
        };
        self.fields.weekday = Some(weekday);
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%u`, a weekday as one digit counting from Monday as 1.
    fn parse_weekday_mon(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 1, 1)
        else {
            return Err(self.mismatch());
        };
        let Some(weekday) = Weekday::from_monday_one_offset(value as i8)
        else {
            return Err(self.mismatch());
        };
        self.fields.weekday = Some(weekday);
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%G`, an ISO 8601 week-based year as exactly four digits.
    fn parse_iso_week_year(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 4, 4)
        else {
            return Err(self.mismatch());
        };
        self.fields.iso_year = Some(value);
        self.fields.saw_year_directive = true;
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%V`, an ISO 8601 week number as one or two digits in
    /// `1..=53`. Whether week 53 exists in the ISO year is the
    /// resolver's question.
    fn parse_week_iso(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 1, 2)
        else {
            return Err(self.mismatch());
        };
        if value < 1 || value > 53 {
            return Err(self.mismatch());
        }
        self.fields.iso_week = Some(value);
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%U`, a week number in `0..=53` with weeks starting on
    /// Sunday.
    fn parse_week_sun(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 1, 2)
        else {
            return Err(self.mismatch());
        };
        if value > 53 {
            return Err(self.mismatch());
        }
        self.fields.week_of_year = Some((value, WeekStart::Sunday));
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%W`, a week number in `0..=53` with weeks starting on
    /// Monday.
    fn parse_week_mon(&mut self) -> Result<(), Error> {
        let Some(Parsed { value, input }) = scan::digits(self.inp, 1, 2)
        else {
            return Err(self.mismatch());
        };
        if value > 53 {
            return Err(self.mismatch());
        }
        self.fields.week_of_year = Some((value, WeekStart::Monday));
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%z`, a UTC offset with optional colons.
    fn parse_offset_nocolon(&mut self) -> Result<(), Error> {
        static PARSER: offset::Parser =
            offset::Parser::new().colon(offset::Colon::Optional);

        let Parsed { value, input } = PARSER.parse(self.inp)?;
        // An absent offset is a valid zero-length match that leaves any
        // previously parsed offset in place.
        if let Some(offset) = value {
            self.fields.offset = Some(offset);
        }
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%:z`, a UTC offset whose components are colon separated.
    fn parse_offset_colon(&mut self) -> Result<(), Error> {
        static PARSER: offset::Parser =
            offset::Parser::new().colon(offset::Colon::Required);

        self.fields.saw_colon_offset = true;
        let Parsed { value, input } = PARSER.parse(self.inp)?;
        if let Some(offset) = value {
            self.fields.offset = Some(offset);
        }
        self.inp = input;
        self.bump_fmt();
        Ok(())
    }

    /// Parses `%F`, which is equivalent to `%Y-%m-%d`.
    fn parse_iso_date(&mut self) -> Result<Step, Error> {
        self.parse_compound(b"%Y-%m-%d")
    }

    /// Parses `%T`, which is equivalent to `%H:%M:%S`.
    fn parse_clock_secs(&mut self) -> Result<Step, Error> {
        self.parse_compound(b"%H:%M:%S")
    }

    /// Parses `%R`, which is equivalent to `%H:%M`.
    fn parse_clock_nosecs(&mut self) -> Result<Step, Error> {
        self.parse_compound(b"%H:%M")
    }

    /// Walks a compound directive's expansion against the input, exactly
    /// as if its directives had been written out in the format itself.
    fn parse_compound(&mut self, fmt: &'static [u8]) -> Result<Step, Error> {
        let mut p = Parser {
            fmt,
            inp: self.inp,
            data: self.data,
            format: self.format,
            fields: self.fields,
        };
        if let Step::Defer = p.walk()? {
            return Ok(Step::Defer);
        }
        self.inp = p.inp;
        self.bump_fmt();
        Ok(Step::Matched)
    }
}

/*!
A parser for UTC offsets in timestamp data.

The grammar is `Z`, `±HH`, `±HHMM[SS[.ffffff]]` and
`±HH:MM[:SS[.ffffff]]`, with two properties that make it more than a digit
scan. First, the whole production is optional: a directive position where
the data shows no sign (and no `Z`) is a valid match of zero bytes, and
the offset simply stays unset. Second, colon placement must be internally
consistent. A data string like `-01:3030` is digit-wise parseable but
mixes separated and compact styles, and is rejected outright rather than
half-consumed.
*/

use crate::{
    error::Error,
    util::scan::{self, Parsed},
};

/// Whether an offset's hour-minute colon is required.
///
/// The colon-strict directive (`Required`) stops after the hours when no
/// colon follows them; the plain directive accepts both separated and
/// compact forms.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Colon {
    Optional,
    Required,
}

/// A successfully parsed UTC offset.
///
/// Both parts carry the sign, and the fractional part is normalized to
/// microseconds no matter how many digits were written.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Offset {
    pub(crate) seconds: i32,
    pub(crate) subsec_micros: i32,
}

/// A parser for UTC offsets.
///
/// There is one configuration knob and both of its settings are baked
/// into statics by the directive dispatcher, so building one of these is
/// entirely const.
#[derive(Debug)]
pub(crate) struct Parser {
    colon: Colon,
}

impl Parser {
    /// Create a new UTC offset parser with the default configuration:
    /// colons between components are optional.
    pub(crate) const fn new() -> Parser {
        Parser { colon: Colon::Optional }
    }

    /// Sets the colon requirement for this parser.
    pub(crate) const fn colon(self, colon: Colon) -> Parser {
        Parser { colon }
    }

    /// Parses an offset from the start of `input`.
    ///
    /// A `value` of `None` means the optional offset was absent: nothing
    /// was consumed and nothing failed. Errors are reserved for data that
    /// commits to an offset (a sign) and then breaks the grammar.
    pub(crate) fn parse<'i>(
        &self,
        input: &'i [u8],
    ) -> Result<Parsed<'i, Option<Offset>>, Error> {
        let colon_strict = matches!(self.colon, Colon::Required);

        if input.first() == Some(&b'Z') {
            let value = Some(Offset { seconds: 0, subsec_micros: 0 });
            return Ok(Parsed { value, input: &input[1..] });
        }
        let sign: i32 = match input.first() {
            Some(&b'+') => 1,
            Some(&b'-') => -1,
            _ => return Ok(Parsed { value: None, input }),
        };
        let mut pos = 1;

        // A sign commits us: the hours must follow, as exactly two digits.
        let Some(parsed) = scan::digits(&input[pos..], 2, 2) else {
            return Err(Error::offset_mismatch());
        };
        let hours = parsed.value;
        pos += 2;

        let mut minutes = 0;
        let mut seconds = 0;
        let mut subsec_micros = 0;
        'done: {
            let mut has_colon = false;
            if pos < input.len() && input[pos] == b':' {
                has_colon = true;
                pos += 1;
            } else if colon_strict {
                // The colon-strict directive without its colon matches
                // the hours alone.
                break 'done;
            }

            let Some(parsed) = scan::digits(&input[pos..], 2, 2) else {
                // No minutes. Just the hours matched.
                break 'done;
            };
            if parsed.value > 59 {
                return Err(Error::offset_mismatch());
            }
            minutes = parsed.value;
            pos += 2;

            if pos >= input.len() {
                break 'done;
            }
            let sec_sep_colon = input[pos] == b':';
            if sec_sep_colon {
                if !has_colon {
                    // Compact hours/minutes but separated seconds,
                    // e.g. `-0130:30`.
                    let offset = through_nonspace(input, pos);
                    return Err(Error::inconsistent_colon(offset));
                }
                pos += 1;
            } else if has_colon {
                // Separated hours/minutes but compact seconds. For the
                // plain directive that's an inconsistency when a
                // two-digit seconds value really follows, e.g.
                // `-01:3030`. For the colon-strict directive, stop and
                // leave the rest unconsumed.
                if !colon_strict
                    && matches!(input[pos], b'0'..=b'5')
                    && scan::digits(&input[pos..], 2, 2).is_some()
                {
                    let offset = through_nonspace(input, pos + 2);
                    return Err(Error::inconsistent_colon(offset));
                }
                break 'done;
            }

            let Some(parsed) = scan::digits(&input[pos..], 2, 2) else {
                break 'done;
            };
            if parsed.value > 59 {
                // Not a plausible seconds value. Leave it unconsumed.
                break 'done;
            }
            seconds = parsed.value;
            pos += 2;

            if pos < input.len() && input[pos] == b'.' {
                let Some(parsed) = scan::digits(&input[pos + 1..], 1, 6)
                else {
                    // A decimal point with no digits after it.
                    return Err(Error::offset_mismatch());
                };
                let ndigits = input.len() - pos - 1 - parsed.input.len();
                if parsed.input.first().map_or(false, u8::is_ascii_digit) {
                    // More than six fractional digits.
                    return Err(Error::offset_mismatch());
                }
                pos += 1 + ndigits;
                let mut micros = parsed.value;
                let mut i = ndigits;
                while i < 6 {
                    micros *= 10;
                    i += 1;
                }
                subsec_micros = sign * micros;
            } else if pos + 1 < input.len()
                && input[pos] == b':'
                && input[pos + 1].is_ascii_digit()
            {
                // A colon can't stand in for the decimal point.
                return Err(Error::offset_mismatch());
            }
        }

        let seconds = sign * (hours * 3600 + minutes * 60 + seconds);
        let value = Some(Offset { seconds, subsec_micros });
        Ok(Parsed { value, input: &input[pos..] })
    }
}

/// The prefix of `input` running from its start through the end of the
/// non-whitespace run containing (or ending at) position `end`.
///
/// Colon-inconsistency diagnostics quote the whole offending offset, so
/// this extends past the point of the error up to the next whitespace.
fn through_nonspace(input: &[u8], mut end: usize) -> &[u8] {
    while end < input.len() && !scan::is_ascii_space(input[end]) {
        end += 1;
    }
    &input[..end]
}

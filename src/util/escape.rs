/*!
Escaping routines for rendering raw parse input inside diagnostics.

Parse input is `&[u8]`, and error messages quote it back to the caller. The
types here write those bytes in a readable way no matter what they contain:
UTF-8 passes through (with control characters escaped) and anything else is
written as a hex escape.
*/

/// A `Display`/`Debug` adapter for a single byte.
///
/// Printable ASCII is written as-is. Everything else is written as an
/// escape sequence.
#[allow(dead_code)] // not used in some feature configs
#[derive(Clone, Copy)]
pub(crate) struct Byte(pub(crate) u8);

impl core::fmt::Display for Byte {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.0 == b' ' {
            return write!(f, " ");
        }
        // escape_default emits at most 4 bytes (e.g. \xAB).
        let mut buf = [0u8; 4];
        let mut len = 0;
        for b in core::ascii::escape_default(self.0) {
            buf[len] = b;
            len += 1;
        }
        // OK because escape_default only emits ASCII.
        let s = core::str::from_utf8(&buf[..len])
            .map_err(|_| core::fmt::Error)?;
        write!(f, "{}", s)
    }
}

impl core::fmt::Debug for Byte {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "'")?;
        core::fmt::Display::fmt(self, f)?;
        write!(f, "'")
    }
}

/// A `Display`/`Debug` adapter for a byte slice.
///
/// Works best when the bytes are mostly UTF-8, but tolerates anything.
/// Bytes that aren't valid UTF-8 are written as hex escapes. `Debug` wraps
/// the output in single quotes, matching the repr style used by the
/// mismatch diagnostics.
#[derive(Clone, Copy)]
pub(crate) struct Bytes<'a>(pub(crate) &'a [u8]);

impl<'a> core::fmt::Display for Bytes<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut bytes = self.0;
        while let Some(result) = decode_one(bytes) {
            let ch = match result {
                Ok(ch) => ch,
                Err(byte) => {
                    write!(f, r"\x{:02x}", byte)?;
                    bytes = &bytes[1..];
                    continue;
                }
            };
            bytes = &bytes[ch.len_utf8()..];
            match ch {
                '\0' => write!(f, "\\0")?,
                // Control characters without a short escape form.
                '\x01'..='\x08' | '\x0b' | '\x0c' | '\x0e'..='\x19' | '\x7f' => {
                    write!(f, "\\x{:02x}", u32::from(ch))?;
                }
                ch => write!(f, "{}", ch.escape_debug())?,
            }
        }
        Ok(())
    }
}

impl<'a> core::fmt::Debug for Bytes<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "'")?;
        core::fmt::Display::fmt(self, f)?;
        write!(f, "'")
    }
}

/// Decodes one codepoint from the front of `bytes`.
///
/// Returns `None` when `bytes` is empty, and `Err(first_byte)` when the
/// front of the slice isn't a valid UTF-8 encoding of one codepoint.
fn decode_one(bytes: &[u8]) -> Option<Result<char, u8>> {
    let first = *bytes.first()?;
    let len = match first {
        0x00..=0x7F => return Some(Ok(char::from(first))),
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Some(Err(first)),
    };
    if len > bytes.len() {
        return Some(Err(first));
    }
    match core::str::from_utf8(&bytes[..len]) {
        Ok(s) => s.chars().next().map(Ok),
        Err(_) => Some(Err(first)),
    }
}

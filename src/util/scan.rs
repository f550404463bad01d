/*!
Low level scanning primitives shared by the format walker and the offset
parser: a bounded digit scanner and the ASCII whitespace class.
*/

/// The result of a scan: a value and the input left over after it.
///
/// Scanners take a `&[u8]` and give back the unconsumed suffix, so the
/// number of bytes consumed is always `before.len() - after.len()`.
#[derive(Debug)]
pub(crate) struct Parsed<'i, V> {
    /// The value scanned.
    pub(crate) value: V,
    /// The remaining unscanned input.
    pub(crate) input: &'i [u8],
}

/// Scans a run of ASCII decimal digits from the start of `input`.
///
/// The run is greedy but never longer than `max` digits. If fewer than
/// `min` digits are present, this is no match: `None` is returned and the
/// caller's position does not move. On success the accumulated value and
/// the remaining input are returned.
///
/// `max` must be small enough that the value cannot overflow (at most 9
/// digits). Every caller in this crate is far below that.
pub(crate) fn digits(
    input: &[u8],
    min: usize,
    max: usize,
) -> Option<Parsed<'_, i32>> {
    debug_assert!(0 < min && min <= max && max <= 9);

    let mut value: i32 = 0;
    let mut count = 0;
    while count < max {
        let Some(&byte) = input.get(count) else { break };
        if !byte.is_ascii_digit() {
            break;
        }
        value = value * 10 + i32::from(byte - b'0');
        count += 1;
    }
    if count < min {
        return None;
    }
    Some(Parsed { value, input: &input[count..] })
}

/// Returns true for the six ASCII whitespace bytes recognized by the
/// format walker.
///
/// This includes vertical tab (0x0B), which `u8::is_ascii_whitespace`
/// leaves out.
pub(crate) fn is_ascii_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_greedy_up_to_max() {
        let p = digits(b"20230615", 1, 4).unwrap();
        assert_eq!(p.value, 2023);
        assert_eq!(p.input, b"0615");

        let p = digits(b"7:30", 1, 2).unwrap();
        assert_eq!(p.value, 7);
        assert_eq!(p.input, b":30");
    }

    #[test]
    fn digits_requires_min() {
        assert!(digits(b"7x", 2, 2).is_none());
        assert!(digits(b"", 1, 2).is_none());
        assert!(digits(b"x7", 1, 2).is_none());
    }

    #[test]
    fn digits_exact_width() {
        let p = digits(b"1999", 4, 4).unwrap();
        assert_eq!(p.value, 1999);
        assert!(p.input.is_empty());
        assert!(digits(b"199", 4, 4).is_none());
    }

    #[test]
    fn digits_leading_zeros() {
        let p = digits(b"007", 1, 3).unwrap();
        assert_eq!(p.value, 7);
        assert!(p.input.is_empty());
    }

    #[test]
    fn whitespace_class() {
        for byte in [b' ', b'\t', b'\n', 0x0B, 0x0C, b'\r'] {
            assert!(is_ascii_space(byte), "{byte:#04x}");
        }
        assert!(!is_ascii_space(b'x'));
        assert!(!is_ascii_space(0xA0));
    }
}

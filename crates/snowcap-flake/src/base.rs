//! Conversion between identifiers and strings in bases 2 through 36.
//!
//! Digits are `0-9` followed by `A-Z`. Encoding always emits upper case,
//! decoding accepts either case. Only non-negative values are supported since
//! generated identifiers never set the sign bit.

use crate::error::Error;

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 36;

/// Checks that `base` is within `2..=36`.
pub fn validate(base: u32) -> Result<u32, Error> {
    if (MIN_BASE..=MAX_BASE).contains(&base) {
        Ok(base)
    } else {
        Err(Error::InvalidBase { base })
    }
}

/// Renders `value` in the given base.
pub fn encode(value: i64, base: u32) -> Result<String, Error> {
    let base = validate(base)?;
    if value < 0 {
        return Err(Error::NegativeValue(value));
    }

    // 63 binary digits is the longest possible output
    let mut digits = Vec::with_capacity(63);
    let mut rest = value as u64;
    loop {
        let digit = (rest % base as u64) as u32;
        digits.push(digit_char(digit));
        rest /= base as u64;
        if rest == 0 {
            break;
        }
    }

    Ok(digits.into_iter().rev().collect())
}

/// Parses `text` written in the given base.
pub fn decode(text: &str, base: u32) -> Result<i64, Error> {
    let base = validate(base)?;
    if text.is_empty() {
        return Err(Error::EmptyDigits);
    }

    text.chars().try_fold(0_i64, |acc, c| {
        let digit = c.to_digit(base).ok_or(Error::InvalidDigit { digit: c, base })?;
        acc.checked_mul(base as i64)
            .and_then(|shifted| shifted.checked_add(digit as i64))
            .ok_or_else(|| Error::ValueOverflow {
                text: text.to_string(),
            })
    })
}

fn digit_char(digit: u32) -> char {
    // `digit < base <= 36` so this always yields a char
    char::from_digit(digit, MAX_BASE)
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_values() {
        assert_eq!(encode(0, 2).unwrap(), "0");
        assert_eq!(encode(255, 16).unwrap(), "FF");
        assert_eq!(encode(35, 36).unwrap(), "Z");
        assert_eq!(encode(36, 36).unwrap(), "10");
        assert_eq!(encode(i64::MAX, 2).unwrap(), "1".repeat(63));
        assert_eq!(encode(i64::MAX, 16).unwrap(), "7FFFFFFFFFFFFFFF");
    }

    #[test]
    fn matches_std_radix_formatting() {
        let value = 4_198_400_000_i64;
        assert_eq!(encode(value, 16).unwrap(), format!("{value:X}"));
        assert_eq!(encode(value, 8).unwrap(), format!("{value:o}"));
        assert_eq!(encode(value, 10).unwrap(), value.to_string());
    }

    #[test]
    fn decode_is_case_insensitive() {
        assert_eq!(decode("ff", 16).unwrap(), 255);
        assert_eq!(decode("FF", 16).unwrap(), 255);
        assert_eq!(decode("zZ", 36).unwrap(), 35 * 36 + 35);
    }

    #[test]
    fn round_trips_every_base() {
        let samples = [
            0_i64,
            1,
            35,
            4095,
            (1 << 41) - 1,
            (1000 << 22) | (1 << 17) | (1 << 12),
            i64::MAX,
        ];
        for base in MIN_BASE..=MAX_BASE {
            for value in samples {
                let text = encode(value, base).unwrap();
                assert_eq!(decode(&text, base).unwrap(), value, "base {base}: {text}");
            }
        }
    }

    #[test]
    fn rejects_bases_out_of_range() {
        assert_eq!(encode(1, 1), Err(Error::InvalidBase { base: 1 }));
        assert_eq!(encode(1, 37), Err(Error::InvalidBase { base: 37 }));
        assert_eq!(decode("1", 0), Err(Error::InvalidBase { base: 0 }));
        assert!(encode(1, 37).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn rejects_negative_values() {
        assert_eq!(encode(-1, 16), Err(Error::NegativeValue(-1)));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(decode("", 10), Err(Error::EmptyDigits));
        assert_eq!(
            decode("12", 2),
            Err(Error::InvalidDigit {
                digit: '2',
                base: 2
            })
        );
        assert_eq!(
            decode("-1", 10),
            Err(Error::InvalidDigit {
                digit: '-',
                base: 10
            })
        );
        assert!(matches!(
            decode("8000000000000000", 16),
            Err(Error::ValueOverflow { .. })
        ));
    }
}

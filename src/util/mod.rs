//! Internal utility functions and helpers.
//!
//! This module contains small helper functions used throughout the crate.
//! It is an implementation detail and not part of the public API.

use crate::config::Flags;
use crate::error::CsumError;

/// Result of lenient unsigned integer parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Parsed {
    /// The parsed value, or zero when no digits were found.
    pub value: u64,
    /// Whether the whole input was consumed.
    pub complete: bool,
}

/// Parses an unsigned integer with C base-prefix conventions.
///
/// `0x`/`0X` selects hexadecimal, a leading `0` selects octal, anything else
/// is decimal. Leading whitespace and a sign are accepted, a minus sign wraps.
/// Parsing stops at the first invalid digit; overflow saturates at `u64::MAX`.
pub(crate) fn parse_ulong(input: &str) -> Parsed {
    let s = input.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let bytes = s.as_bytes();
    let has_hex_prefix = bytes.len() > 2
        && bytes[0] == b'0'
        && (bytes[1] == b'x' || bytes[1] == b'X')
        && bytes[2].is_ascii_hexdigit();

    let (radix, digits) = if has_hex_prefix {
        (16, &s[2..])
    } else if bytes.first() == Some(&b'0') {
        (8, s)
    } else {
        (10, s)
    };

    let mut value = 0u64;
    let mut used = 0usize;
    let mut overflow = false;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(radix) else {
            break;
        };
        match value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
        {
            Some(v) => value = v,
            None => overflow = true,
        }
        used += 1;
    }

    if used == 0 {
        return Parsed {
            value: 0,
            complete: false,
        };
    }

    if overflow {
        value = u64::MAX;
    } else if negative {
        value = value.wrapping_neg();
    }

    Parsed {
        value,
        complete: used == digits.len(),
    }
}

/// Resolves an optional algorithm parameter into a seed value.
///
/// Absent parameters yield zero. Malformed parameters degrade to their
/// parseable prefix unless [`Flags::STRICT`] is set.
pub(crate) fn parse_seed(args: Option<&str>, flags: Flags) -> Result<u64, CsumError> {
    let Some(args) = args else {
        return Ok(0);
    };

    let parsed = parse_ulong(args);
    if !parsed.complete {
        if flags.contains(Flags::STRICT) {
            return Err(CsumError::MalformedParameter {
                input: args.to_owned(),
            });
        }
        tracing::warn!(
            parameter = args,
            value = parsed.value,
            "malformed parameter, using parsed prefix"
        );
    }

    Ok(parsed.value)
}

//! Reading dumps back.
//!
//! Statistical test suites consume the dumps as-is; decoding exists so that a
//! dump can be checked against the values that produced it. Binary-Float32
//! decoding is exact: [`decode_float32_bits`] returns the original bit
//! pattern, including NaN payloads.
//!
//! ## Examples
//!
//! ```rust
//! use seqdump::{decode_float32_bits, decode_token, Encoding};
//!
//! assert_eq!(decode_token("0xffff", &Encoding::Hex16).unwrap(), 65535.0);
//! assert_eq!(decode_token("00000101", &Encoding::Binary(8)).unwrap(), 5.0);
//!
//! let bits = decode_float32_bits("00111111100000000000000000000000").unwrap();
//! assert_eq!(bits, 1.0f32.to_bits());
//! ```

use crate::{DumpOptions, Encoding, Error, Result, Separator};
use num_bigint::BigUint;

/// Decodes a single token back into its numeric value.
///
/// Hex-16 and Binary-N return the integer the token spells out; Binary-Float32
/// returns the single-precision value widened to `f64`. Binary-N tokens wider
/// than 64 digits are rounded to the nearest `f64`, which is exact for every
/// token the encoder produces.
///
/// # Errors
///
/// Returns [`Error::InvalidToken`] (with index 0) if the token is malformed.
pub fn decode_token(token: &str, encoding: &Encoding) -> Result<f64> {
    decode_at(0, token, encoding)
}

/// Parses a 32-character Binary-Float32 token into its raw bit pattern.
///
/// # Examples
///
/// ```rust
/// use seqdump::decode_float32_bits;
///
/// assert!(decode_float32_bits("0101").is_err());
/// ```
pub fn decode_float32_bits(token: &str) -> Result<u32> {
    float32_bits_at(0, token)
}

/// Decodes a whole dump produced with `options`.
///
/// Newline dumps are split on line breaks (blank lines and surrounding
/// whitespace are ignored). Concatenated dumps are split into fixed-width
/// chunks, which only works for encodings with a fixed width.
///
/// # Errors
///
/// Returns [`Error::InvalidOptions`] when a concatenated dump has no fixed
/// token width, and [`Error::InvalidToken`] for any malformed token.
pub fn from_str(s: &str, options: &DumpOptions) -> Result<Vec<f64>> {
    match options.separator {
        Separator::Newline => s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, token)| decode_at(index, token, &options.encoding))
            .collect(),
        Separator::Concatenated => {
            let width = match options.encoding.fixed_width() {
                Some(width) if width > 0 => width,
                _ => {
                    return Err(Error::invalid_options(&format!(
                        "{} tokens cannot be split without a separator",
                        options.encoding
                    )))
                }
            };
            let run = s.trim();
            if !run.is_ascii() {
                return Err(Error::invalid_token(0, run, "dump is not ASCII"));
            }
            if run.len() % width != 0 {
                return Err(Error::invalid_token(
                    run.len() / width,
                    &run[run.len() - run.len() % width..],
                    &format!("dump length {} is not a multiple of {}", run.len(), width),
                ));
            }
            run.as_bytes()
                .chunks(width)
                .enumerate()
                .map(|(index, chunk)| {
                    // Chunks of an ASCII string are valid UTF-8
                    let token = std::str::from_utf8(chunk).map_err(Error::custom)?;
                    decode_at(index, token, &options.encoding)
                })
                .collect()
        }
    }
}

fn decode_at(index: usize, token: &str, encoding: &Encoding) -> Result<f64> {
    match encoding {
        Encoding::Hex16 => {
            let digits = token
                .strip_prefix("0x")
                .ok_or_else(|| Error::invalid_token(index, token, "missing 0x prefix"))?;
            let lowercase_hex = digits
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
            if digits.is_empty() || !lowercase_hex {
                return Err(Error::invalid_token(
                    index,
                    token,
                    "expected lowercase hex digits",
                ));
            }
            u16::from_str_radix(digits, 16)
                .map(f64::from)
                .map_err(|e| Error::invalid_token(index, token, &e.to_string()))
        }
        Encoding::Binary(_) => binary_at(index, token),
        Encoding::Float32 => float32_bits_at(index, token).map(|bits| f32::from_bits(bits) as f64),
    }
}

fn binary_at(index: usize, token: &str) -> Result<f64> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if digits.is_empty() {
        return Err(Error::invalid_token(index, token, "no binary digits"));
    }

    if !digits.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(Error::invalid_token(index, token, "not a binary digit"));
    }

    let significant = digits.trim_start_matches('0');
    let magnitude = if significant.is_empty() {
        0.0
    } else if significant.len() <= 64 {
        u64::from_str_radix(significant, 2)
            .map(|n| n as f64)
            .map_err(|e| Error::invalid_token(index, token, &e.to_string()))?
    } else {
        wide_binary(significant)
            .ok_or_else(|| Error::invalid_token(index, token, "not a binary digit"))?
    };

    Ok(if negative { -magnitude } else { magnitude })
}

/// Rounds a binary digit string of more than 64 significant digits to the
/// nearest `f64`. The top 64 bits carry a sticky bit for everything below.
fn wide_binary(digits: &str) -> Option<f64> {
    let big = BigUint::parse_bytes(digits.as_bytes(), 2)?;
    let shift = big.bits().saturating_sub(64);
    let mut top = u64::try_from(&big >> shift).ok()?;
    if big.trailing_zeros().is_some_and(|zeros| zeros < shift) {
        top |= 1;
    }
    Some(top as f64 * 2f64.powi(shift.min(2048) as i32))
}

fn float32_bits_at(index: usize, token: &str) -> Result<u32> {
    if token.len() != 32 {
        return Err(Error::invalid_token(
            index,
            token,
            &format!("expected 32 binary digits, found {}", token.len()),
        ));
    }
    if token.starts_with(['+', '-']) {
        return Err(Error::invalid_token(index, token, "sign not allowed"));
    }
    u32::from_str_radix(token, 2).map_err(|e| Error::invalid_token(index, token, &e.to_string()))
}

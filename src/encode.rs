//! Leaf encoding.
//!
//! This module turns numeric leaves into fixed-width ASCII tokens and
//! provides the [`Encoder`] that accumulates a whole dump.
//!
//! ## Encodings
//!
//! | Encoding | Token for `5.0` | Notes |
//! |----------|-----------------|-------|
//! | Hex-16 | `0x5` | cast to `u16`, wraps modulo 2^16, no padding |
//! | Binary-8 | `00000101` | rounded (ties to even), padded, never truncated |
//! | Binary-Float32 | `01000000101000000000000000000000` | big-endian `f32` bits |
//!
//! ## Usage
//!
//! ```rust
//! use seqdump::{encode_leaf, Encoding};
//!
//! assert_eq!(encode_leaf(65535.0, &Encoding::Hex16).unwrap(), "0xffff");
//! assert_eq!(encode_leaf(65536.0, &Encoding::Hex16).unwrap(), "0x0");
//! assert_eq!(encode_leaf(5.0, &Encoding::Binary(8)).unwrap(), "00000101");
//! assert_eq!(
//!     encode_leaf(1.0, &Encoding::Float32).unwrap(),
//!     "00111111100000000000000000000000"
//! );
//! ```
//!
//! ## Direct Encoder Usage
//!
//! ```rust
//! use seqdump::{nested, DumpOptions, Encoder};
//!
//! let mut encoder = Encoder::new(DumpOptions::binary(4));
//! encoder.encode(&nested!([[1, 2], [3]])).unwrap();
//! assert_eq!(encoder.token_count(), 3);
//! assert_eq!(encoder.into_inner(), "0001\n0010\n0011\n");
//! ```

use crate::{DumpOptions, Encoding, Error, Nested, Result};
use num_bigint::BigUint;

const TWO_POW_16: f64 = 65_536.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Encodes a single leaf under the given encoding.
///
/// # Errors
///
/// Returns [`Error::NonFinite`] when a NaN or infinite leaf is encoded as
/// Binary-N. Hex-16 and Binary-Float32 accept every value.
pub fn encode_leaf(value: f64, encoding: &Encoding) -> Result<String> {
    match encoding {
        Encoding::Hex16 => Ok(hex16(value)),
        Encoding::Binary(width) => binary(value, *width),
        Encoding::Float32 => Ok(float32(value)),
    }
}

/// Encodes every leaf of `value` in traversal order.
///
/// # Examples
///
/// ```rust
/// use seqdump::{encode_tokens, nested, Encoding};
///
/// let tokens = encode_tokens(&nested!([[1, 2], [], [255]]), &Encoding::Hex16).unwrap();
/// assert_eq!(tokens, vec!["0x1", "0x2", "0xff"]);
/// ```
pub fn encode_tokens(value: &Nested, encoding: &Encoding) -> Result<Vec<String>> {
    value
        .leaves()
        .map(|leaf| encode_leaf(leaf, encoding))
        .collect()
}

/// Casts to `u16` the way a fixed-width unsigned conversion does: truncate
/// toward zero, then wrap modulo 2^16. Non-finite values become 0.
#[inline]
fn cast_u16(value: f64) -> u16 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(TWO_POW_16) as u16
}

fn hex16(value: f64) -> String {
    format!("{:#x}", cast_u16(value))
}

fn binary(value: f64, width: usize) -> Result<String> {
    if !value.is_finite() {
        return Err(Error::non_finite(value, &Encoding::Binary(width).to_string()));
    }

    let rounded = value.round_ties_even();
    let digits = magnitude_digits(rounded.abs());

    // The sign occupies one column of the requested width
    if rounded < 0.0 {
        let pad = width.saturating_sub(1);
        Ok(format!("-{:0>pad$}", digits, pad = pad))
    } else {
        Ok(format!("{:0>width$}", digits, width = width))
    }
}

/// Binary digits of a non-negative integral `f64`, exact at any magnitude.
fn magnitude_digits(magnitude: f64) -> String {
    if magnitude < TWO_POW_64 {
        return format!("{:b}", magnitude as u64);
    }

    // magnitude = mantissa * 2^(exponent - 1075), and the shift is at least 12 here
    let bits = magnitude.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as usize;
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
    format!("{:b}", BigUint::from(mantissa) << (exponent - 1075))
}

fn float32(value: f64) -> String {
    let mut token = String::with_capacity(32);
    for byte in (value as f32).to_be_bytes() {
        token.push_str(&format!("{:08b}", byte));
    }
    token
}

/// Accumulates encoded tokens into a dump string.
///
/// Each token is followed by the configured separator, so newline dumps end
/// with a trailing `\n` and concatenated dumps are a single unbroken run.
pub struct Encoder {
    output: String,
    options: DumpOptions,
    tokens: usize,
}

impl Encoder {
    pub fn new(options: DumpOptions) -> Self {
        Encoder {
            output: String::with_capacity(256),
            options,
            tokens: 0,
        }
    }

    pub fn options(&self) -> &DumpOptions {
        &self.options
    }

    /// Appends one leaf.
    pub fn push_leaf(&mut self, value: f64) -> Result<()> {
        let token = encode_leaf(value, &self.options.encoding)?;
        self.output.push_str(&token);
        self.output.push_str(self.options.separator.as_str());
        self.tokens += 1;
        Ok(())
    }

    /// Appends every leaf of `value` in traversal order.
    ///
    /// On error the tokens encoded before the failing leaf stay in the buffer.
    pub fn encode(&mut self, value: &Nested) -> Result<()> {
        self.output.reserve(value.leaf_count() * self.token_estimate());
        for leaf in value.leaves() {
            self.push_leaf(leaf)?;
        }
        Ok(())
    }

    /// Number of tokens written so far.
    pub fn token_count(&self) -> usize {
        self.tokens
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    fn token_estimate(&self) -> usize {
        let width = self.options.encoding.fixed_width().unwrap_or(6);
        width + self.options.separator.as_str().len()
    }
}

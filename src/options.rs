//! Configuration options for sequence dumps.
//!
//! This module provides types to customize dump output:
//!
//! - [`DumpOptions`]: Main configuration struct
//! - [`Encoding`]: How each leaf becomes a token (hex, padded binary, float bits)
//! - [`Separator`]: What goes between tokens (newline or nothing)
//!
//! ## Examples
//!
//! ```rust
//! use seqdump::{nested, to_string_with_options, DumpOptions, Encoding};
//!
//! let value = nested!([[5, 6]]);
//!
//! // One 8-bit binary token per line
//! let options = DumpOptions::binary(8);
//! let dump = to_string_with_options(&value, &options).unwrap();
//! assert_eq!(dump, "00000101\n00000110\n");
//!
//! // One unbroken run of IEEE-754 single-precision bits
//! let options = DumpOptions::float32().concatenated();
//! let dump = to_string_with_options(&value, &options).unwrap();
//! assert_eq!(dump.len(), 64);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a single leaf is rendered as an ASCII token.
///
/// # Examples
///
/// ```rust
/// use seqdump::Encoding;
///
/// assert_eq!(Encoding::Hex16.fixed_width(), None);
/// assert_eq!(Encoding::Binary(12).fixed_width(), Some(12));
/// assert_eq!(Encoding::Float32.fixed_width(), Some(32));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// `0x`-prefixed lowercase hex of the value cast to `u16`
    #[default]
    Hex16,
    /// Binary digits of the rounded value, zero-padded to the given width
    Binary(usize),
    /// The 32 bits of the big-endian IEEE-754 single-precision pattern
    Float32,
}

impl Encoding {
    /// Width every token is padded to, if the encoding has one.
    ///
    /// Hex-16 tokens are not padded. Binary tokens may still exceed their
    /// width when the value needs more digits.
    #[must_use]
    pub const fn fixed_width(&self) -> Option<usize> {
        match self {
            Encoding::Hex16 => None,
            Encoding::Binary(width) => Some(*width),
            Encoding::Float32 => Some(32),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Hex16 => f.write_str("hex-16"),
            Encoding::Binary(width) => write!(f, "binary-{}", width),
            Encoding::Float32 => f.write_str("binary-float32"),
        }
    }
}

/// What is written between consecutive tokens.
///
/// # Examples
///
/// ```rust
/// use seqdump::Separator;
///
/// assert_eq!(Separator::Newline.as_str(), "\n");
/// assert_eq!(Separator::Concatenated.as_str(), "");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    /// One token per line, each followed by `\n`
    #[default]
    Newline,
    /// Tokens concatenated into a single unbroken run
    Concatenated,
}

impl Separator {
    /// Returns the string written after each token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Separator::Newline => "\n",
            Separator::Concatenated => "",
        }
    }
}

/// Configuration for dumping a nested structure.
///
/// # Examples
///
/// ```rust
/// use seqdump::{DumpOptions, Encoding, Separator};
///
/// // Hex-16, one token per line
/// let options = DumpOptions::new();
/// assert_eq!(options.encoding, Encoding::Hex16);
///
/// // Custom configuration
/// let options = DumpOptions::new()
///     .with_encoding(Encoding::Binary(16))
///     .with_separator(Separator::Concatenated);
/// assert_eq!(options.separator, Separator::Concatenated);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DumpOptions {
    pub encoding: Encoding,
    pub separator: Separator,
}

impl DumpOptions {
    /// Creates default options (Hex-16, newline separated).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn hex16() -> Self {
        Self::new().with_encoding(Encoding::Hex16)
    }

    /// Zero-padded binary of the given width, newline separated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seqdump::{DumpOptions, Encoding};
    ///
    /// assert_eq!(DumpOptions::binary(8).encoding, Encoding::Binary(8));
    /// ```
    #[must_use]
    pub fn binary(width: usize) -> Self {
        Self::new().with_encoding(Encoding::Binary(width))
    }

    #[must_use]
    pub fn float32() -> Self {
        Self::new().with_encoding(Encoding::Float32)
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Shorthand for `with_separator(Separator::Concatenated)`.
    #[must_use]
    pub fn concatenated(self) -> Self {
        self.with_separator(Separator::Concatenated)
    }
}

//! Error types for flattening, encoding, decoding and reporting.
//!
//! ## Error Categories
//!
//! - **Type errors**: a value handed to [`to_value`](crate::to_value) contains something
//!   that is neither a number nor a sequence
//! - **Encoding errors**: a leaf cannot be represented in the requested encoding
//! - **Token errors**: a dump file contains a token that does not parse back
//! - **I/O errors**: file reading/writing failures
//! - **Collaborator errors**: checkpoint savers and report transports
//!
//! ## Examples
//!
//! ```rust
//! use seqdump::{decode_token, Encoding, Error};
//!
//! let result = decode_token("0xzz", &Encoding::Hex16);
//! assert!(matches!(result, Err(Error::InvalidToken { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// A serialized value contained something other than numbers and sequences
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// NaN or infinity handed to an encoding that needs an integer
    #[error("Cannot encode non-finite value {value} as {encoding}")]
    NonFinite { value: f64, encoding: String },

    /// A token that does not parse under the configured encoding
    #[error("Invalid token #{index} {token:?}: {reason}")]
    InvalidToken {
        index: usize,
        token: String,
        reason: String,
    },

    /// Option combination that cannot be honoured
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Report transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Checkpoint persistence failure
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),

    /// Generic message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates an unsupported type error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seqdump::Error;
    ///
    /// let err = Error::unsupported_type("strings");
    /// assert_eq!(err.to_string(), "Unsupported type: strings");
    /// ```
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    pub fn non_finite(value: f64, encoding: &str) -> Self {
        Error::NonFinite {
            value,
            encoding: encoding.to_string(),
        }
    }

    /// Creates an invalid token error. `index` is the zero-based position of
    /// the token in the dump.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seqdump::Error;
    ///
    /// let err = Error::invalid_token(3, "0b12", "not a binary digit");
    /// assert!(err.to_string().contains("#3"));
    /// ```
    pub fn invalid_token(index: usize, token: &str, reason: &str) -> Self {
        Error::InvalidToken {
            index,
            token: token.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_options(msg: &str) -> Self {
        Error::InvalidOptions(msg.to_string())
    }

    pub fn transport<T: fmt::Display>(msg: T) -> Self {
        Error::Transport(msg.to_string())
    }

    pub fn checkpoint<T: fmt::Display>(msg: T) -> Self {
        Error::Checkpoint(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

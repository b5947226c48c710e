//! # seqdump
//!
//! Turns the nested numeric output of a generator network into ASCII sequence
//! files for statistical test suites, and handles the peripheral chores of an
//! adversarial training run: raw log dumps, checkpoint placement and the
//! end-of-training report.
//!
//! ## Flatten and Encode
//!
//! Generator output is rarely a flat vector. It arrives as batches of rows,
//! sometimes ragged, sometimes with empty batches. [`Nested`] represents any
//! such shape, and flattening walks it depth-first, left to right:
//!
//! ```rust
//! use seqdump::{flatten, nested};
//!
//! let output = nested!([[1, 2], [3], [4, 5, 6]]);
//! assert_eq!(flatten(&output), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
//! ```
//!
//! Each leaf is then encoded as a fixed-width token:
//!
//! | Encoding | `65535.0` | `5.0` | `1.0` |
//! |----------|-----------|-------|-------|
//! | Hex-16 | `0xffff` | `0x5` | `0x1` |
//! | Binary-8 | `1111111111111111` | `00000101` | `00000001` |
//! | Binary-Float32 | 32 bits | 32 bits | `00111111100000000000000000000000` |
//!
//! ## Quick Start
//!
//! Any `Serialize` value made of numbers and sequences works directly:
//!
//! ```rust
//! use seqdump::{to_string, to_string_with_options, DumpOptions};
//!
//! let batch: Vec<Vec<f32>> = vec![vec![1.0, 2.0], vec![65536.0]];
//!
//! // Hex-16, one token per line
//! assert_eq!(to_string(&batch).unwrap(), "0x1\n0x2\n0x0\n");
//!
//! // Binary of width 4, one unbroken run
//! let options = DumpOptions::binary(4).concatenated();
//! assert_eq!(to_string_with_options(&[[1, 2], [3, 4]], &options).unwrap(), "0001001000110100");
//! ```
//!
//! ### Writing Files
//!
//! ```rust
//! use seqdump::{write_file, write_log, DumpOptions};
//!
//! let dir = std::env::temp_dir();
//! let output = vec![vec![0.25f32, 0.5], vec![0.75]];
//!
//! let path = dir.join("seqdump-doc-jerry.txt");
//! let written = write_file(path, &output, &DumpOptions::float32()).unwrap();
//! assert_eq!(written, 3);
//!
//! write_log(dir.join("seqdump-doc-log.txt"), &output).unwrap();
//! let log = std::fs::read_to_string(dir.join("seqdump-doc-log.txt")).unwrap();
//! assert_eq!(log, "[0.25, 0.5, 0.75]");
//! ```
//!
//! ## Training Chores
//!
//! - [`save_checkpoint`] places a model implementing [`Checkpoint`] under the
//!   output directory
//! - [`dump_generated`] asks a [`Generator`] for output and dumps it
//! - [`send_report`] composes the training report from a [`ReportConfig`] and
//!   hands it to a [`Transport`]
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Flattening, encoding and dropping a [`Nested`] use explicit stacks, so
//!   [`write_nested`] and [`nested_to_string`] handle any depth memory allows.
//!   The `Serialize` entry points first convert through serde, which recurses
//!   once per nesting level
//! - Errors are returned, not printed; diagnostics go through `tracing`

pub mod checkpoint;
pub mod decode;
pub mod encode;
pub mod error;
pub mod macros;
pub mod manifest;
pub mod options;
pub mod producer;
pub mod report;
pub mod ser;
pub mod value;

pub use checkpoint::{save_checkpoint, Checkpoint};
pub use decode::{decode_float32_bits, decode_token};
pub use encode::{encode_leaf, encode_tokens, Encoder};
pub use error::{Error, Result};
pub use manifest::AttachmentManifest;
pub use options::{DumpOptions, Encoding, Separator};
pub use producer::{dump_generated, Generator};
pub use report::{
    send_report, Attachment, Report, ReportConfig, SmtpSettings, TrainingSettings, Transport,
};
pub use ser::NestedSerializer;
pub use value::{FlatDisplay, Leaves, Nested};

use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// Convert any `T: Serialize` made of numbers and sequences to a [`Nested`].
///
/// # Examples
///
/// ```rust
/// use seqdump::{to_value, Nested};
///
/// let value = to_value(&vec![vec![1u8], vec![]]).unwrap();
/// assert_eq!(value, Nested::Seq(vec![Nested::Seq(vec![Nested::Leaf(1.0)]), Nested::Seq(vec![])]));
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] if the value contains strings, maps,
/// structs with named fields, enums or `None`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Nested>
where
    T: ?Sized + Serialize,
{
    value.serialize(NestedSerializer)
}

/// Flatten a nested structure into its leaves, depth-first and left to right.
///
/// # Examples
///
/// ```rust
/// use seqdump::{flatten, nested};
///
/// assert!(flatten(&nested!([[], [[]]])).is_empty());
/// ```
#[must_use]
pub fn flatten(value: &Nested) -> Vec<f64> {
    value.flatten()
}

/// Encode every leaf of `value` as a Hex-16 token, one per line.
///
/// # Errors
///
/// Returns an error if the value cannot be converted (see [`to_value`]).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &DumpOptions::default())
}

/// Encode every leaf of `value` with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be converted or a leaf cannot be
/// encoded (non-finite values under Binary-N).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &DumpOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    nested_to_string(&to_value(value)?, options)
}

/// Encode an already built [`Nested`] without going through serde.
///
/// # Examples
///
/// ```rust
/// use seqdump::{nested, nested_to_string, DumpOptions};
///
/// let dump = nested_to_string(&nested!([[1, 2], [3]]), &DumpOptions::binary(2)).unwrap();
/// assert_eq!(dump, "01\n10\n11\n");
/// ```
///
/// # Errors
///
/// Returns an error if a leaf cannot be encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn nested_to_string(value: &Nested, options: &DumpOptions) -> Result<String> {
    Ok(encode_all(value, options)?.into_inner())
}

/// Encode `value` into a writer as Hex-16 tokens, one per line.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<usize>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &DumpOptions::default())
}

/// Encode `value` into a writer with custom options.
///
/// Everything is encoded before the first byte is written, so an encoding
/// error leaves the writer untouched. Returns the number of tokens written.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(
    mut writer: W,
    value: &T,
    options: &DumpOptions,
) -> Result<usize>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let encoder = encode_all(&to_value(value)?, options)?;
    let tokens = encoder.token_count();
    writer
        .write_all(encoder.into_inner().as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(tokens)
}

/// Write the encoded tokens of `value` to `path`, replacing the file if it
/// exists. Returns the number of tokens written.
///
/// # Errors
///
/// Returns an error if encoding fails or the file cannot be written. An I/O
/// failure part-way through may leave a truncated file.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_file<P, T>(path: P, value: &T, options: &DumpOptions) -> Result<usize>
where
    P: AsRef<Path>,
    T: ?Sized + Serialize,
{
    write_nested(path, &to_value(value)?, options)
}

/// Write an already built [`Nested`] to `path`, replacing the file if it
/// exists. Returns the number of tokens written.
///
/// # Errors
///
/// Returns an error if a leaf cannot be encoded or the file cannot be written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_nested<P>(path: P, value: &Nested, options: &DumpOptions) -> Result<usize>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let encoder = encode_all(value, options)?;
    let tokens = encoder.token_count();

    fs::write(path, encoder.into_inner())
        .map_err(|e| Error::io(&format!("{}: {}", path.display(), e)))?;

    tracing::debug!(
        path = %path.display(),
        tokens,
        encoding = %options.encoding,
        "wrote sequence dump"
    );
    Ok(tokens)
}

fn encode_all(value: &Nested, options: &DumpOptions) -> Result<Encoder> {
    let mut encoder = Encoder::new(options.clone());
    encoder.encode(value)?;
    Ok(encoder)
}

/// Write the flattened leaves of `value` to `path` as one bracketed list,
/// with no further formatting. The file is replaced if it exists.
///
/// # Errors
///
/// Returns an error if the value cannot be converted or the file cannot be
/// written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_log<P, T>(path: P, value: &T) -> Result<()>
where
    P: AsRef<Path>,
    T: ?Sized + Serialize,
{
    let path = path.as_ref();
    let nested = to_value(value)?;
    fs::write(path, FlatDisplay(&nested).to_string())
        .map_err(|e| Error::io(&format!("{}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), leaves = nested.leaf_count(), "wrote log dump");
    Ok(())
}

/// Decode a dump produced with `options` back into leaf values.
///
/// # Examples
///
/// ```rust
/// use seqdump::{from_str, DumpOptions};
///
/// let values = from_str("0x1\n0xff\n", &DumpOptions::hex16()).unwrap();
/// assert_eq!(values, vec![1.0, 255.0]);
/// ```
///
/// # Errors
///
/// Returns an error for malformed tokens, or for a concatenated dump whose
/// encoding has no fixed width.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str, options: &DumpOptions) -> Result<Vec<f64>> {
    decode::from_str(s, options)
}

/// Decode a dump read from an I/O stream.
///
/// # Errors
///
/// Returns an error if reading fails or the dump is malformed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R, options: &DumpOptions) -> Result<Vec<f64>>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Batch(Vec<Vec<f32>>);

    #[test]
    fn test_spec_examples() {
        assert_eq!(to_string(&[65535.0]).unwrap(), "0xffff\n");
        assert_eq!(to_string(&[65536.0]).unwrap(), "0x0\n");
        assert_eq!(to_string_with_options(&[5], &DumpOptions::binary(8)).unwrap(), "00000101\n");
        assert_eq!(
            to_string_with_options(&[1.0], &DumpOptions::float32()).unwrap(),
            "00111111100000000000000000000000\n"
        );
    }

    #[test]
    fn test_nested_passes_through_to_value() {
        let value = nested!([[1, 2], [], [[3]]]);
        assert_eq!(to_value(&value).unwrap(), value);
    }

    #[test]
    fn test_newtype_batches() {
        let batch = Batch(vec![vec![1.0], vec![2.0, 3.0]]);
        assert_eq!(to_string(&batch).unwrap(), "0x1\n0x2\n0x3\n");
    }

    #[test]
    fn test_to_writer_counts_tokens() {
        let mut buffer = Vec::new();
        let tokens = to_writer(&mut buffer, &vec![vec![10, 11], vec![12]]).unwrap();
        assert_eq!(tokens, 3);
        assert_eq!(String::from_utf8(buffer).unwrap(), "0xa\n0xb\n0xc\n");
    }

    #[test]
    fn test_to_writer_untouched_on_encode_error() {
        let mut buffer = Vec::new();
        let result = to_writer_with_options(&mut buffer, &[1.0, f64::NAN], &DumpOptions::binary(4));
        assert!(result.is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_unsupported_input() {
        assert!(matches!(to_string(&["a", "b"]), Err(Error::UnsupportedType(_))));
    }

    #[test]
    fn test_from_reader() {
        let cursor = std::io::Cursor::new(b"0101\n0011\n".to_vec());
        assert_eq!(from_reader(cursor, &DumpOptions::binary(4)).unwrap(), vec![5.0, 3.0]);
    }
}

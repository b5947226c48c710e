//! Generator seam.
//!
//! The trained generator network is outside this crate. Anything that can
//! answer "give me `count` outputs bounded by `bound`" implements
//! [`Generator`], and [`dump_generated`] turns its answer straight into a
//! sequence file.

use crate::{write_nested, DumpOptions, Nested, Result};
use std::path::Path;

/// Produces nested numeric output on request.
pub trait Generator {
    /// Returns `count` samples whose leaves lie in `[0, bound)` by the
    /// generator's own contract. The shape of the result is up to the
    /// implementation.
    fn generate(&mut self, count: usize, bound: f64) -> Result<Nested>;
}

impl<F> Generator for F
where
    F: FnMut(usize, f64) -> Result<Nested>,
{
    fn generate(&mut self, count: usize, bound: f64) -> Result<Nested> {
        self(count, bound)
    }
}

/// Asks `generator` for output and writes it to `path` with `options`.
///
/// Returns the number of tokens written. Generation and encoding both finish
/// before the file is touched, so a failing generator leaves any existing
/// file unchanged.
///
/// # Examples
///
/// ```rust
/// use seqdump::{dump_generated, DumpOptions, Nested, Result};
///
/// let mut ramp = |count: usize, bound: f64| -> Result<Nested> {
///     Ok((0..count).map(|i| vec![i as f64 % bound]).collect())
/// };
///
/// let path = std::env::temp_dir().join("seqdump-doc-ramp.txt");
/// let written = dump_generated(&mut ramp, 4, 3.0, &path, &DumpOptions::hex16()).unwrap();
/// assert_eq!(written, 4);
/// assert_eq!(std::fs::read_to_string(&path).unwrap(), "0x0\n0x1\n0x2\n0x0\n");
/// ```
pub fn dump_generated<G>(
    generator: &mut G,
    count: usize,
    bound: f64,
    path: impl AsRef<Path>,
    options: &DumpOptions,
) -> Result<usize>
where
    G: Generator + ?Sized,
{
    let output = generator.generate(count, bound)?;
    tracing::debug!(count, bound, leaves = output.leaf_count(), "generated output");
    write_nested(path, &output, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct Constant(f64);

    impl Generator for Constant {
        fn generate(&mut self, count: usize, _bound: f64) -> Result<Nested> {
            Ok(Nested::from(vec![vec![self.0; count]]))
        }
    }

    #[test]
    fn test_dump_generated_writes_every_leaf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jerry.txt");

        let written =
            dump_generated(&mut Constant(1.0), 3, 2.0, &path, &DumpOptions::float32()).unwrap();
        assert_eq!(written, 3);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().all(|l| l == "00111111100000000000000000000000"));
    }

    #[test]
    fn test_failing_generator_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("janice.txt");
        std::fs::write(&path, "previous").unwrap();

        let mut broken = |_: usize, _: f64| -> Result<Nested> { Err(Error::custom("no model")) };
        assert!(dump_generated(&mut broken, 3, 2.0, &path, &DumpOptions::hex16()).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn test_deep_generator_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.txt");

        let mut deep = |_: usize, bound: f64| -> Result<Nested> {
            let mut value = Nested::Leaf(bound - 1.0);
            for _ in 0..50_000 {
                value = Nested::Seq(vec![value]);
            }
            Ok(value)
        };
        let written = dump_generated(&mut deep, 1, 256.0, &path, &DumpOptions::hex16()).unwrap();
        assert_eq!(written, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0xff\n");
    }

    #[test]
    fn test_dyn_generator() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator: Box<dyn Generator> = Box::new(Constant(7.0));
        let written = dump_generated(
            generator.as_mut(),
            2,
            8.0,
            dir.path().join("out.txt"),
            &DumpOptions::binary(3),
        )
        .unwrap();
        assert_eq!(written, 2);
    }
}

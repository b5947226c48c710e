//! Model checkpoint placement.
//!
//! Serializing model parameters belongs to whatever framework trained the
//! model; this crate only decides where the file goes. Implement
//! [`Checkpoint`] for a model handle and call [`save_checkpoint`] to write it
//! under `<output_directory>/saved_models/`, where the default report
//! manifest expects to find it.
//!
//! ## Examples
//!
//! ```rust
//! use seqdump::{save_checkpoint, Checkpoint, Result};
//! use std::path::Path;
//!
//! struct Weights(Vec<f32>);
//!
//! impl Checkpoint for Weights {
//!     fn save(&self, path: &Path) -> Result<()> {
//!         let bytes: Vec<u8> = self.0.iter().flat_map(|w| w.to_le_bytes()).collect();
//!         std::fs::write(path, bytes).map_err(|e| seqdump::Error::io(&e.to_string()))
//!     }
//! }
//!
//! let out = std::env::temp_dir().join("seqdump-doc-checkpoint");
//! let path = save_checkpoint(&Weights(vec![0.5; 4]), &out, "jerry.h5").unwrap();
//! assert!(path.ends_with("saved_models/jerry.h5"));
//! ```

use crate::manifest::SAVED_MODELS_DIR;
use crate::{Error, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Something that can persist its parameters to a file.
pub trait Checkpoint {
    /// Writes the model state to `path`, replacing any existing file.
    fn save(&self, path: &Path) -> Result<()>;
}

impl<C: Checkpoint + ?Sized> Checkpoint for &C {
    fn save(&self, path: &Path) -> Result<()> {
        (**self).save(path)
    }
}

impl<C: Checkpoint + ?Sized> Checkpoint for Box<C> {
    fn save(&self, path: &Path) -> Result<()> {
        (**self).save(path)
    }
}

/// Saves `model` as `<output_directory>/saved_models/<file_name>` and returns
/// the path written.
///
/// `file_name` must be a single plain file name, so the checkpoint always
/// lands directly inside `saved_models/`.
///
/// # Errors
///
/// Returns [`Error::Checkpoint`] for a `file_name` that is empty, absolute,
/// or contains separators or `.`/`..`. Returns [`Error::Io`] if the directory
/// cannot be created, and [`Error::Checkpoint`] wrapping whatever the model's
/// own `save` reported.
pub fn save_checkpoint<C>(model: &C, output_directory: &Path, file_name: &str) -> Result<PathBuf>
where
    C: Checkpoint + ?Sized,
{
    let mut components = Path::new(file_name).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        return Err(Error::checkpoint(format!(
            "invalid checkpoint file name {:?}",
            file_name
        )));
    }

    let directory = output_directory.join(SAVED_MODELS_DIR);
    fs::create_dir_all(&directory)
        .map_err(|e| Error::io(&format!("{}: {}", directory.display(), e)))?;

    let path = directory.join(file_name);
    model.save(&path).map_err(|e| match e {
        Error::Checkpoint(_) => e,
        other => Error::checkpoint(format!("{}: {}", path.display(), other)),
    })?;

    tracing::debug!(path = %path.display(), "saved checkpoint");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recording {
        saved: RefCell<Vec<PathBuf>>,
    }

    impl Checkpoint for Recording {
        fn save(&self, path: &Path) -> Result<()> {
            fs::write(path, b"weights").map_err(|e| Error::io(&e.to_string()))?;
            self.saved.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    struct Failing;

    impl Checkpoint for Failing {
        fn save(&self, _path: &Path) -> Result<()> {
            Err(Error::custom("tensor backend unavailable"))
        }
    }

    #[test]
    fn test_save_checkpoint_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let model = Recording {
            saved: RefCell::new(Vec::new()),
        };

        let path = save_checkpoint(&model, dir.path(), "diego.h5").unwrap();
        assert_eq!(path, dir.path().join(SAVED_MODELS_DIR).join("diego.h5"));
        assert_eq!(fs::read(&path).unwrap(), b"weights");
        assert_eq!(model.saved.borrow().as_slice(), &[path]);
    }

    #[test]
    fn test_save_checkpoint_wraps_model_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_checkpoint(&Failing, dir.path(), "priya.h5").unwrap_err();
        match err {
            Error::Checkpoint(msg) => assert!(msg.contains("tensor backend unavailable")),
            other => panic!("Expected checkpoint error, got {other:?}"),
        }
    }

    #[test]
    fn test_save_checkpoint_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        assert!(save_checkpoint(&Failing, dir.path(), "").is_err());
        assert!(save_checkpoint(&Failing, dir.path(), "..").is_err());
        assert!(save_checkpoint(&Failing, dir.path(), ".").is_err());
    }

    #[test]
    fn test_save_checkpoint_rejects_absolute_name() {
        let out = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let target = elsewhere.path().join("escaped.h5");
        let model = Recording {
            saved: RefCell::new(Vec::new()),
        };

        let err = save_checkpoint(&model, out.path(), &target.to_string_lossy()).unwrap_err();
        assert!(matches!(err, Error::Checkpoint(_)));
        assert!(!target.exists());
        assert!(model.saved.borrow().is_empty());
    }

    #[test]
    fn test_save_checkpoint_rejects_nested_name() {
        let dir = tempfile::tempdir().unwrap();
        let model = Recording {
            saved: RefCell::new(Vec::new()),
        };

        for name in ["a/b.h5", "../jerry.h5", "./jerry.h5"] {
            assert!(
                matches!(save_checkpoint(&model, dir.path(), name), Err(Error::Checkpoint(_))),
                "{name} was accepted"
            );
        }
        assert!(model.saved.borrow().is_empty());
        assert!(!dir.path().join(SAVED_MODELS_DIR).join("a").exists());
    }

    #[test]
    fn test_boxed_dyn_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let model: Box<dyn Checkpoint> = Box::new(Recording {
            saved: RefCell::new(Vec::new()),
        });
        assert!(save_checkpoint(&model, dir.path(), "janice.h5").is_ok());
    }
}

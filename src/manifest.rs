//! Ordered attachment manifest for training reports.
//!
//! [`AttachmentManifest`] maps attachment file names to the directory they
//! live in. It wraps an [`IndexMap`] so attachments are read and attached in
//! the order they were listed, and listing the same file twice keeps a single
//! entry.
//!
//! Relative directories are resolved against the report's output directory;
//! absolute directories are used as-is.
//!
//! ## Examples
//!
//! ```rust
//! use seqdump::AttachmentManifest;
//! use std::path::Path;
//!
//! let mut manifest = AttachmentManifest::new();
//! manifest.insert("jerry.txt", "sequences");
//! manifest.insert("jerry.h5", "saved_models");
//!
//! let names: Vec<_> = manifest.names().collect();
//! assert_eq!(names, vec!["jerry.txt", "jerry.h5"]);
//! assert_eq!(
//!     manifest.resolve(Path::new("output")).next().unwrap().1,
//!     Path::new("output/sequences/jerry.txt")
//! );
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory, relative to the output directory, holding saved models.
pub const SAVED_MODELS_DIR: &str = "saved_models";
/// Directory holding rendered model graphs.
pub const MODEL_GRAPHS_DIR: &str = "model_graphs";
/// Directory holding loss and distribution plots.
pub const PLOTS_DIR: &str = "plots";
/// Directory holding generated output sequences.
pub const SEQUENCES_DIR: &str = "sequences";

/// An ordered map of attachment file names to their directories.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentManifest(IndexMap<String, PathBuf>);

impl AttachmentManifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        AttachmentManifest(IndexMap::new())
    }

    /// The attachments of the adversarial training experiment: both networks
    /// of each GAN as saved models and graphs, the loss and output
    /// distribution plots, and the generated sequences.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seqdump::AttachmentManifest;
    ///
    /// let manifest = AttachmentManifest::training_default();
    /// assert_eq!(manifest.len(), 20);
    /// assert_eq!(manifest.names().last(), Some("jerry.txt"));
    /// ```
    #[must_use]
    pub fn training_default() -> Self {
        let mut manifest = AttachmentManifest::new();
        for model in ["jerry", "diego", "discgan", "janice", "priya", "predgan"] {
            manifest.insert(format!("{model}.h5"), SAVED_MODELS_DIR);
        }
        for graph in [
            "jerry",
            "diego",
            "discriminative_gan",
            "janice",
            "priya",
            "predictive_gan",
        ] {
            manifest.insert(format!("{graph}.png"), MODEL_GRAPHS_DIR);
        }
        for plot in [
            "diego_pretrain_loss",
            "discgan_train_loss",
            "priya_pretrain_loss",
            "predgan_train_loss",
            "discgan_jerry_output_distribution",
            "predgan_janice_output_distribution",
        ] {
            manifest.insert(format!("{plot}.pdf"), PLOTS_DIR);
        }
        for sequence in ["janice", "jerry"] {
            manifest.insert(format!("{sequence}.txt"), SEQUENCES_DIR);
        }
        manifest
    }

    /// Adds an attachment. Returns the previous directory if the file name was
    /// already listed; its position in the manifest is kept.
    pub fn insert(
        &mut self,
        file_name: impl Into<String>,
        directory: impl Into<PathBuf>,
    ) -> Option<PathBuf> {
        self.0.insert(file_name.into(), directory.into())
    }

    /// Removes an attachment, keeping the order of the remaining entries.
    pub fn remove(&mut self, file_name: &str) -> Option<PathBuf> {
        self.0.shift_remove(file_name)
    }

    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<&Path> {
        self.0.get(file_name).map(PathBuf::as_path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the file names, in manifest order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns an iterator over `(file name, directory)` pairs, in manifest order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, PathBuf> {
        self.0.iter()
    }

    /// Resolves every entry to a full path under `output_directory`.
    pub fn resolve<'a>(
        &'a self,
        output_directory: &'a Path,
    ) -> impl Iterator<Item = (&'a str, PathBuf)> + 'a {
        self.0.iter().map(move |(name, directory)| {
            let base = if directory.is_absolute() {
                directory.clone()
            } else {
                output_directory.join(directory)
            };
            (name.as_str(), base.join(name))
        })
    }
}

impl IntoIterator for AttachmentManifest {
    type Item = (String, PathBuf);
    type IntoIter = indexmap::map::IntoIter<String, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<N: Into<String>, D: Into<PathBuf>> FromIterator<(N, D)> for AttachmentManifest {
    fn from_iter<T: IntoIterator<Item = (N, D)>>(iter: T) -> Self {
        AttachmentManifest(
            iter.into_iter()
                .map(|(name, directory)| (name.into(), directory.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut manifest = AttachmentManifest::new();
        manifest.insert("a.txt", "one");
        manifest.insert("b.txt", "two");
        assert_eq!(manifest.insert("a.txt", "three"), Some(PathBuf::from("one")));

        let names: Vec<_> = manifest.names().collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(manifest.get("a.txt"), Some(Path::new("three")));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut manifest: AttachmentManifest =
            [("a", "d"), ("b", "d"), ("c", "d")].into_iter().collect();
        manifest.remove("b");
        assert_eq!(manifest.names().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_resolve_absolute_directory() {
        let mut manifest = AttachmentManifest::new();
        let absolute = std::env::temp_dir();
        manifest.insert("x.bin", absolute.clone());
        let (_, path) = manifest.resolve(Path::new("ignored")).next().unwrap();
        assert_eq!(path, absolute.join("x.bin"));
    }

    #[test]
    fn test_training_default_groups() {
        let manifest = AttachmentManifest::training_default();
        assert_eq!(manifest.get("priya.h5"), Some(Path::new(SAVED_MODELS_DIR)));
        assert_eq!(manifest.get("predictive_gan.png"), Some(Path::new(MODEL_GRAPHS_DIR)));
        assert_eq!(manifest.get("discgan_train_loss.pdf"), Some(Path::new(PLOTS_DIR)));
        assert_eq!(manifest.get("janice.txt"), Some(Path::new(SEQUENCES_DIR)));
        assert_eq!(manifest.names().next(), Some("jerry.h5"));
    }

    #[test]
    fn test_serde_transparent() {
        let manifest: AttachmentManifest = [("a.txt", "plots")].into_iter().collect();
        let json = serde_json::to_string(&manifest).unwrap();
        assert_eq!(json, r#"{"a.txt":"plots"}"#);
        let back: AttachmentManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }
}

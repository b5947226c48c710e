//! End-of-training report.
//!
//! After a training run the experiment mails its artefacts (saved models,
//! model graphs, plots and output sequences) together with the run settings.
//! This module composes that report from an explicit [`ReportConfig`] and
//! hands it to a [`Transport`]; talking SMTP is the transport's job.
//!
//! ## Missing attachments
//!
//! A missing or unreadable attachment never fails the report. Each one is
//! listed in the body as `File not found: <name>` and in [`Report::missing`],
//! and a single warning summarising them is logged.
//!
//! ## Examples
//!
//! ```rust
//! use seqdump::{AttachmentManifest, Report, ReportConfig, TrainingSettings};
//!
//! let mut manifest = AttachmentManifest::new();
//! manifest.insert("jerry.txt", "sequences");
//!
//! let config = ReportConfig::new("lab@example.org", "me@example.org")
//!     .with_output_directory("/nonexistent/output")
//!     .with_manifest(manifest);
//! let settings = TrainingSettings::new(32, 100, 5, 2);
//!
//! let report = Report::compose(&config, &settings).unwrap();
//! assert!(report.attachments.is_empty());
//! assert_eq!(report.missing, vec!["jerry.txt"]);
//! assert!(report.body.contains("Dataset size: 3200"));
//! assert!(report.body.ends_with("File not found: jerry.txt\n"));
//! ```

use crate::{AttachmentManifest, Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Subject used when none is configured.
pub const DEFAULT_SUBJECT: &str = "Adversarial CSPRNG Training Results";

/// Mail submission settings. The password is never part of the
/// configuration; transports receive it separately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Login name, defaults to the sender address when absent
    #[serde(default)]
    pub username: Option<String>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        SmtpSettings {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: None,
        }
    }
}

/// Everything needed to compose and address a training report.
///
/// # Examples
///
/// ```rust
/// use seqdump::ReportConfig;
///
/// let config = ReportConfig::new("lab@example.org", "me@example.org")
///     .with_subject("Run 7")
///     .with_smtp("localhost", 2525);
/// assert_eq!(config.subject, "Run 7");
/// assert_eq!(config.login(), "lab@example.org");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub sender: String,
    pub recipient: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "AttachmentManifest::training_default")]
    pub attachment_manifest: AttachmentManifest,
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
    #[serde(default)]
    pub smtp: SmtpSettings,
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("output")
}

impl ReportConfig {
    /// Creates a configuration with the default subject, the experiment's
    /// default manifest and `output` as the output directory.
    #[must_use]
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>) -> Self {
        ReportConfig {
            sender: sender.into(),
            recipient: recipient.into(),
            subject: default_subject(),
            attachment_manifest: AttachmentManifest::training_default(),
            output_directory: default_output_directory(),
            smtp: SmtpSettings::default(),
        }
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    #[must_use]
    pub fn with_manifest(mut self, manifest: AttachmentManifest) -> Self {
        self.attachment_manifest = manifest;
        self
    }

    #[must_use]
    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output_directory = directory.into();
        self
    }

    #[must_use]
    pub fn with_smtp(mut self, host: impl Into<String>, port: u16) -> Self {
        self.smtp.host = host.into();
        self.smtp.port = port;
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.smtp.username = Some(username.into());
        self
    }

    /// The login name for mail submission.
    #[must_use]
    pub fn login(&self) -> &str {
        self.smtp.username.as_deref().unwrap_or(&self.sender)
    }

    /// Rejects configurations that cannot address a message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] for an empty or `@`-less sender or
    /// recipient, or an empty SMTP host.
    pub fn validate(&self) -> Result<()> {
        for (field, address) in [("sender", &self.sender), ("recipient", &self.recipient)] {
            let address = address.trim();
            if address.is_empty() {
                return Err(Error::invalid_options(&format!("{} address is empty", field)));
            }
            if !address.contains('@') {
                return Err(Error::invalid_options(&format!(
                    "{} address {:?} has no domain",
                    field, address
                )));
            }
        }
        if self.smtp.host.trim().is_empty() {
            return Err(Error::invalid_options("smtp host is empty"));
        }
        Ok(())
    }
}

/// The run settings quoted in the report body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSettings {
    pub batch_size: usize,
    pub batches: usize,
    pub epochs: usize,
    pub pretrain_epochs: usize,
}

impl TrainingSettings {
    #[must_use]
    pub fn new(batch_size: usize, batches: usize, epochs: usize, pretrain_epochs: usize) -> Self {
        TrainingSettings {
            batch_size,
            batches,
            epochs,
            pretrain_epochs,
        }
    }

    /// Number of samples seen per epoch.
    #[must_use]
    pub fn dataset_size(&self) -> usize {
        self.batch_size.saturating_mul(self.batches)
    }
}

/// A file attached to the report.
#[derive(Clone, Debug, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub path: PathBuf,
    pub content: Vec<u8>,
}

/// A composed report, ready for a [`Transport`].
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<Attachment>,
    /// File names from the manifest that could not be read
    pub missing: Vec<String>,
    pub composed_at: DateTime<Utc>,
}

impl Report {
    /// Composes the report: body text from `settings`, attachments read from
    /// the manifest in order.
    ///
    /// # Errors
    ///
    /// Only an invalid configuration fails; unreadable attachments are
    /// recorded, not raised.
    pub fn compose(config: &ReportConfig, settings: &TrainingSettings) -> Result<Report> {
        config.validate()?;

        let mut body = settings_body(settings);
        let mut attachments = Vec::with_capacity(config.attachment_manifest.len());
        let mut missing = Vec::new();

        for (name, path) in config.attachment_manifest.resolve(&config.output_directory) {
            match read_attachment(&path) {
                Ok(content) => attachments.push(Attachment {
                    file_name: name.to_string(),
                    path,
                    content,
                }),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "attachment unavailable");
                    body.push_str(&format!("File not found: {}\n", name));
                    missing.push(name.to_string());
                }
            }
        }

        if !missing.is_empty() {
            tracing::warn!(
                missing = missing.len(),
                total = config.attachment_manifest.len(),
                files = %missing.join(", "),
                "report composed with missing attachments"
            );
        }

        Ok(Report {
            sender: config.sender.clone(),
            recipient: config.recipient.clone(),
            subject: config.subject.clone(),
            body,
            attachments,
            missing,
            composed_at: Utc::now(),
        })
    }

    /// `Date` header value (RFC 2822) for the composed message.
    #[must_use]
    pub fn date_header(&self) -> String {
        self.composed_at.to_rfc2822()
    }

    /// Total size of all attachment payloads in bytes.
    #[must_use]
    pub fn attachment_bytes(&self) -> usize {
        self.attachments.iter().map(|a| a.content.len()).sum()
    }
}

fn settings_body(settings: &TrainingSettings) -> String {
    format!(
        "Training complete. See attached files for model graphs, model state snapshots, \
         and output sequences for evaluation.\n\n\
         SETTINGS:\n\
         Batch size: {}\n\
         Dataset size: {}\n\
         Training epochs: {}\n\
         Pretraining epochs: {}\n\n\n",
        settings.batch_size,
        settings.dataset_size(),
        settings.epochs,
        settings.pretrain_epochs
    )
}

fn read_attachment(path: &Path) -> std::io::Result<Vec<u8>> {
    fs::read(path)
}

/// Delivers a composed report, typically over authenticated SMTP submission.
pub trait Transport {
    fn send(&mut self, config: &ReportConfig, report: &Report) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, config: &ReportConfig, report: &Report) -> Result<()> {
        (**self).send(config, report)
    }
}

/// Composes the report and sends it through `transport`.
///
/// Returns the report that was sent.
///
/// # Errors
///
/// Returns [`Error::InvalidOptions`] for a bad configuration and
/// [`Error::Transport`] if delivery fails.
pub fn send_report<T>(
    config: &ReportConfig,
    settings: &TrainingSettings,
    transport: &mut T,
) -> Result<Report>
where
    T: Transport + ?Sized,
{
    let report = Report::compose(config, settings)?;
    transport.send(config, &report).map_err(|e| match e {
        Error::Transport(_) => e,
        other => Error::transport(other),
    })?;

    tracing::info!(
        recipient = %report.recipient,
        host = %config.smtp.host,
        attachments = report.attachments.len(),
        bytes = report.attachment_bytes(),
        "training report sent"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ReportConfig {
        ReportConfig::new("lab@example.org", "me@example.org")
    }

    #[test]
    fn test_settings_body() {
        let body = settings_body(&TrainingSettings::new(8, 4, 10, 3));
        assert!(body.starts_with("Training complete."));
        assert!(body.contains("SETTINGS:\nBatch size: 8\nDataset size: 32\n"));
        assert!(body.contains("Training epochs: 10\nPretraining epochs: 3\n\n\n"));
    }

    #[test]
    fn test_validate() {
        assert!(config().validate().is_ok());
        assert!(ReportConfig::new("", "me@example.org").validate().is_err());
        assert!(ReportConfig::new("lab@example.org", "nobody").validate().is_err());
        assert!(config().with_smtp(" ", 25).validate().is_err());
    }

    #[test]
    fn test_login_prefers_username() {
        assert_eq!(config().login(), "lab@example.org");
        assert_eq!(config().with_username("svc").login(), "svc");
    }

    #[test]
    fn test_dataset_size_saturates() {
        assert_eq!(TrainingSettings::new(usize::MAX, 2, 1, 1).dataset_size(), usize::MAX);
    }

    #[test]
    fn test_config_defaults_from_json() {
        let json = r#"{"sender": "lab@example.org", "recipient": "me@example.org"}"#;
        let config: ReportConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.subject, DEFAULT_SUBJECT);
        assert_eq!(config.attachment_manifest.len(), 20);
        assert_eq!(config.output_directory, PathBuf::from("output"));
        assert_eq!(config.smtp.port, 587);
    }
}

//! Failures while writing or reading back run outputs.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("output file error: {0}")]
    File(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Every output file is prefixed with the run name.
    #[error("run name must not be empty")]
    EmptyRunName,

    /// A name in `output.record_params` that the configuration does not have.
    #[error("unknown parameter `{0}` in output.record_params")]
    UnknownParameter(String),

    #[error("parameter file {} is empty", .0.display())]
    EmptyParameterFile(PathBuf),

    /// The stored configuration no longer hashes to the stored fingerprint.
    #[error("fingerprint mismatch in {}: stored {stored}, computed {computed}", .path.display())]
    FingerprintMismatch {
        path: PathBuf,
        stored: String,
        computed: String,
    },

    #[error("{}: {source}", .path.display())]
    AtPath {
        path: PathBuf,
        source: Box<IoError>,
    },

    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    /// Ties the error to the file it happened on.
    #[must_use]
    pub fn at<P: Into<PathBuf>>(self, path: P) -> Self {
        Self::AtPath {
            path: path.into(),
            source: Box::new(self),
        }
    }

    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_parameter_names_the_key() {
        let err = IoError::UnknownParameter("colony.queen_count".into());
        assert_eq!(
            err.to_string(),
            "unknown parameter `colony.queen_count` in output.record_params"
        );
    }

    #[test]
    fn test_file_errors_carry_the_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = IoError::from(io_err).at("out/seed_3_evolution.csv");
        let msg = err.to_string();
        assert!(msg.starts_with("out/seed_3_evolution.csv: "));
        assert!(msg.contains("denied"));
        assert!(matches!(err, IoError::AtPath { ref source, .. } if matches!(**source, IoError::File(_))));
    }

    #[test]
    fn test_run_context_wraps_the_cause() {
        let err = IoError::EmptyRunName.with_context("opening tables for run seed_1");
        assert_eq!(
            err.to_string(),
            "opening tables for run seed_1: run name must not be empty"
        );
    }

    #[test]
    fn test_fingerprint_mismatch_message() {
        let err = IoError::FingerprintMismatch {
            path: PathBuf::from("seed_2_params.json"),
            stored: "ab12".into(),
            computed: "cd34".into(),
        };
        assert_eq!(
            err.to_string(),
            "fingerprint mismatch in seed_2_params.json: stored ab12, computed cd34"
        );
    }
}

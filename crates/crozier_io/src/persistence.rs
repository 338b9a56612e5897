//! Parameter exports: the full configuration of a run, its fingerprint and
//! the seed actually used, so any table can be traced back to its inputs.

use crate::error::{IoError, Result};
use chrono::Utc;
use crozier_core::config::AppConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParameterExport {
    pub config: AppConfig,
    pub fingerprint: String,
    pub seed: u64,
    /// RFC 3339 wall-clock creation time.
    pub created_at: String,
}

impl ParameterExport {
    pub fn new(config: &AppConfig, seed: u64) -> Self {
        Self {
            config: config.clone(),
            fingerprint: config.fingerprint(),
            seed,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Writes `<run>_params.json` into `dir` and returns its path.
pub fn export_parameters<P: AsRef<Path>>(
    dir: P,
    run_name: &str,
    config: &AppConfig,
    seed: u64,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{run_name}_params.json"));
    let json = serde_json::to_string_pretty(&ParameterExport::new(config, seed))?;
    std::fs::write(&path, json).map_err(|e| IoError::from(e).at(&path))?;
    Ok(path)
}

pub fn read_parameters<P: AsRef<Path>>(path: P) -> Result<ParameterExport> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| IoError::from(e).at(path))?;
    if json.trim().is_empty() {
        return Err(IoError::EmptyParameterFile(path.to_path_buf()));
    }
    let export: ParameterExport =
        serde_json::from_str(&json).map_err(|e| IoError::from(e).at(path))?;
    let computed = export.config.fingerprint();
    if export.fingerprint != computed {
        return Err(IoError::FingerprintMismatch {
            path: path.to_path_buf(),
            stored: export.fingerprint,
            computed,
        });
    }
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crozier_core::config::RecognitionModel;

    #[test]
    fn test_export_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.recognition.model = RecognitionModel::UndesirableAbsent;

        let path = export_parameters(dir.path(), "seed_9", &config, 9).unwrap();
        assert!(path.ends_with("seed_9_params.json"));

        let export = read_parameters(&path).unwrap();
        assert_eq!(export.seed, 9);
        assert_eq!(export.config, config);
        assert_eq!(export.fingerprint, config.fingerprint());
    }

    #[test]
    fn test_tampered_export_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_parameters(dir.path(), "run", &AppConfig::default(), 1).unwrap();
        let mut export = read_parameters(&path).unwrap();
        export.config.colony.worker_count += 1;
        std::fs::write(&path, serde_json::to_string(&export).unwrap()).unwrap();
        assert!(matches!(
            read_parameters(&path),
            Err(IoError::FingerprintMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_parameters(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, IoError::AtPath { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_empty_parameter_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank_params.json");
        std::fs::write(&path, "  \n").unwrap();
        assert!(matches!(
            read_parameters(&path),
            Err(IoError::EmptyParameterFile(_))
        ));
    }
}

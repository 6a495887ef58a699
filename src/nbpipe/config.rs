use crate::error::{NbError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "nbpipe.json";

pub const NOTEBOOK_DIR: &str = "jwst_validation_notebooks";
pub const ARCHIVE_DIR: &str = "html_archive";
pub const CENTRAL_BASE: &str = "/grp/jwst/wit/jwst_validation_notebooks";
pub const INDEX_FILE: &str = "index.html";
pub const REPORT_FILE: &str = "junit_report.xml";
pub const EXCLUDE_FILE: &str = "exclude_notebooks";
pub const NOTEBOOK_TEMPLATE: &str = "nb_html.tpl";
pub const INDEX_TEMPLATE: &str = "index.tpl";
pub const DEFAULT_TIMEOUT_SECS: u64 = 36_000;
pub const DEFAULT_JUPYTER: &str = "jupyter";

/// Optional per-project configuration, read from `nbpipe.json` in the working directory.
///
/// Every field falls back to the built-in default, so a file only needs the keys it
/// overrides. Command-line arguments always win over these values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Notebook tree scanned by `clean` and `archive`
    #[serde(default = "default_notebook_dir")]
    pub notebook_dir: PathBuf,

    /// Notebook tree executed by `convert`
    #[serde(default = "default_notebook_path")]
    pub notebook_path: PathBuf,

    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,

    /// Base of the central store; each run writes into a dated subdirectory
    #[serde(default = "default_central_base")]
    pub central_base: PathBuf,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_jupyter")]
    pub jupyter: String,
}

fn default_notebook_dir() -> PathBuf {
    PathBuf::from(NOTEBOOK_DIR)
}

fn default_notebook_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from(ARCHIVE_DIR)
}

fn default_central_base() -> PathBuf {
    PathBuf::from(CENTRAL_BASE)
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_jupyter() -> String {
    DEFAULT_JUPYTER.to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            notebook_dir: default_notebook_dir(),
            notebook_path: default_notebook_path(),
            archive_dir: default_archive_dir(),
            central_base: default_central_base(),
            timeout_secs: default_timeout(),
            jupyter: default_jupyter(),
        }
    }
}

impl PipelineConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let config_path = dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(&config_path).map_err(|e| NbError::at(&config_path, e))?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        if config.timeout_secs == 0 {
            return Err(NbError::Config(format!(
                "{}: timeout_secs must be greater than zero",
                config_path.display()
            )));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::load(dir.path()).unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.timeout_secs, 36_000);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{ "central_base": "/data/store", "timeout_secs": 600 }"#,
        )
        .unwrap();

        let config = PipelineConfig::load(dir.path()).unwrap();
        assert_eq!(config.central_base, PathBuf::from("/data/store"));
        assert_eq!(config.timeout_secs, 600);
        assert_eq!(config.notebook_dir, PathBuf::from(NOTEBOOK_DIR));
        assert_eq!(config.jupyter, "jupyter");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();

        let err = PipelineConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, NbError::Serialization(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{ "timeout_secs": 0 }"#).unwrap();

        let err = PipelineConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, NbError::Config(_)));
    }
}

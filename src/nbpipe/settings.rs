//! # Settings Resolution
//!
//! Every command runs against an explicit settings struct, resolved exactly once before any
//! filesystem work starts. Each value is taken from the first layer that provides it:
//!
//! 1. an explicit command-line argument,
//! 2. a conventional file in the working directory (`nbpipe.json`, `nb_html.tpl`,
//!    `index.tpl`, `exclude_notebooks`),
//! 3. the hard default.
//!
//! Relative paths are anchored to the working directory here, so commands never consult
//! the process's current directory themselves.

use crate::bundle::BundleFormat;
use crate::config::{self, PipelineConfig};
use crate::error::{NbError, Result};
use crate::patterns::PatternList;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn existing_file(work_dir: &Path, name: &str) -> Option<PathBuf> {
    let path = work_dir.join(name);
    path.is_file().then_some(path)
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanSettings {
    pub work_dir: PathBuf,
    pub notebook_dir: PathBuf,
    pub index_file: PathBuf,
    pub report_file: PathBuf,
}

impl CleanSettings {
    pub fn resolve(work_dir: &Path, config: &PipelineConfig, input: Option<PathBuf>) -> Self {
        let notebook_dir = input.unwrap_or_else(|| config.notebook_dir.clone());
        Self {
            work_dir: work_dir.to_path_buf(),
            notebook_dir: work_dir.join(notebook_dir),
            index_file: work_dir.join(config::INDEX_FILE),
            report_file: work_dir.join(config::REPORT_FILE),
        }
    }
}

/// Command-line values for `convert`; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConvertOverrides {
    pub notebook_path: Option<PathBuf>,
    pub template_file: Option<PathBuf>,
    pub index_template: Option<PathBuf>,
    pub exclude: Option<String>,
    pub include: Option<String>,
    pub report_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub jupyter: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertSettings {
    pub work_dir: PathBuf,
    pub notebook_path: PathBuf,
    /// Root the archive publishes from; index links are relative to it
    pub link_root: PathBuf,
    pub template_file: Option<PathBuf>,
    pub index_template: Option<PathBuf>,
    pub index_file: PathBuf,
    pub exclude: PatternList,
    pub include: Option<PatternList>,
    pub report_file: PathBuf,
    pub timeout: Duration,
    pub jupyter: String,
}

impl ConvertSettings {
    pub fn resolve(
        work_dir: &Path,
        config: &PipelineConfig,
        overrides: ConvertOverrides,
    ) -> Result<Self> {
        let notebook_path = overrides
            .notebook_path
            .unwrap_or_else(|| config.notebook_path.clone());

        let template_file = overrides
            .template_file
            .map(|p| work_dir.join(p))
            .or_else(|| existing_file(work_dir, config::NOTEBOOK_TEMPLATE));

        let index_template = overrides
            .index_template
            .map(|p| work_dir.join(p))
            .or_else(|| existing_file(work_dir, config::INDEX_TEMPLATE));

        // A command-line list replaces the file outright, it is never merged
        let exclude = match overrides.exclude.as_deref() {
            Some(arg) => PatternList::from_arg(arg)?,
            None => PatternList::from_file(&work_dir.join(config::EXCLUDE_FILE))?
                .unwrap_or_else(PatternList::empty),
        };

        let include = overrides
            .include
            .as_deref()
            .map(PatternList::from_arg)
            .transpose()?;

        let report_file = overrides
            .report_file
            .unwrap_or_else(|| PathBuf::from(config::REPORT_FILE));

        let timeout_secs = overrides.timeout_secs.unwrap_or(config.timeout_secs);
        if timeout_secs == 0 {
            return Err(NbError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            work_dir: work_dir.to_path_buf(),
            notebook_path: work_dir.join(notebook_path),
            link_root: work_dir.join(&config.notebook_dir),
            template_file,
            index_template,
            index_file: work_dir.join(config::INDEX_FILE),
            exclude,
            include,
            report_file: work_dir.join(report_file),
            timeout: Duration::from_secs(timeout_secs),
            jupyter: overrides.jupyter.unwrap_or_else(|| config.jupyter.clone()),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArchiveOverrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub archive_dir: Option<PathBuf>,
    pub bundle: Option<BundleFormat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveSettings {
    pub work_dir: PathBuf,
    pub notebook_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub central_dir: PathBuf,
    pub index_file: PathBuf,
    pub bundle: Option<BundleFormat>,
    pub date: NaiveDate,
}

impl ArchiveSettings {
    /// `date` names both the central-store subdirectory and the bundle.
    pub fn resolve(
        work_dir: &Path,
        config: &PipelineConfig,
        overrides: ArchiveOverrides,
        date: NaiveDate,
    ) -> Self {
        let notebook_dir = overrides
            .input
            .unwrap_or_else(|| config.notebook_dir.clone());
        let archive_dir = overrides
            .archive_dir
            .unwrap_or_else(|| config.archive_dir.clone());
        let central_dir = overrides
            .output
            .unwrap_or_else(|| config.central_base.join(date_dir(date)));

        Self {
            work_dir: work_dir.to_path_buf(),
            notebook_dir: work_dir.join(notebook_dir),
            archive_dir: work_dir.join(archive_dir),
            central_dir: work_dir.join(central_dir),
            index_file: work_dir.join(config::INDEX_FILE),
            bundle: overrides.bundle,
            date,
        }
    }
}

/// `YYYY-MM-DD`, the name of a dated central-store directory.
pub fn date_dir(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

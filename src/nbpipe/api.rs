//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry point for
//! every pipeline stage, whatever drives it (the `nbpipe` binary, a CI wrapper, tests).
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Resolves settings** from command-line overrides, the loaded [`PipelineConfig`] and
//!   the working directory
//! - **Supplies the clock** so commands stay deterministic under test
//! - **Dispatches** to the matching `commands::*::run`
//!
//! It never prints and never exits; it returns `Result<CmdResult>`.
//!
//! ## Generic Over NotebookRunner
//!
//! `NbApi<R: NotebookRunner>` is generic over the conversion facility:
//! - Production: `NbApi<JupyterRunner>`
//! - Testing: `NbApi<ScriptedRunner>`
//!
//! ## Testing Strategy
//!
//! API tests check that each method reaches the right command with settings anchored to
//! the working directory. Command behavior is tested in the command modules.

use crate::commands;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::runner::NotebookRunner;
use crate::settings::{
    ArchiveOverrides, ArchiveSettings, CleanSettings, ConvertOverrides, ConvertSettings,
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

pub struct NbApi<R: NotebookRunner> {
    runner: R,
    work_dir: PathBuf,
    config: PipelineConfig,
}

impl<R: NotebookRunner> NbApi<R> {
    pub fn new(runner: R, work_dir: PathBuf, config: PipelineConfig) -> Self {
        Self {
            runner,
            work_dir,
            config,
        }
    }

    pub fn clean(&self, input: Option<PathBuf>) -> Result<commands::CmdResult> {
        let settings = CleanSettings::resolve(&self.work_dir, &self.config, input);
        commands::clean::run(&settings)
    }

    /// Resolves conversion settings without running anything, so callers can show them
    /// when a conversion fails.
    pub fn convert_settings(&self, overrides: ConvertOverrides) -> Result<ConvertSettings> {
        ConvertSettings::resolve(&self.work_dir, &self.config, overrides)
    }

    pub fn convert(&self, settings: &ConvertSettings) -> Result<commands::CmdResult> {
        self.convert_at(settings, Local::now().naive_local())
    }

    pub fn convert_at(
        &self,
        settings: &ConvertSettings,
        now: NaiveDateTime,
    ) -> Result<commands::CmdResult> {
        commands::convert::run(&self.runner, settings, now)
    }

    pub fn archive(&self, overrides: ArchiveOverrides) -> Result<commands::CmdResult> {
        self.archive_on(overrides, Local::now().date_naive())
    }

    /// Archives into the central-store directory for `date`.
    pub fn archive_on(
        &self,
        overrides: ArchiveOverrides,
        date: NaiveDate,
    ) -> Result<commands::CmdResult> {
        let settings = ArchiveSettings::resolve(&self.work_dir, &self.config, overrides, date);
        commands::archive::run(&settings)
    }

    pub fn prepend_date(&self, report: Option<&Path>) -> Result<commands::CmdResult> {
        self.prepend_date_at(report, Local::now().naive_local())
    }

    pub fn prepend_date_at(
        &self,
        report: Option<&Path>,
        now: NaiveDateTime,
    ) -> Result<commands::CmdResult> {
        let report = report.map(|p| self.work_dir.join(p));
        commands::stamp::run(report.as_deref(), now)
    }

    /// Same working directory and configuration, different runner.
    pub fn with_runner<T: NotebookRunner>(self, runner: T) -> NbApi<T> {
        NbApi {
            runner,
            work_dir: self.work_dir,
            config: self.config,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

pub use commands::{CmdMessage, CmdResult, ConvertedNotebook, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::memory::ScriptedRunner;
    use std::fs;
    use tempfile::TempDir;

    fn api(work: &TempDir) -> NbApi<ScriptedRunner> {
        NbApi::new(
            ScriptedRunner::new(),
            work.path().to_path_buf(),
            PipelineConfig::default(),
        )
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_convert_uses_runner_and_work_dir() {
        let work = TempDir::new().unwrap();
        let nbs = work.path().join("jwst_validation_notebooks/miri");
        fs::create_dir_all(&nbs).unwrap();
        fs::write(nbs.join("a.ipynb"), "{}").unwrap();
        let api = api(&work);

        let settings = api.convert_settings(ConvertOverrides::default()).unwrap();
        let result = api.convert_at(&settings, at()).unwrap();

        assert_eq!(result.converted.len(), 1);
        // the default conversion root is the working directory itself
        assert_eq!(
            api.runner().calls(),
            vec![PathBuf::from("jwst_validation_notebooks/miri/a.ipynb")]
        );
        assert!(work.path().join("index.html").is_file());
    }

    /// `href` values of an index page, unescaped.
    fn links(index: &Path) -> Vec<String> {
        let html = fs::read_to_string(index).unwrap();
        html.split("href=\"")
            .skip(1)
            .map(|rest| rest.split('"').next().unwrap().replace("&#x2f;", "/"))
            .collect()
    }

    #[test]
    fn test_published_index_links_resolve() {
        let work = TempDir::new().unwrap();
        for rel in ["miri/imaging.ipynb", "nircam/deep/coron.ipynb", "top.ipynb"] {
            let path = work.path().join("jwst_validation_notebooks").join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "{}").unwrap();
        }
        let config = PipelineConfig {
            central_base: PathBuf::from("store"),
            ..Default::default()
        };
        let api = NbApi::new(ScriptedRunner::new(), work.path().to_path_buf(), config);

        let settings = api.convert_settings(ConvertOverrides::default()).unwrap();
        api.convert_at(&settings, at()).unwrap();
        api.archive_on(
            ArchiveOverrides::default(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();

        for root in [
            work.path().join("html_archive"),
            work.path().join("store/2024-01-01"),
        ] {
            let hrefs = links(&root.join("index.html"));
            assert_eq!(hrefs.len(), 3);
            for href in hrefs {
                assert!(root.join(&href).is_file(), "dead link {}", href);
            }
        }
    }

    #[test]
    fn test_clean_dispatch() {
        let work = TempDir::new().unwrap();
        fs::write(work.path().join("junit_report.xml"), "x").unwrap();

        let result = api(&work).clean(None).unwrap();

        assert_eq!(result.affected_paths, vec![work.path().join("junit_report.xml")]);
    }

    #[test]
    fn test_archive_dispatch_uses_date() {
        let work = TempDir::new().unwrap();
        fs::create_dir_all(work.path().join("jwst_validation_notebooks")).unwrap();
        fs::write(work.path().join("jwst_validation_notebooks/a.html"), "a").unwrap();
        let config = PipelineConfig {
            central_base: PathBuf::from("store"),
            ..Default::default()
        };
        let api = NbApi::new(ScriptedRunner::new(), work.path().to_path_buf(), config);

        api.archive_on(
            ArchiveOverrides::default(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        )
        .unwrap();

        assert!(work.path().join("store/2024-03-09/a.html").is_file());
        assert!(work.path().join("html_archive/a.html").is_file());
    }

    #[test]
    fn test_prepend_date_relative_to_work_dir() {
        let work = TempDir::new().unwrap();
        fs::write(work.path().join("junit_report.xml"), "x").unwrap();

        let result = api(&work)
            .prepend_date_at(Some(Path::new("junit_report.xml")), at())
            .unwrap();

        assert_eq!(
            result.affected_paths,
            vec![work.path().join("report-2024-01-01-10-00-00.xml")]
        );
    }
}

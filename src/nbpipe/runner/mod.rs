//! # Notebook Runners
//!
//! Executing and rendering a notebook is delegated to an external facility. The
//! [`NotebookRunner`] trait is the seam: the conversion command only knows about jobs and
//! outcomes, never about how a notebook actually runs.
//!
//! - [`jupyter::JupyterRunner`]: production runner, shells out to `jupyter nbconvert`.
//! - [`memory::ScriptedRunner`]: test double that writes placeholder outputs and fails on
//!   demand.
//!
//! ## Two kinds of failure
//!
//! A notebook that raises or times out is an [`Outcome::Failed`]; it ends up as a failed
//! test case in the report and the batch carries on. A runner that cannot do its job at
//! all (program missing, cannot be spawned) returns `Err`, which aborts the whole batch.

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod jupyter;
pub mod memory;

/// Prefix marking an executed copy of a notebook.
pub const EXECUTED_PREFIX: &str = "exec";

/// One notebook to convert and the artifacts it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookJob {
    pub source: PathBuf,
    /// Path relative to the notebook root
    pub rel_path: PathBuf,
    pub executed: PathBuf,
    pub html: PathBuf,
}

impl NotebookJob {
    /// `dir/foo.ipynb` executes to `dir/exec_foo.ipynb` and renders to `dir/foo.html`.
    pub fn new(source: PathBuf, rel_path: PathBuf) -> Self {
        let dir = source.parent().map(Path::to_path_buf).unwrap_or_default();
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = source
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            executed: dir.join(format!("{}_{}", EXECUTED_PREFIX, name)),
            html: dir.join(format!("{}.html", stem)),
            source,
            rel_path,
        }
    }

    /// HTML output relative to the notebook root.
    pub fn html_rel_path(&self) -> PathBuf {
        self.rel_path.with_extension("html")
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub timeout: Duration,
    pub template_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(String),
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

pub trait NotebookRunner {
    /// Executes `job.source` into `job.executed` and renders `job.html`.
    fn run(&self, job: &NotebookJob, options: &RunOptions) -> Result<Outcome>;
}

/// Returns true for executed copies (`exec*.ipynb`), which are never sources.
pub fn is_executed_notebook(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(EXECUTED_PREFIX) && n.ends_with(".ipynb"))
}

pub fn is_notebook(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "ipynb")
}

pub fn is_html(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "html")
}

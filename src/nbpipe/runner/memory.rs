use super::{NotebookJob, NotebookRunner, Outcome, RunOptions};
use crate::error::{NbError, Result};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// Runner used by tests: writes placeholder executed/HTML files without running anything.
///
/// Notebooks whose file name is registered with [`ScriptedRunner::failing`] report a failed
/// outcome; [`ScriptedRunner::broken`] makes every call return an error, the way a missing
/// `jupyter` installation would.
#[derive(Default)]
pub struct ScriptedRunner {
    failing: HashSet<String>,
    broken: Option<String>,
    calls: RefCell<Vec<PathBuf>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, file_name: &str) -> Self {
        self.failing.insert(file_name.to_string());
        self
    }

    pub fn broken(mut self, reason: &str) -> Self {
        self.broken = Some(reason.to_string());
        self
    }

    /// Relative paths of every notebook the runner was asked to convert, in order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }
}

impl NotebookRunner for ScriptedRunner {
    fn run(&self, job: &NotebookJob, _options: &RunOptions) -> Result<Outcome> {
        if let Some(reason) = &self.broken {
            return Err(NbError::Conversion(reason.clone()));
        }
        self.calls.borrow_mut().push(job.rel_path.clone());

        let name = job
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.failing.contains(&name) {
            return Ok(Outcome::Failed(format!("{} raised an exception", name)));
        }

        let source = fs::read_to_string(&job.source).map_err(|e| NbError::at(&job.source, e))?;
        fs::write(&job.executed, &source).map_err(|e| NbError::at(&job.executed, e))?;
        fs::write(&job.html, format!("<html><body>{}</body></html>", name))
            .map_err(|e| NbError::at(&job.html, e))?;
        Ok(Outcome::Passed)
    }
}

use crate::runner::{NotebookJob, Outcome};
use std::path::PathBuf;
use std::time::Duration;

pub mod archive;
pub mod clean;
pub mod convert;
pub mod helpers;
pub mod stamp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// A notebook the converter ran, successful or not.
#[derive(Debug, Clone)]
pub struct ConvertedNotebook {
    pub job: NotebookJob,
    pub title: Option<String>,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Files removed, copied or renamed, depending on the command
    pub affected_paths: Vec<PathBuf>,
    pub converted: Vec<ConvertedNotebook>,
    pub bundle: Option<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.affected_paths = paths;
        self
    }

    pub fn with_converted(mut self, converted: Vec<ConvertedNotebook>) -> Self {
        self.converted = converted;
        self
    }

    pub fn with_bundle(mut self, bundle: PathBuf) -> Self {
        self.bundle = Some(bundle);
        self
    }

    /// Notebooks that failed to execute or render.
    pub fn failures(&self) -> impl Iterator<Item = &ConvertedNotebook> {
        self.converted.iter().filter(|nb| !nb.outcome.is_passed())
    }
}

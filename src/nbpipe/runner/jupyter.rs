use super::{NotebookJob, NotebookRunner, Outcome, RunOptions};
use crate::error::{NbError, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// Lines of stderr kept in a failure message.
const FAILURE_TAIL_LINES: usize = 20;

/// Runs notebooks through `jupyter nbconvert`: one call to execute, one to render HTML.
pub struct JupyterRunner {
    program: String,
}

impl JupyterRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn invoke(&self, args: &[OsString]) -> Result<Output> {
        debug!("{} {:?}", self.program, args);
        Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| {
                NbError::Conversion(format!("could not launch '{}': {}", self.program, e))
            })
    }
}

impl NotebookRunner for JupyterRunner {
    fn run(&self, job: &NotebookJob, options: &RunOptions) -> Result<Outcome> {
        let executed = self.invoke(&execute_args(job, options))?;
        if !executed.status.success() {
            return Ok(Outcome::Failed(failure_summary("execution", &executed)));
        }

        let rendered = self.invoke(&render_args(job, options))?;
        if !rendered.status.success() {
            return Ok(Outcome::Failed(failure_summary("html rendering", &rendered)));
        }

        Ok(Outcome::Passed)
    }
}

fn stem(path: &Path) -> OsString {
    path.file_stem().map(OsString::from).unwrap_or_default()
}

fn output_dir(path: &Path) -> OsString {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("."))
}

pub(crate) fn execute_args(job: &NotebookJob, options: &RunOptions) -> Vec<OsString> {
    vec![
        "nbconvert".into(),
        "--to".into(),
        "notebook".into(),
        "--execute".into(),
        format!("--ExecutePreprocessor.timeout={}", options.timeout.as_secs()).into(),
        "--output".into(),
        stem(&job.executed),
        "--output-dir".into(),
        output_dir(&job.executed),
        job.source.clone().into(),
    ]
}

pub(crate) fn render_args(job: &NotebookJob, options: &RunOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "nbconvert".into(),
        "--to".into(),
        "html".into(),
        "--output".into(),
        stem(&job.html),
        "--output-dir".into(),
        output_dir(&job.html),
    ];
    if let Some(template) = &options.template_file {
        let mut flag = OsString::from("--TemplateExporter.template_file=");
        flag.push(template);
        args.push(flag);
    }
    args.push(job.executed.clone().into());
    args
}

fn failure_summary(stage: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    let tail = lines[lines.len().saturating_sub(FAILURE_TAIL_LINES)..].join("\n");

    let summary = match output.status.code() {
        Some(code) => format!("{} failed with exit code {}\n{}", stage, code, tail),
        None => format!("{} was terminated by a signal\n{}", stage, tail),
    };
    summary.trim_end().to_string()
}

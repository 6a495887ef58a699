use crate::commands::helpers::{find_files, relative_to};
use crate::commands::{CmdMessage, CmdResult, ConvertedNotebook};
use crate::error::{NbError, Result};
use crate::index::{index_entries, write_index};
use crate::notebook::notebook_title;
use crate::report::write_report;
use crate::runner::{
    is_executed_notebook, is_notebook, NotebookJob, NotebookRunner, Outcome, RunOptions,
};
use crate::settings::ConvertSettings;
use chrono::NaiveDateTime;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Converts every selected notebook, then writes the JUnit report and the HTML index.
///
/// A notebook that fails is recorded and the batch continues; a runner error stops the
/// batch immediately and nothing is written.
pub fn run<R: NotebookRunner>(
    runner: &R,
    settings: &ConvertSettings,
    now: NaiveDateTime,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let jobs = select_notebooks(settings, &mut result)?;

    let options = RunOptions {
        timeout: settings.timeout,
        template_file: settings.template_file.clone(),
    };

    let mut converted = Vec::with_capacity(jobs.len());
    for job in jobs {
        info!("converting {}", job.rel_path.display());
        let started = Instant::now();
        let outcome = runner.run(&job, &options)?;
        let elapsed = started.elapsed();

        if let Outcome::Failed(reason) = &outcome {
            warn!("{} failed: {}", job.rel_path.display(), reason);
            result.add_message(CmdMessage::warning(format!(
                "Failed: {}",
                job.rel_path.display()
            )));
        }

        converted.push(ConvertedNotebook {
            title: notebook_title(&job.source),
            job,
            outcome,
            elapsed,
        });
    }

    write_report(&settings.report_file, &converted, now)?;
    result.add_message(CmdMessage::info(format!(
        "Wrote report {}",
        settings.report_file.display()
    )));

    info!("generating {}", settings.index_file.display());
    let entries = index_entries(&converted, &settings.link_root);
    write_index(
        &settings.index_file,
        &entries,
        settings.index_template.as_deref(),
        now,
    )?;

    let failed = converted.iter().filter(|nb| !nb.outcome.is_passed()).count();
    let summary = format!(
        "Converted {} of {} notebook(s), index lists {}",
        converted.len() - failed,
        converted.len(),
        entries.len()
    );
    if failed == 0 {
        result.add_message(CmdMessage::success(summary));
    } else {
        result.add_message(CmdMessage::warning(summary));
    }

    Ok(result.with_converted(converted))
}

/// Finds source notebooks under the notebook path and applies the include/exclude lists.
fn select_notebooks(
    settings: &ConvertSettings,
    result: &mut CmdResult,
) -> Result<Vec<NotebookJob>> {
    let root = &settings.notebook_path;
    if !root.is_dir() {
        return Err(NbError::Config(format!(
            "notebook path {} is not a directory",
            root.display()
        )));
    }

    let sources = find_files(root, &[], is_source)?;
    let mut jobs = Vec::with_capacity(sources.len());
    for source in sources {
        let rel_path = relative_to(&source, root)?;

        if let Some(include) = &settings.include {
            if !include.matches(&rel_path) {
                continue;
            }
        }
        if let Some(pattern) = settings.exclude.find_match(&rel_path) {
            result.add_message(CmdMessage::info(format!(
                "Skipping {} (excluded by '{}')",
                rel_path.display(),
                pattern
            )));
            continue;
        }

        jobs.push(NotebookJob::new(source, rel_path));
    }
    Ok(jobs)
}

fn is_source(path: &Path) -> bool {
    is_notebook(path) && !is_executed_notebook(path)
}

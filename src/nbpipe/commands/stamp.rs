use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NbError, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `report-YYYY-MM-DD-HH-MM-SS.xml`, second resolution.
pub fn stamped_name(now: NaiveDateTime) -> String {
    format!("report-{}.xml", now.format("%Y-%m-%d-%H-%M-%S"))
}

/// Renames a finished report so a later run cannot overwrite it.
///
/// A missing argument or a report that does not exist is not an error: the pipeline keeps
/// going and nothing is renamed. The new name lands in the report's own directory.
pub fn run(report: Option<&Path>, now: NaiveDateTime) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let Some(report) = report else {
        result.add_message(CmdMessage::info("Path not provided, continuing"));
        return Ok(result);
    };

    if !report.exists() {
        result.add_message(CmdMessage::info(format!(
            "Report {} not found, continuing",
            report.display()
        )));
        return Ok(result);
    }

    let dest = stamped_path(report, now);
    debug!("renaming {} to {}", report.display(), dest.display());
    fs::rename(report, &dest).map_err(|e| NbError::at(report, e))?;

    result.add_message(CmdMessage::success(format!(
        "Renamed {} to {}",
        report.display(),
        dest.display()
    )));
    Ok(result.with_affected_paths(vec![dest]))
}

fn stamped_path(report: &Path, now: NaiveDateTime) -> PathBuf {
    match report.parent() {
        Some(parent) => parent.join(stamped_name(now)),
        None => PathBuf::from(stamped_name(now)),
    }
}

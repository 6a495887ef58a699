//! JUnit XML report of a conversion batch.
//!
//! Each notebook becomes one `<testcase>`; its class name is the notebook's directory
//! (dot separated) so CI dashboards group notebooks by instrument/mode.

use crate::commands::ConvertedNotebook;
use crate::error::{NbError, Result};
use crate::patterns::slash_path;
use crate::runner::Outcome;
use chrono::NaiveDateTime;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const SUITE_NAME: &str = "nbpipe";

pub fn render_report(notebooks: &[ConvertedNotebook], generated_at: NaiveDateTime) -> String {
    let failures = notebooks.iter().filter(|nb| !nb.outcome.is_passed()).count();
    let total_secs: f64 = notebooks.iter().map(|nb| nb.elapsed.as_secs_f64()).sum();

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        xml,
        "<testsuites tests=\"{}\" failures=\"{}\" errors=\"0\" time=\"{:.3}\">",
        notebooks.len(),
        failures,
        total_secs
    );
    let _ = writeln!(
        xml,
        "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"0\" time=\"{:.3}\" timestamp=\"{}\">",
        SUITE_NAME,
        notebooks.len(),
        failures,
        total_secs,
        generated_at.format("%Y-%m-%dT%H:%M:%S")
    );

    for nb in notebooks {
        let name = nb
            .job
            .rel_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let classname = nb
            .job
            .rel_path
            .parent()
            .map(|p| slash_path(p).replace('/', "."))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| SUITE_NAME.to_string());
        let attrs = format!(
            "classname=\"{}\" name=\"{}\" time=\"{:.3}\"",
            escape(&classname),
            escape(&name),
            nb.elapsed.as_secs_f64()
        );

        match &nb.outcome {
            Outcome::Passed => {
                let _ = writeln!(xml, "    <testcase {}/>", attrs);
            }
            Outcome::Failed(message) => {
                let first_line = message.lines().next().unwrap_or_default();
                let _ = writeln!(xml, "    <testcase {}>", attrs);
                let _ = writeln!(
                    xml,
                    "      <failure message=\"{}\">{}</failure>",
                    escape(first_line),
                    escape(message)
                );
                xml.push_str("    </testcase>\n");
            }
        }
    }

    xml.push_str("  </testsuite>\n");
    xml.push_str("</testsuites>\n");
    xml
}

pub fn write_report(
    path: &Path,
    notebooks: &[ConvertedNotebook],
    generated_at: NaiveDateTime,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| NbError::at(parent, e))?;
    }
    fs::write(path, render_report(notebooks, generated_at)).map_err(|e| NbError::at(path, e))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() && c != '\n' && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

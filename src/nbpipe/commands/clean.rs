use crate::commands::helpers::{find_files, remove_file};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::runner::{is_executed_notebook, is_html};
use crate::settings::CleanSettings;
use std::path::Path;
use tracing::debug;

/// Removes generated artifacts: executed notebooks and HTML under the notebook tree, plus
/// the top-level index and report.
///
/// The first file that cannot be removed aborts the run; files already removed stay gone.
pub fn run(settings: &CleanSettings) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut removed = Vec::new();

    if settings.notebook_dir.is_dir() {
        let generated = find_files(&settings.notebook_dir, &[], is_generated)?;
        for path in generated {
            debug!("removing {}", path.display());
            remove_file(&path)?;
            result.add_message(CmdMessage::info(format!("Removing {}", path.display())));
            removed.push(path);
        }
    } else {
        result.add_message(CmdMessage::info(format!(
            "No notebook directory at {}, nothing to clean there",
            settings.notebook_dir.display()
        )));
    }

    for path in [&settings.index_file, &settings.report_file] {
        if path.exists() {
            remove_file(path)?;
            result.add_message(CmdMessage::info(format!("Removing {}", path.display())));
            removed.push(path.clone());
        }
    }

    result.add_message(CmdMessage::success(format!(
        "Removed {} generated file(s)",
        removed.len()
    )));
    Ok(result.with_affected_paths(removed))
}

fn is_generated(path: &Path) -> bool {
    is_executed_notebook(path) || is_html(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "x").unwrap();
        path
    }

    fn settings(work: &TempDir) -> CleanSettings {
        CleanSettings::resolve(work.path(), &PipelineConfig::default(), None)
    }

    #[test]
    fn test_removes_generated_files_only() {
        let work = TempDir::new().unwrap();
        let nbs = "jwst_validation_notebooks";
        let source = touch(work.path(), &format!("{nbs}/miri/imaging.ipynb"));
        let readme = touch(work.path(), &format!("{nbs}/miri/README.md"));
        touch(work.path(), &format!("{nbs}/miri/exec_imaging.ipynb"));
        touch(work.path(), &format!("{nbs}/miri/imaging.html"));
        touch(work.path(), &format!("{nbs}/nircam/deep/a/exec_a.ipynb"));
        touch(work.path(), &format!("{nbs}/nircam/deep/a/a.html"));
        touch(work.path(), "index.html");
        touch(work.path(), "junit_report.xml");

        let result = run(&settings(&work)).unwrap();

        assert_eq!(result.affected_paths.len(), 6);
        assert!(source.exists());
        assert!(readme.exists());
        assert!(!work.path().join("index.html").exists());
        assert!(!work.path().join("junit_report.xml").exists());

        let leftovers = find_files(&work.path().join(nbs), &[], is_generated).unwrap();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_missing_tree_and_files_is_fine() {
        let work = TempDir::new().unwrap();
        let result = run(&settings(&work)).unwrap();
        assert!(result.affected_paths.is_empty());
        assert_eq!(
            result.messages.last().unwrap().content,
            "Removed 0 generated file(s)"
        );
    }

    #[test]
    fn test_reports_each_removal() {
        let work = TempDir::new().unwrap();
        let html = touch(work.path(), "jwst_validation_notebooks/x.html");

        let result = run(&settings(&work)).unwrap();
        let expected = format!("Removing {}", html.display());
        assert!(result.messages.iter().any(|m| m.content == expected));
    }

    #[cfg(unix)]
    #[test]
    fn test_deletion_failure_aborts() {
        use std::os::unix::fs::PermissionsExt;

        let work = TempDir::new().unwrap();
        let locked = work.path().join("jwst_validation_notebooks/locked");
        touch(work.path(), "jwst_validation_notebooks/locked/a.html");
        touch(work.path(), "index.html");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // root ignores directory permissions; nothing to assert in that case
        let probe = locked.join(".probe");
        let is_privileged = fs::write(&probe, "").is_ok();
        let _ = fs::remove_file(&probe);

        let outcome = run(&settings(&work));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !is_privileged {
            assert!(outcome.is_err());
            // the abort happens before the top-level files are reached
            assert!(work.path().join("index.html").exists());
        }
    }
}

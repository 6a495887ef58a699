use crate::bundle::write_bundle;
use crate::commands::helpers::{copy_into, find_files, relative_to, reset_dir};
use crate::commands::{CmdMessage, CmdResult};
use crate::config::INDEX_FILE;
use crate::error::{NbError, Result};
use crate::runner::is_html;
use crate::settings::ArchiveSettings;
use std::fs;
use tracing::debug;

/// Publishes the HTML reports of the notebook tree.
///
/// The local archive is rebuilt from scratch on every run; the central store only ever
/// gains files. Both mirror the notebook tree's relative layout. There is no rollback: a
/// failed copy leaves whatever was already copied in place.
pub fn run(settings: &ArchiveSettings) -> Result<CmdResult> {
    if !settings.notebook_dir.is_dir() {
        return Err(NbError::Config(format!(
            "notebook directory {} does not exist",
            settings.notebook_dir.display()
        )));
    }

    reset_dir(&settings.archive_dir)?;
    fs::create_dir_all(&settings.central_dir)
        .map_err(|e| NbError::at(&settings.central_dir, e))?;

    let prune = [settings.archive_dir.as_path(), settings.central_dir.as_path()];
    let reports = find_files(&settings.notebook_dir, &prune, is_html)?;

    let mut archived = Vec::with_capacity(reports.len() + 1);
    for path in &reports {
        debug!("Archiving {}", path.display());
        let rel_path = relative_to(path, &settings.notebook_dir)?;

        for root in [&settings.archive_dir, &settings.central_dir] {
            let dest = root.join(&rel_path);
            debug!("\tCopying to {}", dest.display());
            copy_into(path, &dest)?;
        }
        archived.push(rel_path);
    }

    let mut result = CmdResult::default();
    if settings.index_file.is_file() {
        for root in [&settings.archive_dir, &settings.central_dir] {
            copy_into(&settings.index_file, &root.join(INDEX_FILE))?;
        }
        archived.push(INDEX_FILE.into());
    } else {
        result.add_message(CmdMessage::warning(format!(
            "No {} found, archive has no index page",
            settings.index_file.display()
        )));
    }

    result.add_message(CmdMessage::success(format!(
        "Archived {} file(s) to {} and {}",
        archived.len(),
        settings.archive_dir.display(),
        settings.central_dir.display()
    )));

    if let Some(format) = settings.bundle {
        let dest = settings.work_dir.join(format.file_name(settings.date));
        debug!("Bundling {} into {}", settings.archive_dir.display(), dest.display());
        let bundle = write_bundle(&settings.archive_dir, &dest, format)?;
        result.add_message(CmdMessage::success(format!("Wrote {}", bundle.display())));
        result = result.with_bundle(bundle);
    }

    Ok(result.with_affected_paths(archived))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{zip_entries, BundleFormat};
    use crate::config::PipelineConfig;
    use crate::settings::ArchiveOverrides;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn tree() -> TempDir {
        let work = TempDir::new().unwrap();
        touch(work.path(), "nbs/miri/imaging.html", "miri");
        touch(work.path(), "nbs/miri/imaging.ipynb", "{}");
        touch(work.path(), "nbs/nircam/deep/coron/coron.html", "coron");
        touch(work.path(), "nbs/top.html", "top");
        work
    }

    fn settings(work: &TempDir, bundle: Option<BundleFormat>) -> ArchiveSettings {
        ArchiveSettings::resolve(
            work.path(),
            &PipelineConfig::default(),
            ArchiveOverrides {
                input: Some("nbs".into()),
                output: Some("central/2024-03-09".into()),
                archive_dir: Some("html_archive".into()),
                bundle,
            },
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        )
    }

    /// Relative paths of every file under `root`.
    fn files_under(root: &Path) -> BTreeSet<String> {
        find_files(root, &[], |_| true)
            .unwrap()
            .into_iter()
            .map(|p| crate::patterns::slash_path(p.strip_prefix(root).unwrap()))
            .collect()
    }

    fn expected(with_index: bool) -> BTreeSet<String> {
        let mut set: BTreeSet<String> = ["miri/imaging.html", "nircam/deep/coron/coron.html", "top.html"]
            .into_iter()
            .map(String::from)
            .collect();
        if with_index {
            set.insert("index.html".into());
        }
        set
    }

    #[test]
    fn test_archive_mirrors_html_layout() {
        let work = tree();
        touch(work.path(), "index.html", "index");
        let s = settings(&work, None);

        let result = run(&s).unwrap();

        assert_eq!(files_under(&s.archive_dir), expected(true));
        assert_eq!(files_under(&s.central_dir), expected(true));
        assert_eq!(result.affected_paths.len(), 4);
        assert_eq!(
            fs::read_to_string(s.central_dir.join("nircam/deep/coron/coron.html")).unwrap(),
            "coron"
        );
    }

    #[test]
    fn test_archive_without_index() {
        let work = tree();
        let s = settings(&work, None);

        let result = run(&s).unwrap();

        assert_eq!(files_under(&s.archive_dir), expected(false));
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == crate::commands::MessageLevel::Warning));
    }

    #[test]
    fn test_archive_is_reset_each_run() {
        let work = tree();
        let s = settings(&work, None);
        touch(&s.archive_dir, "stale/old.html", "old");

        run(&s).unwrap();
        let first = files_under(&s.archive_dir);
        run(&s).unwrap();
        let second = files_under(&s.archive_dir);

        assert_eq!(first, expected(false));
        assert_eq!(first, second);
    }

    #[test]
    fn test_central_store_accumulates() {
        let work = tree();
        let s = settings(&work, None);
        touch(&s.central_dir, "earlier/run.html", "kept");

        run(&s).unwrap();

        assert!(s.central_dir.join("earlier/run.html").is_file());
        assert!(!s.archive_dir.join("earlier/run.html").exists());
    }

    #[test]
    fn test_archive_inside_notebook_tree_is_not_rescanned() {
        let work = tree();
        let mut s = settings(&work, None);
        s.archive_dir = s.notebook_dir.join("html_archive");
        touch(&s.archive_dir, "leftover.html", "x");

        run(&s).unwrap();
        run(&s).unwrap();

        assert_eq!(files_under(&s.archive_dir), expected(false));
    }

    #[test]
    fn test_no_bundle_when_disabled() {
        let work = tree();
        run(&settings(&work, None)).unwrap();
        assert!(!work.path().join("2024-03-09.zip").exists());
    }

    #[test]
    fn test_zip_bundle_matches_archive() {
        let work = tree();
        touch(work.path(), "index.html", "index");
        let s = settings(&work, Some(BundleFormat::Zip));

        let result = run(&s).unwrap();

        let zip_path = work.path().join("2024-03-09.zip");
        assert_eq!(result.bundle, Some(zip_path.clone()));
        let files: BTreeSet<String> = zip_entries(&zip_path)
            .unwrap()
            .into_iter()
            .filter(|name| !name.ends_with('/'))
            .collect();
        assert_eq!(files, files_under(&s.archive_dir));
    }

    #[test]
    fn test_tar_gz_bundle() {
        let work = tree();
        let result = run(&settings(&work, Some(BundleFormat::TarGz))).unwrap();
        assert_eq!(
            result.bundle,
            Some(work.path().join("2024-03-09.tar.gz"))
        );
        assert!(work.path().join("2024-03-09.tar.gz").is_file());
    }

    #[test]
    fn test_missing_notebook_dir() {
        let work = TempDir::new().unwrap();
        let err = run(&settings(&work, None)).unwrap_err();
        assert!(matches!(err, NbError::Config(_)));
        assert!(!work.path().join("html_archive").exists());
    }

    #[test]
    fn test_relative_paths_recorded() {
        let work = tree();
        let result = run(&settings(&work, None)).unwrap();
        assert!(result
            .affected_paths
            .contains(&PathBuf::from("nircam/deep/coron/coron.html")));
    }
}

use crate::error::{NbError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Jupyter autosave directories, never part of a notebook tree.
const CHECKPOINT_DIR: &str = ".ipynb_checkpoints";

fn is_checkpoint_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == CHECKPOINT_DIR
}

/// Recursively collects files under `root` accepted by `keep`, in a stable order.
///
/// Directories listed in `prune` (and checkpoint directories) are not descended into.
/// The whole list is gathered before the caller touches the filesystem, so deleting or
/// copying the results never disturbs the walk.
pub fn find_files<F>(root: &Path, prune: &[&Path], keep: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_checkpoint_dir(e) && !prune.iter().any(|p| e.path() == *p));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && keep(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

pub fn relative_to(path: &Path, root: &Path) -> Result<PathBuf> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| {
            NbError::Config(format!(
                "{} is not under {}",
                path.display(),
                root.display()
            ))
        })
}

/// Copies `src` to `dest`, creating any missing parent directories first.
pub fn copy_into(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| NbError::at(parent, e))?;
    }
    fs::copy(src, dest).map_err(|e| NbError::at(src, e))?;
    Ok(())
}

pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| NbError::at(path, e))
}

/// Deletes `dir` if present and recreates it empty.
pub fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| NbError::at(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| NbError::at(dir, e))
}

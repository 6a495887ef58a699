//! Compressed snapshots of the local archive.
//!
//! Entry names are relative to the archive root and always use `/`, so extracting a
//! bundle anywhere reproduces the archive tree.

use crate::error::{NbError, Result};
use crate::patterns::slash_path;
use chrono::NaiveDate;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleFormat {
    Zip,
    TarGz,
}

impl BundleFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            BundleFormat::Zip => "zip",
            BundleFormat::TarGz => "tar.gz",
        }
    }

    /// `2024-03-09.zip` style name for a run on `date`.
    pub fn file_name(&self, date: NaiveDate) -> String {
        format!("{}.{}", date.format("%Y-%m-%d"), self.extension())
    }
}

/// Writes the contents of `source_dir` into `dest` and returns `dest`.
pub fn write_bundle(source_dir: &Path, dest: &Path, format: BundleFormat) -> Result<PathBuf> {
    let file = File::create(dest).map_err(|e| NbError::at(dest, e))?;
    match format {
        BundleFormat::Zip => write_zip(file, source_dir)?,
        BundleFormat::TarGz => write_tar_gz(file, source_dir)?,
    }
    Ok(dest.to_path_buf())
}

/// Walks `root` in a stable order, yielding `(path, relative name, is_dir)`.
fn entries(root: &Path) -> Result<Vec<(PathBuf, String, bool)>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let rel = entry.path().strip_prefix(root).map_err(|_| {
            NbError::Config(format!("{} is outside {}", entry.path().display(), root.display()))
        })?;
        out.push((
            entry.path().to_path_buf(),
            slash_path(rel),
            entry.file_type().is_dir(),
        ));
    }
    Ok(out)
}

fn write_zip<W: Write + Seek>(writer: W, root: &Path) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, name, is_dir) in entries(root)? {
        if is_dir {
            zip.add_directory(format!("{}/", name), options)?;
        } else {
            zip.start_file(name, options)?;
            let mut src = File::open(&path).map_err(|e| NbError::at(&path, e))?;
            io::copy(&mut src, &mut zip).map_err(|e| NbError::at(&path, e))?;
        }
    }

    zip.finish()?;
    Ok(())
}

fn write_tar_gz<W: Write>(writer: W, root: &Path) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    for (path, name, is_dir) in entries(root)? {
        let appended = if is_dir {
            tar.append_dir(&name, &path)
        } else {
            tar.append_path_with_name(&path, &name)
        };
        appended.map_err(|e| NbError::at(&path, e))?;
    }

    tar.into_inner()?.finish()?;
    Ok(())
}

/// Lists the relative entry names of a zip bundle, directories included.
pub fn zip_entries(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| NbError::at(path, e))?;
    let archive = zip::ZipArchive::new(file)?;
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    Ok(names)
}

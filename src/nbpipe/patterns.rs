//! Notebook selection patterns (`--exclude`, `--include`, `exclude_notebooks`).
//!
//! Patterns are globs. A notebook matches when any pattern matches its file name, its
//! file stem, or its `/`-separated path relative to the notebook root, so `slow_*`,
//! `slow_test.ipynb` and `nircam/*` all do what one expects.

use crate::error::{NbError, Result};
use glob::Pattern;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a pattern list came from, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum PatternSource {
    CommandLine,
    File(PathBuf),
    Empty,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternList {
    source: PatternSource,
    patterns: Vec<String>,
    #[serde(skip)]
    compiled: Vec<Pattern>,
}

impl PatternList {
    pub fn new(patterns: Vec<String>, source: PatternSource) -> Result<Self> {
        let compiled = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| NbError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source,
            patterns,
            compiled,
        })
    }

    pub fn empty() -> Self {
        Self {
            source: PatternSource::Empty,
            patterns: Vec::new(),
            compiled: Vec::new(),
        }
    }

    /// Parses a comma separated command-line value.
    pub fn from_arg(arg: &str) -> Result<Self> {
        let patterns = arg
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
        Self::new(patterns, PatternSource::CommandLine)
    }

    /// Reads a pattern file, returning `None` when it does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(path).map_err(|e| NbError::at(path, e))?;
        Self::new(parse_lines(&text), PatternSource::File(path.to_path_buf())).map(Some)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn source(&self) -> &PatternSource {
        &self.source
    }

    /// Returns the first pattern matching the notebook at `rel_path`.
    pub fn find_match(&self, rel_path: &Path) -> Option<&str> {
        let full = slash_path(rel_path);
        let name = rel_path.file_name().and_then(|n| n.to_str());
        let stem = rel_path.file_stem().and_then(|n| n.to_str());

        self.compiled
            .iter()
            .zip(&self.patterns)
            .find(|(pattern, _)| {
                pattern.matches(&full)
                    || name.is_some_and(|n| pattern.matches(n))
                    || stem.is_some_and(|s| pattern.matches(s))
            })
            .map(|(_, raw)| raw.as_str())
    }

    pub fn matches(&self, rel_path: &Path) -> bool {
        self.find_match(rel_path).is_some()
    }
}

/// One pattern per line; `#` starts a comment, blank lines are skipped.
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Renders a relative path with `/` separators regardless of platform.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

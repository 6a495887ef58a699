//! # HTML Index
//!
//! `index.html` lists every successfully converted notebook, linking to its HTML report.
//! Links are relative to the link root, the notebook directory that `archive` mirrors, so
//! they resolve in the local archive and the central store where the page is published.
//! Reports outside the link root fall back to paths relative to the conversion root.
//!
//! The page is rendered with minijinja, HTML-escaped whatever the template's name. A
//! project can supply its own Jinja2 template (`index.tpl`); it receives:
//!
//! - `title`: page title
//! - `generated`: generation time, `YYYY-MM-DD HH:MM:SS`
//! - `notebooks`: list of `{ name, title, link, directory }`, sorted by directory then link
//! - `groups`: the same entries grouped by `directory`, as `{ directory, notebooks }`

use crate::commands::ConvertedNotebook;
use crate::error::{NbError, Result};
use crate::patterns::slash_path;
use chrono::NaiveDateTime;
use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub const PAGE_TITLE: &str = "Validation Notebooks";

pub const DEFAULT_INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{ title }}</title>
</head>
<body>
  <h1>{{ title }}</h1>
  <p>Generated {{ generated }}</p>
{%- for group in groups %}
  <h2>{% if group.directory %}{{ group.directory }}{% else %}.{% endif %}</h2>
  <ul>
  {%- for nb in group.notebooks %}
    <li><a href="{{ nb.link }}">{{ nb.title }}</a></li>
  {%- endfor %}
  </ul>
{%- endfor %}
</body>
</html>
"#;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub title: String,
    pub link: String,
    pub directory: String,
}

#[derive(Debug, Serialize)]
struct IndexGroup<'a> {
    directory: &'a str,
    notebooks: Vec<&'a IndexEntry>,
}

#[derive(Debug, Serialize)]
struct IndexPage<'a> {
    title: &'a str,
    generated: String,
    notebooks: &'a [IndexEntry],
    groups: Vec<IndexGroup<'a>>,
}

/// Builds index entries for the notebooks that converted successfully, linking relative
/// to `link_root`.
pub fn index_entries(converted: &[ConvertedNotebook], link_root: &Path) -> Vec<IndexEntry> {
    let mut entries: Vec<IndexEntry> = converted
        .iter()
        .filter(|nb| nb.outcome.is_passed())
        .map(|nb| {
            let link = nb
                .job
                .html
                .strip_prefix(link_root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| nb.job.html_rel_path());
            let name = nb
                .job
                .rel_path
                .file_stem()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            IndexEntry {
                title: nb.title.clone().unwrap_or_else(|| name.clone()),
                directory: link.parent().map(slash_path).unwrap_or_default(),
                link: slash_path(&link),
                name,
            }
        })
        .collect();
    entries.sort_by(|a, b| (&a.directory, &a.link).cmp(&(&b.directory, &b.link)));
    entries
}

pub fn render_index(
    entries: &[IndexEntry],
    template: Option<&str>,
    generated_at: NaiveDateTime,
) -> Result<String> {
    let mut groups: Vec<IndexGroup> = Vec::new();
    for entry in entries {
        // entries are sorted by directory first
        if groups.last().map_or(true, |g| g.directory != entry.directory) {
            groups.push(IndexGroup {
                directory: &entry.directory,
                notebooks: Vec::new(),
            });
        }
        if let Some(group) = groups.last_mut() {
            group.notebooks.push(entry);
        }
    }

    let page = IndexPage {
        title: PAGE_TITLE,
        generated: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        notebooks: entries,
        groups,
    };

    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    Ok(env.render_str(template.unwrap_or(DEFAULT_INDEX_TEMPLATE), &page)?)
}

/// Renders the index and writes it to `dest`, reading the template from `template_file`
/// when one is configured.
pub fn write_index(
    dest: &Path,
    entries: &[IndexEntry],
    template_file: Option<&Path>,
    generated_at: NaiveDateTime,
) -> Result<()> {
    let template = template_file
        .map(|path| fs::read_to_string(path).map_err(|e| NbError::at(path, e)))
        .transpose()?;
    let html = render_index(entries, template.as_deref(), generated_at)?;
    fs::write(dest, html).map_err(|e| NbError::at(dest, e))
}

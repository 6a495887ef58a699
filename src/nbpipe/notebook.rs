use serde_json::Value;
use std::fs;
use std::path::Path;

/// Returns the first Markdown heading of a notebook, used as its display title.
///
/// Unreadable or malformed notebooks simply have no title; the caller falls back to the
/// file stem.
pub fn notebook_title(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    let doc: Value = serde_json::from_str(&text).ok()?;

    doc.get("cells")?
        .as_array()?
        .iter()
        .filter(|cell| cell.get("cell_type").and_then(Value::as_str) == Some("markdown"))
        .find_map(|cell| first_heading(&cell_source(cell)))
}

/// Notebook cell sources are either a string or a list of lines.
fn cell_source(cell: &Value) -> String {
    match cell.get("source") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(lines)) => lines.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}

fn first_heading(source: &str) -> Option<String> {
    source.lines().find_map(|line| {
        let line = line.trim_start();
        let title = line.strip_prefix('#')?.trim_start_matches('#');
        // "#tag" is not a heading
        if !title.starts_with(char::is_whitespace) {
            return None;
        }
        let title = title.trim();
        (!title.is_empty()).then(|| title.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_notebook(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("nb.ipynb");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_title_from_list_source() {
        let dir = TempDir::new().unwrap();
        let path = write_notebook(
            &dir,
            r###"{"cells": [
                {"cell_type": "code", "source": ["# not markdown\n"]},
                {"cell_type": "markdown", "source": ["Intro text\n", "## MIRI Imaging Test\n"]}
            ]}"###,
        );
        assert_eq!(notebook_title(&path).as_deref(), Some("MIRI Imaging Test"));
    }

    #[test]
    fn test_title_from_string_source() {
        let dir = TempDir::new().unwrap();
        let path = write_notebook(
            &dir,
            r###"{"cells": [{"cell_type": "markdown", "source": "#hashtag\n# Real Title"}]}"###,
        );
        assert_eq!(notebook_title(&path).as_deref(), Some("Real Title"));
    }

    #[test]
    fn test_no_title_for_malformed_notebook() {
        let dir = TempDir::new().unwrap();
        let path = write_notebook(&dir, "not json at all");
        assert_eq!(notebook_title(&path), None);
        assert_eq!(notebook_title(&dir.path().join("missing.ipynb")), None);
    }
}

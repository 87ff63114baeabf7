//! Title list loader for the lookup mode.
//!
//! Reads a CSV file with a header row. Rows can be restricted to one
//! owner/assignee by matching another column exactly.

use crate::error::{DblpError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Keep only rows whose `column` equals `value`.
#[derive(Debug, Clone)]
pub struct OwnerFilter {
    pub column: String,
    pub value: String,
}

/// Load the titles to look up, in file order, skipping blank titles.
pub fn load_titles<P: AsRef<Path>>(
    path: P,
    title_column: &str,
    owner: Option<&OwnerFilter>,
) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let title_idx = column_index(&headers, title_column)?;
    let owner_idx = owner
        .map(|o| column_index(&headers, &o.column).map(|idx| (idx, o.value.as_str())))
        .transpose()?;

    let mut titles = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if let Some((idx, wanted)) = owner_idx {
            if record.get(idx) != Some(wanted) {
                continue;
            }
        }
        match record.get(title_idx).filter(|t| !t.is_empty()) {
            Some(title) => titles.push(title.to_string()),
            None => debug!(row = row + 2, "Skipping row without title"),
        }
    }

    info!(count = titles.len(), path = ?path, "Loaded titles");
    Ok(titles)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| DblpError::Input(format!("missing column '{}'", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn test_load_all_titles() -> Result<()> {
        let file = csv_file("Title,Owner\nFast VM Migration,alice\n,bob\n\"Scheduling, Revisited\",bob\n");
        let titles = load_titles(file.path(), "title", None)?;
        assert_eq!(titles, vec!["Fast VM Migration", "Scheduling, Revisited"]);
        Ok(())
    }

    #[test]
    fn test_owner_filter() -> Result<()> {
        let file = csv_file("title,owner\nA,alice\nB,bob\nC,alice\n");
        let filter = OwnerFilter {
            column: "owner".to_string(),
            value: "alice".to_string(),
        };
        let titles = load_titles(file.path(), "title", Some(&filter))?;
        assert_eq!(titles, vec!["A", "C"]);
        Ok(())
    }

    #[test]
    fn test_missing_column() {
        let file = csv_file("name,owner\nA,alice\n");
        let err = load_titles(file.path(), "title", None).expect_err("no title column");
        assert!(matches!(err, DblpError::Input(_)));
    }
}

//! CSV output for both modes.
//!
//! Venue crawl rows: `title, venue, year, pages, authors`.
//! Title lookup rows: `title, authors, url`.
//! Authors are joined with ", " into a single field.

use crate::error::Result;
use crate::record::PublicationRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One row of the venue crawl output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueRow {
    pub title: String,
    pub venue: String,
    pub year: Option<i32>,
    pub pages: Option<String>,
    pub authors: String,
}

impl From<&PublicationRecord> for VenueRow {
    fn from(record: &PublicationRecord) -> Self {
        Self {
            title: record.title.clone(),
            venue: record.venue.clone(),
            year: record.year,
            pages: record.page_range.clone(),
            authors: record.authors_joined(),
        }
    }
}

/// One row of the title lookup output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupRow {
    pub title: String,
    pub authors: String,
    pub url: Option<String>,
}

impl From<&PublicationRecord> for LookupRow {
    fn from(record: &PublicationRecord) -> Self {
        Self {
            title: record.title.clone(),
            authors: record.authors_joined(),
            url: record.detail_url.clone(),
        }
    }
}

/// Write venue crawl records; returns the number of rows written.
pub fn write_venue_records(path: &Path, records: &[PublicationRecord]) -> Result<usize> {
    save_csv(path, records.iter().map(VenueRow::from))
}

/// Write title lookup records; returns the number of rows written.
pub fn write_lookup_records(path: &Path, records: &[PublicationRecord]) -> Result<usize> {
    save_csv(path, records.iter().map(LookupRow::from))
}

/// Read a venue crawl file back.
pub fn read_venue_rows(path: &Path) -> Result<Vec<VenueRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<VenueRow>, _>>()?;
    Ok(rows)
}

/// Save rows to a CSV file with a header derived from the row type.
fn save_csv<T: Serialize>(path: &Path, rows: impl Iterator<Item = T>) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_path(path)?;

    let mut count = 0;
    for row in rows {
        wtr.serialize(row)?;
        count += 1;
    }

    wtr.flush()?;
    info!(path = ?path, rows = count, "Saved CSV");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn records() -> Vec<PublicationRecord> {
        vec![
            PublicationRecord::new("Fast VM Migration.", "HPCA")
                .with_year(Some(2020))
                .with_page_range(Some("1-12".to_string()))
                .with_authors(vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()]),
            PublicationRecord::new("Scheduling, \"Revisited\".", "HPCA")
                .with_year(Some(2019))
                .with_authors(vec!["Grace Hopper".to_string()]),
            PublicationRecord::new("Anonymous.", "HPCA").with_year(Some(2019)),
        ]
    }

    #[test]
    fn test_venue_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("data.csv");

        let written = write_venue_records(&path, &records())?;
        assert_eq!(written, 3);

        let rows = read_venue_rows(&path)?;
        let expected: Vec<VenueRow> = records().iter().map(VenueRow::from).collect();
        assert_eq!(rows, expected);
        assert_eq!(rows[0].authors, "Ada Lovelace, Alan Turing");
        assert_eq!(rows[1].pages, None);
        Ok(())
    }

    #[test]
    fn test_venue_header() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("data.csv");
        write_venue_records(&path, &records())?;

        let content = std::fs::read_to_string(&path)?;
        assert_eq!(content.lines().next(), Some("title,venue,year,pages,authors"));
        Ok(())
    }

    #[test]
    fn test_lookup_output() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("lookup.csv");
        let records = vec![
            PublicationRecord::new("Fast VM Migration.", "HPCA")
                .with_authors(vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()])
                .with_detail_url(Some("https://doi.org/10.1/x".to_string())),
            PublicationRecord::new("Unlinked.", ""),
        ];
        write_lookup_records(&path, &records)?;

        let content = std::fs::read_to_string(&path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "title,authors,url",
                "Fast VM Migration.,\"Ada Lovelace, Alan Turing\",https://doi.org/10.1/x",
                "Unlinked.,,",
            ]
        );
        Ok(())
    }
}

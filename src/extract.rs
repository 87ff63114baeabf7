//! Normalize a raw page entry into a [`PublicationRecord`].

use crate::dblp::RawEntry;
use crate::error::{DblpError, Result};
use crate::markup::flatten_text;
use crate::record::PublicationRecord;
use tracing::{debug, warn};

/// Assemble a record (title, venue, year, pages, authors) from `entry`.
///
/// A missing title is an error; a missing venue becomes an empty string and
/// missing pagination is logged and left absent.
pub fn extract_record(entry: &RawEntry, year: Option<i32>) -> Result<PublicationRecord> {
    let title = entry
        .title
        .as_ref()
        .map(flatten_text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(DblpError::MissingField("title"))?;

    let venue = match &entry.venue {
        Some(venue) => venue.clone(),
        None => {
            debug!(title = %title, "Paper with no venue");
            String::new()
        }
    };

    if entry.pagination.is_none() {
        warn!(venue = %venue, title = %title, "Paper with no pagination");
    }

    Ok(PublicationRecord::new(title, venue)
        .with_year(year)
        .with_page_range(entry.pagination.clone())
        .with_authors(entry.authors.clone()))
}

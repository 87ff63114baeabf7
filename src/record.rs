//! Publication record shared by the venue crawler and the title lookup.

use crate::scoring::KeywordWeights;
use serde::{Deserialize, Serialize};

/// One normalized bibliographic entry.
///
/// Built in two steps: construct from title and venue, then attach authors
/// and either a relevance score (venue crawl) or a detail URL (title lookup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationRecord {
    /// Paper title, flattened from nested markup
    pub title: String,
    /// Container/stream name as reported by DBLP
    pub venue: String,
    /// Publication year taken from the preceding year marker
    pub year: Option<i32>,
    /// Page range, e.g. "1-12"
    pub page_range: Option<String>,
    /// Authors in source order
    pub authors: Vec<String>,
    /// Sum of matched keyword weights (venue crawl only)
    pub relevance_score: Option<f64>,
    /// Canonical listing URL (title lookup only)
    pub detail_url: Option<String>,
}

impl PublicationRecord {
    pub fn new(title: impl Into<String>, venue: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            venue: venue.into(),
            year: None,
            page_range: None,
            authors: Vec::new(),
            relevance_score: None,
            detail_url: None,
        }
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    pub fn with_page_range(mut self, pages: Option<String>) -> Self {
        self.page_range = pages;
        self
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    pub fn with_detail_url(mut self, url: Option<String>) -> Self {
        self.detail_url = url;
        self
    }

    /// Compute and attach the relevance score for this record's title.
    pub fn scored(mut self, keywords: &KeywordWeights) -> Self {
        self.relevance_score = Some(keywords.score(&self.title));
        self
    }

    /// Authors joined the way they are written to the output file.
    pub fn authors_joined(&self) -> String {
        self.authors.join(", ")
    }
}

impl std::fmt::Display for PublicationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}, {} {}",
            self.title,
            self.page_range.as_deref().unwrap_or("-"),
            self.venue,
            self.year.map(|y| y.to_string()).unwrap_or_default()
        )
    }
}

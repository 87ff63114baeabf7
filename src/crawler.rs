//! Venue crawler: walks DBLP result pages for one conference stream.
//!
//! Pages are requested one at a time with results sorted newest first. The
//! crawl ends when a year marker older than the start year appears, when a
//! page comes back empty, or when the optional page limit is reached.

use crate::dblp::{parse_page, PageItem, RawEntry, SearchBackend, SearchQuery, CONFERENCE_KINDS, PAGE_SIZE};
use crate::error::Result;
use crate::extract::extract_record;
use crate::record::PublicationRecord;
use crate::scoring::{qualifies, KeywordWeights};
use crate::summary::BatchSummary;
use crate::venue::{VenueMatchMode, VenueMatcher};
use tracing::{debug, error, info, warn};

/// Crawl settings shared by every venue of a run.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Oldest publication year to keep
    pub start_year: i32,
    /// Minimum relevance score (inclusive)
    pub threshold: f64,
    pub match_mode: VenueMatchMode,
    /// Safety bound on requested pages; `None` means unbounded
    pub max_pages: Option<u32>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            start_year: 2018,
            threshold: 0.4,
            match_mode: VenueMatchMode::Loose,
            max_pages: None,
        }
    }
}

/// Why a venue crawl stopped requesting pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A year marker older than the start year was reached
    BelowStartYear(i32),
    /// The source returned a page without entries
    EmptyPage,
    /// `max_pages` pages were requested
    PageLimit,
}

/// Per-venue counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages: u32,
    pub entries: usize,
    pub malformed: usize,
    pub venue_rejected: usize,
    pub below_threshold: usize,
}

/// Result of crawling one venue.
#[derive(Debug, Clone)]
pub struct VenueCrawl {
    pub venue: String,
    pub records: Vec<PublicationRecord>,
    pub stats: CrawlStats,
    pub stop: StopReason,
}

/// Crawl one venue and return its qualifying records in page order.
///
/// A failed request or unparseable page aborts this venue's crawl.
pub async fn crawl_venue<B: SearchBackend>(
    backend: &B,
    venue: &str,
    keywords: &KeywordWeights,
    options: &CrawlOptions,
) -> Result<VenueCrawl> {
    let matcher = VenueMatcher::new(venue, options.match_mode)?;
    let query = SearchQuery::venue_stream(keywords, venue);
    debug!(venue = venue, query = %query.text, mode = ?options.match_mode, "Starting venue crawl");

    let mut records = Vec::new();
    let mut stats = CrawlStats::default();
    let mut year: Option<i32> = None;
    let mut page: u32 = 0;

    let stop = loop {
        if let Some(limit) = options.max_pages {
            if page >= limit {
                warn!(venue = venue, max_pages = limit, "Page limit reached before end of results");
                break StopReason::PageLimit;
            }
        }

        info!(venue = venue, page = page + 1, size = PAGE_SIZE, "Requesting page");
        let html = backend.fetch_page(&query.at_page(page)).await?;
        let items = parse_page(&html, CONFERENCE_KINDS)?;
        stats.pages += 1;

        if items.is_empty() {
            warn!(venue = venue, "No more papers can be found");
            break StopReason::EmptyPage;
        }

        let mut older_than_start = None;
        for item in items {
            match item {
                PageItem::Year(marker) => {
                    debug!(year = marker, "Found year marker");
                    year = Some(marker);
                    if marker < options.start_year {
                        info!(
                            venue = venue,
                            year = marker,
                            start_year = options.start_year,
                            "Reached year before start year, finishing"
                        );
                        older_than_start = Some(marker);
                        break;
                    }
                }
                PageItem::Entry(entry) => {
                    stats.entries += 1;
                    if let Some(record) =
                        consider_entry(&entry, year, &matcher, keywords, options, &mut stats)
                    {
                        records.push(record);
                    }
                }
            }
        }

        if let Some(marker) = older_than_start {
            break StopReason::BelowStartYear(marker);
        }
        page += 1;
    };

    info!(
        venue = venue,
        found = records.len(),
        pages = stats.pages,
        entries = stats.entries,
        rejected_venue = stats.venue_rejected,
        below_threshold = stats.below_threshold,
        malformed = stats.malformed,
        "Venue crawl complete"
    );

    Ok(VenueCrawl {
        venue: venue.to_string(),
        records,
        stats,
        stop,
    })
}

/// Venue filter, extraction and scoring for one entry.
fn consider_entry(
    entry: &RawEntry,
    year: Option<i32>,
    matcher: &VenueMatcher,
    keywords: &KeywordWeights,
    options: &CrawlOptions,
    stats: &mut CrawlStats,
) -> Option<PublicationRecord> {
    let venue = entry.venue.as_deref().unwrap_or_default();
    if !matcher.matches(venue) {
        warn!(venue = venue, "Ignore venue");
        stats.venue_rejected += 1;
        return None;
    }

    let record = match extract_record(entry, year) {
        Ok(record) => record,
        Err(e) => {
            warn!(venue = venue, error = %e, "Skipping malformed entry");
            stats.malformed += 1;
            return None;
        }
    };

    if year.is_none() {
        warn!(title = %record.title, "Paper listed before any year marker");
    }

    let record = record.scored(keywords);
    let score = record.relevance_score.unwrap_or_default();
    if qualifies(score, options.threshold) {
        debug!(record = %record, score = score, "Keeping paper");
        Some(record)
    } else {
        stats.below_threshold += 1;
        None
    }
}

/// Crawl several venues in sequence.
///
/// A venue whose crawl fails is logged and recorded in the summary; the
/// remaining venues are still crawled.
pub async fn crawl_venues<B: SearchBackend>(
    backend: &B,
    venues: &[String],
    keywords: &KeywordWeights,
    options: &CrawlOptions,
) -> (Vec<PublicationRecord>, BatchSummary) {
    let mut summary = BatchSummary::new("venue");
    let mut records = Vec::new();

    for venue in venues {
        match crawl_venue(backend, venue, keywords, options).await {
            Ok(crawl) => {
                summary.record_success(crawl.records.len());
                records.extend(crawl.records);
            }
            Err(e) => {
                error!(venue = %venue, error = %e, "Venue crawl failed");
                summary.record_failure(venue, &e);
            }
        }
    }

    (records, summary)
}

//! Title lookup: find the DBLP listing for each paper in a known list.

use crate::dblp::{parse_page, PageItem, SearchBackend, SearchQuery, LOOKUP_KINDS};
use crate::error::{DblpError, Result};
use crate::extract::extract_record;
use crate::record::PublicationRecord;
use crate::summary::BatchSummary;
use tracing::{debug, error, info, warn};

/// Look up one title.
///
/// Every returned entry whose title contains `title` (case-insensitive) is
/// kept, so an empty result means no match and more than one means the title
/// is listed several times (e.g. a reprint and the full version).
pub async fn lookup_title<B: SearchBackend>(backend: &B, title: &str) -> Result<Vec<PublicationRecord>> {
    let query = SearchQuery::title(title);
    if query.text.is_empty() {
        return Err(DblpError::Input("empty title".to_string()));
    }
    let needle = query.text.to_lowercase();

    let html = backend.fetch_page(&query).await?;
    let entries: Vec<_> = parse_page(&html, LOOKUP_KINDS)?
        .into_iter()
        .filter_map(|item| match item {
            PageItem::Entry(entry) => Some(entry),
            PageItem::Year(_) => None,
        })
        .collect();
    debug!(title = %query.text, count = entries.len(), "Found entries");

    let mut records = Vec::new();
    for entry in &entries {
        let record = match extract_record(entry, None) {
            Ok(record) => record,
            Err(e) => {
                warn!(title = %query.text, error = %e, "Skipping malformed entry");
                continue;
            }
        };

        if !record.title.to_lowercase().contains(&needle) {
            debug!(query = %query.text, found = %record.title, "Entry title does not contain query");
            continue;
        }

        if entry.detail_url.is_none() {
            warn!(title = %record.title, "Cannot find the url of this paper");
        }
        records.push(record.with_detail_url(entry.detail_url.clone()));
    }

    match records.len() {
        0 => error!(title = %query.text, returned = entries.len(), "No matching paper found"),
        1 => {}
        n => warn!(title = %query.text, matches = n, "More than one paper found, keeping all"),
    }

    Ok(records)
}

/// Look up every title in order.
///
/// A title whose lookup fails is logged and recorded in the summary; the
/// batch continues with the next title.
pub async fn lookup_titles<B: SearchBackend>(
    backend: &B,
    titles: &[String],
) -> (Vec<PublicationRecord>, BatchSummary) {
    let mut summary = BatchSummary::new("title");
    let mut records = Vec::new();

    for (idx, title) in titles.iter().enumerate() {
        info!(index = idx + 1, total = titles.len(), title = %title, "Looking up title");
        match lookup_title(backend, title).await {
            Ok(found) => {
                match found.len() {
                    0 => summary.not_found += 1,
                    1 => {}
                    _ => summary.ambiguous += 1,
                }
                summary.record_success(found.len());
                records.extend(found);
            }
            Err(e) => {
                error!(title = %title, error = %e, "Title lookup failed");
                summary.record_failure(title, &e);
            }
        }
    }

    (records, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{entry_li, page, EntryFixture, MockBackend};

    const TITLE: &str = "Fast VM Migration";

    #[tokio::test]
    async fn test_unique_match() {
        let backend = MockBackend::new().with_page(
            TITLE,
            0,
            page(&[entry_li(
                &EntryFixture::new("Fast <i>VM</i> Migration.", "HPCA")
                    .url("https://doi.org/10.1/fast")
                    .authors(&["Grace Hopper"]),
            )]),
        );

        let records = lookup_title(&backend, TITLE).await.expect("lookup succeeds");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Fast VM Migration.");
        assert_eq!(records[0].authors, vec!["Grace Hopper"]);
        assert_eq!(records[0].detail_url.as_deref(), Some("https://doi.org/10.1/fast"));
        assert!(records[0].relevance_score.is_none());
        assert!(records[0].year.is_none());
    }

    #[tokio::test]
    async fn test_match_is_case_insensitive_substring() {
        let backend = MockBackend::new().with_page(
            "fast vm migration",
            0,
            page(&[entry_li(&EntryFixture::new(
                "Fast VM Migration for Clouds: Extended Version.",
                "TOCS",
            )
            .kind("article"))]),
        );

        let records = lookup_title(&backend, "fast vm migration").await.expect("lookup succeeds");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].venue, "TOCS");
    }

    #[tokio::test]
    async fn test_no_match_produces_no_record() {
        let backend = MockBackend::new().with_page(
            TITLE,
            0,
            page(&[entry_li(&EntryFixture::new("Slow Disk Migration.", "HPCA"))]),
        );
        assert!(lookup_title(&backend, TITLE).await.expect("lookup succeeds").is_empty());

        let empty = MockBackend::new();
        assert!(lookup_title(&empty, TITLE).await.expect("lookup succeeds").is_empty());
    }

    #[tokio::test]
    async fn test_multiple_matches_kept() {
        let backend = MockBackend::new().with_page(
            TITLE,
            0,
            page(&[
                entry_li(&EntryFixture::new("Fast VM Migration.", "CoRR").kind("article")),
                entry_li(&EntryFixture::new("Fast VM Migration.", "HPCA").url("https://doi.org/10.1/f")),
            ]),
        );

        let records = lookup_title(&backend, TITLE).await.expect("lookup succeeds");
        assert_eq!(records.len(), 2);
        assert!(records[0].detail_url.is_none());
        assert_eq!(records[1].detail_url.as_deref(), Some("https://doi.org/10.1/f"));
    }

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let backend = MockBackend::new();
        assert!(lookup_title(&backend, "   ").await.is_err());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_batch_continues_after_failure() {
        let backend = MockBackend::new()
            .failing_on("Broken Title")
            .with_page(TITLE, 0, page(&[entry_li(&EntryFixture::new("Fast VM Migration.", "HPCA"))]))
            .with_page(
                "Twice",
                0,
                page(&[
                    entry_li(&EntryFixture::new("Twice.", "CoRR")),
                    entry_li(&EntryFixture::new("Twice.", "HPCA")),
                ]),
            );

        let titles = vec![
            "Broken Title".to_string(),
            TITLE.to_string(),
            "Missing".to_string(),
            "Twice".to_string(),
        ];
        let (records, summary) = lookup_titles(&backend, &titles).await;

        assert_eq!(records.len(), 3);
        assert_eq!(summary.items, 4);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.not_found, 1);
        assert_eq!(summary.ambiguous, 1);
        assert_eq!(summary.records, 3);
        assert_eq!(backend.calls().len(), 4);
    }
}

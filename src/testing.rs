//! Offline fixtures: result-page HTML builders and a scripted backend.

use crate::dblp::{SearchBackend, SearchQuery};
use crate::error::{DblpError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Builder for one `li.entry` element.
pub(crate) struct EntryFixture {
    kind: String,
    title: Option<String>,
    venue: Option<String>,
    authors: Vec<String>,
    pages: Option<String>,
    url: Option<String>,
}

impl EntryFixture {
    pub(crate) fn new(title_html: &str, venue: &str) -> Self {
        Self {
            kind: "inproceedings".to_string(),
            title: Some(title_html.to_string()),
            venue: Some(venue.to_string()),
            authors: vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
            pages: None,
            url: None,
        }
    }

    pub(crate) fn untitled(venue: &str) -> Self {
        Self {
            title: None,
            ..Self::new("", venue)
        }
    }

    pub(crate) fn kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    pub(crate) fn pages(mut self, pages: &str) -> Self {
        self.pages = Some(pages.to_string());
        self
    }

    pub(crate) fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub(crate) fn authors(mut self, authors: &[&str]) -> Self {
        self.authors = authors.iter().map(|a| a.to_string()).collect();
        self
    }
}

pub(crate) fn year_li(year: &str) -> String {
    format!(r#"<li class="year">{}</li>"#, year)
}

pub(crate) fn entry_li(entry: &EntryFixture) -> String {
    let nav = match &entry.url {
        Some(url) => format!(
            r#"<nav class="publ"><ul><li class="drop-down"><div class="head"><a href="{}"><img alt=""></a></div></li></ul></nav>"#,
            url
        ),
        None => r#"<nav class="publ"><ul><li class="drop-down"></li></ul></nav>"#.to_string(),
    };

    let authors = entry
        .authors
        .iter()
        .map(|a| {
            format!(
                r#"<span itemprop="author" itemscope><a href="https://dblp.org/pid/x" itemprop="url"><span itemprop="name">{}</span></a></span>"#,
                a
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let title = entry
        .title
        .as_ref()
        .map(|t| format!(r#"<span class="title" itemprop="name">{}</span> "#, t))
        .unwrap_or_default();
    let venue = entry
        .venue
        .as_ref()
        .map(|v| {
            format!(
                r#"<a href="https://dblp.org/db/conf/x"><span itemprop="isPartOf" itemscope><span itemprop="name">{}</span></span></a> "#,
                v
            )
        })
        .unwrap_or_default();
    let pages = entry
        .pages
        .as_ref()
        .map(|p| format!(r#": <span itemprop="pagination">{}</span>"#, p))
        .unwrap_or_default();

    format!(
        r#"<li class="entry {kind} toc">{nav}<cite class="data tts-content" itemprop="headline">{authors}:<br>{title}{venue}{pages}</cite></li>"#,
        kind = entry.kind,
        nav = nav,
        authors = authors,
        title = title,
        venue = venue,
        pages = pages,
    )
}

pub(crate) fn page(items: &[String]) -> String {
    format!(
        r#"<html><body><ul class="publ-list">{}</ul></body></html>"#,
        items.concat()
    )
}

/// Backend answering from a fixed table of pages.
///
/// Unknown pages come back empty; queries registered as failing return an
/// HTTP 503 error.
#[derive(Default)]
pub(crate) struct MockBackend {
    pages: HashMap<(String, u32), String>,
    failing: HashSet<String>,
    calls: Mutex<Vec<SearchQuery>>,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(mut self, text: &str, page_index: u32, html: String) -> Self {
        self.pages.insert((text.to_string(), page_index), html);
        self
    }

    pub(crate) fn failing_on(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<SearchQuery> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl SearchBackend for MockBackend {
    async fn fetch_page(&self, query: &SearchQuery) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.clone());
        }
        if self.failing.contains(&query.text) {
            return Err(DblpError::Api {
                code: 503,
                message: "HTTP error: 503 Service Unavailable".to_string(),
            });
        }
        Ok(self
            .pages
            .get(&(query.text.clone(), query.page))
            .cloned()
            .unwrap_or_else(|| page(&[])))
    }
}

//! DBLP search endpoint: query building, fetching and page parsing.
//!
//! The `inc` search endpoint returns an HTML fragment: a flat list of
//! `li.year` markers interleaved with `li.entry` publications, each carrying a
//! `cite` element whose children are tagged with schema.org `itemprop` roles.

use crate::error::{DblpError, OptionExt, Result};
use crate::markup::Node;
use crate::scoring::KeywordWeights;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default DBLP incremental search URL
pub const DEFAULT_DBLP_URL: &str = "https://dblp.org/search/publ/inc";

/// Results requested per page (`h` parameter)
pub const PAGE_SIZE: u32 = 1000;

/// Sort order: year descending, then venue, then pages (`s` parameter)
pub const SORT_ORDER: &str = "ydvspc";

/// Entry kinds accepted by the venue crawl
pub const CONFERENCE_KINDS: &[&str] = &["inproceedings"];

/// Entry kinds accepted by the title lookup
pub const LOOKUP_KINDS: &[&str] = &["inproceedings", "article"];

/// User agent string for requests
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// One page request against the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text query (`q`)
    pub text: String,
    /// Zero-based page index (`b`)
    pub page: u32,
}

impl SearchQuery {
    /// Keyword disjunction scoped to one conference stream, first page.
    pub fn venue_stream(keywords: &KeywordWeights, venue: &str) -> Self {
        let stream = format!("streamid:conf/{}:", venue.trim());
        let text = if keywords.is_empty() {
            stream
        } else {
            format!("{} {}", keywords.disjunction(), stream)
        };
        Self { text, page: 0 }
    }

    /// Single-page query for one known title.
    pub fn title(title: &str) -> Self {
        Self {
            text: title.trim().to_string(),
            page: 0,
        }
    }

    pub fn at_page(&self, page: u32) -> Self {
        Self {
            text: self.text.clone(),
            page,
        }
    }
}

/// Source of raw result pages.
///
/// Calls are awaited one at a time; implementations need not be shareable.
#[allow(async_fn_in_trait)]
pub trait SearchBackend {
    /// Fetch the HTML for one result page.
    async fn fetch_page(&self, query: &SearchQuery) -> Result<String>;
}

/// HTTP client options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Search endpoint URL
    pub base_url: String,
    /// Proxy URL (e.g., "http://127.0.0.1:7890")
    pub proxy: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DBLP_URL.to_string(),
            proxy: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// reqwest-backed [`SearchBackend`] for dblp.org.
pub struct DblpClient {
    client: reqwest::Client,
    base_url: String,
}

impl DblpClient {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        Url::parse(&options.base_url)
            .map_err(|e| DblpError::Config(format!("Invalid base URL '{}': {}", options.base_url, e)))?;

        Ok(Self {
            client: build_http_client(options)?,
            base_url: options.base_url.clone(),
        })
    }
}

impl SearchBackend for DblpClient {
    async fn fetch_page(&self, query: &SearchQuery) -> Result<String> {
        let url = build_search_url(&self.base_url, query)?;
        debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(url.as_str())
            .header("Accept", "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DblpError::Api {
                code: status.as_u16(),
                message: format!("HTTP error: {}", status),
            });
        }

        response.text().await.map_err(DblpError::Network)
    }
}

/// Build HTTP client with optional proxy
fn build_http_client(options: &ClientOptions) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(options.timeout);

    if let Some(proxy_url) = options.proxy.as_deref() {
        let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
            DblpError::Config(format!("Invalid proxy URL '{}': {}", proxy_url, e))
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| DblpError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Build the search URL for one page.
pub fn build_search_url(base_url: &str, query: &SearchQuery) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| DblpError::Config(format!("Invalid base URL: {}", e)))?;

    url.query_pairs_mut()
        .append_pair("q", &query.text)
        .append_pair("s", SORT_ORDER)
        .append_pair("h", &PAGE_SIZE.to_string())
        .append_pair("b", &query.page.to_string());

    Ok(url)
}

/// A publication entry as found on the page, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEntry {
    /// Entry kind class, e.g. "inproceedings"
    pub kind: String,
    /// Title markup (`cite .title`)
    pub title: Option<Node>,
    /// Author names in source order
    pub authors: Vec<String>,
    /// `isPartOf` text
    pub venue: Option<String>,
    /// `pagination` text
    pub pagination: Option<String>,
    /// First link under the entry's navigation block
    pub detail_url: Option<String>,
}

/// One list item of a result page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageItem {
    /// Start of the entries published in this year
    Year(i32),
    /// A publication of one of the requested kinds
    Entry(RawEntry),
}

struct Selectors {
    item: Selector,
    cite: Selector,
    title: Selector,
    author: Selector,
    author_link: Selector,
    venue: Selector,
    pagination: Selector,
    nav_path: Vec<Selector>,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            item: parse_selector("li")?,
            cite: parse_selector("cite")?,
            title: parse_selector(".title")?,
            author: parse_selector(r#"[itemprop="author"]"#)?,
            author_link: parse_selector("a")?,
            venue: parse_selector(r#"[itemprop="isPartOf"]"#)?,
            pagination: parse_selector(r#"[itemprop="pagination"]"#)?,
            nav_path: ["nav", "ul", "li", "div", "a"]
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<Vec<_>>>()?,
        })
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| DblpError::Parse(e.to_string()))
}

/// Parse a result page into year markers and entries of the given kinds.
///
/// Other list items are ignored. A year marker whose text is not a year is
/// skipped with a warning.
pub fn parse_page(html: &str, kinds: &[&str]) -> Result<Vec<PageItem>> {
    let document = Html::parse_document(html);
    let selectors = Selectors::new()?;

    let mut items = Vec::new();
    for li in document.select(&selectors.item) {
        let classes: Vec<&str> = li.value().classes().collect();

        if classes.contains(&"year") {
            match parse_year(&element_text(li)) {
                Ok(year) => items.push(PageItem::Year(year)),
                Err(e) => warn!(error = %e, "Skipping malformed year marker"),
            }
            continue;
        }

        if let Some(kind) = kinds.iter().find(|k| classes.contains(*k)) {
            items.push(PageItem::Entry(parse_entry(li, kind, &selectors)));
        }
    }

    Ok(items)
}

fn parse_year(text: &str) -> Result<i32> {
    text.trim()
        .parse::<i32>()
        .ok()
        .ok_or_parse(&format!("not a year: '{}'", text.trim()))
}

fn parse_entry(li: ElementRef<'_>, kind: &str, selectors: &Selectors) -> RawEntry {
    let mut entry = RawEntry {
        kind: kind.to_string(),
        detail_url: first_descendant_chain(li, &selectors.nav_path)
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string),
        ..Default::default()
    };

    let Some(cite) = li.select(&selectors.cite).next() else {
        return entry;
    };

    entry.title = cite.select(&selectors.title).next().map(Node::from_element);

    entry.authors = cite
        .select(&selectors.author)
        .filter_map(|author| {
            let name = author
                .select(&selectors.author_link)
                .next()
                .map(element_text)
                .unwrap_or_else(|| element_text(author));
            Some(name.trim().to_string()).filter(|n| !n.is_empty())
        })
        .collect();

    entry.venue = cite
        .select(&selectors.venue)
        .next()
        .map(|v| element_text(v).trim().to_string());

    entry.pagination = cite
        .select(&selectors.pagination)
        .next()
        .map(|p| element_text(p).trim().to_string())
        .filter(|p| !p.is_empty());

    entry
}

/// Follow `nav → ul → li → div → a`, taking the first match at each step.
fn first_descendant_chain<'a>(root: ElementRef<'a>, path: &[Selector]) -> Option<ElementRef<'a>> {
    path.iter()
        .try_fold(root, |current, selector| current.select(selector).next())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

//! # rustdblp
//!
//! DBLP literature discovery: crawl a conference stream for keyword-relevant
//! papers, or look up a list of known titles.
//!
//! ## Modules
//!
//! - [`crawler`] - Venue crawl loop with year/empty-page stop conditions
//! - [`lookup`] - Per-title lookup
//! - [`dblp`] - Search endpoint client and result page parsing
//! - [`extract`] / [`markup`] - Record extraction from nested title markup
//! - [`scoring`] / [`venue`] - Keyword relevance and venue-name matching
//! - [`output`] / [`input`] - CSV files
//! - [`config`] / [`logging`] - TOML settings and tracing set-up
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustdblp::config::Settings;
//! use rustdblp::crawler::{crawl_venue, CrawlOptions};
//! use rustdblp::dblp::{ClientOptions, DblpClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::default();
//!     let client = DblpClient::new(&ClientOptions::default())?;
//!     let crawl = crawl_venue(&client, "hpca", &settings.keywords, &CrawlOptions::default()).await?;
//!     println!("Found {} papers", crawl.records.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod dblp;
pub mod error;
pub mod extract;
pub mod input;
pub mod logging;
pub mod lookup;
pub mod markup;
pub mod output;
pub mod record;
pub mod scoring;
pub mod summary;
pub mod venue;

#[cfg(test)]
mod testing;

pub use error::{DblpError, Result};
pub use record::PublicationRecord;

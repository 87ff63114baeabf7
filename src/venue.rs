//! Venue-name matching strategies.
//!
//! DBLP's stream filter also returns co-located events (workshops, companion
//! volumes), so every publication's container name is checked again locally.

use crate::error::{DblpError, Result};
use regex::{Regex, RegexBuilder};

/// How strictly a container-venue string must match the venue identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VenueMatchMode {
    /// Venue identifier appears anywhere, case-insensitively
    #[default]
    Loose,
    /// As loose, and the venue string must not mention "workshop"
    Strict,
}

/// Compiled matcher for one venue identifier.
#[derive(Debug, Clone)]
pub struct VenueMatcher {
    mode: VenueMatchMode,
    venue: Regex,
    workshop: Regex,
}

impl VenueMatcher {
    pub fn new(venue_id: &str, mode: VenueMatchMode) -> Result<Self> {
        let venue_id = venue_id.trim();
        if venue_id.is_empty() {
            return Err(DblpError::Config("venue identifier is empty".to_string()));
        }
        Ok(Self {
            mode,
            venue: case_insensitive(&regex::escape(venue_id))?,
            workshop: case_insensitive("workshop")?,
        })
    }

    pub fn mode(&self) -> VenueMatchMode {
        self.mode
    }

    /// Whether `venue` (as reported in a result entry) belongs to this venue.
    pub fn matches(&self, venue: &str) -> bool {
        match self.mode {
            VenueMatchMode::Loose => self.venue.is_match(venue),
            VenueMatchMode::Strict => !self.workshop.is_match(venue) && self.venue.is_match(venue),
        }
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| DblpError::Config(format!("Invalid venue pattern '{}': {}", pattern, e)))
}

//! TOML configuration: keyword weights, venue groups and crawl defaults.
//!
//! Files cascade from the platform config directory, then `./.rustdblp.toml`,
//! then an explicit `--config` path. Later files override earlier ones key by
//! key; command-line flags override all of them.

use crate::dblp::DEFAULT_DBLP_URL;
use crate::error::{DblpError, Result};
use crate::scoring::KeywordWeights;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default oldest year kept by the venue crawl
pub const DEFAULT_START_YEAR: i32 = 2018;

/// Default inclusive score threshold
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// On-disk configuration. All fields are optional so partial files work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub threshold: Option<f64>,
    pub start_year: Option<i32>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_pages: Option<u32>,
    pub keywords: Option<BTreeMap<String, f64>>,
    pub venue_groups: Option<BTreeMap<String, Vec<String>>>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub threshold: f64,
    pub start_year: i32,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_pages: Option<u32>,
    pub keywords: KeywordWeights,
    pub venue_groups: BTreeMap<String, Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            start_year: DEFAULT_START_YEAR,
            base_url: DEFAULT_DBLP_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_pages: None,
            keywords: default_keywords(),
            venue_groups: default_venue_groups(),
        }
    }
}

impl Settings {
    /// Apply a config file on top of the defaults.
    pub fn from_config(config: ConfigFile) -> Result<Self> {
        let defaults = Self::default();

        let keywords = match config.keywords {
            Some(map) => {
                if let Some((k, w)) = map.iter().find(|(_, w)| !w.is_finite()) {
                    return Err(DblpError::Config(format!("keyword '{}' has non-finite weight {}", k, w)));
                }
                KeywordWeights::from(map)
            }
            None => defaults.keywords,
        };

        Ok(Self {
            threshold: config.threshold.unwrap_or(defaults.threshold),
            start_year: config.start_year.unwrap_or(defaults.start_year),
            base_url: config.base_url.unwrap_or(defaults.base_url),
            timeout_secs: config.timeout_secs.unwrap_or(defaults.timeout_secs),
            max_pages: config.max_pages.or(defaults.max_pages),
            keywords,
            venue_groups: config.venue_groups.unwrap_or(defaults.venue_groups),
        })
    }

    /// Venue identifiers of a named group (case-insensitive).
    pub fn venue_group(&self, name: &str) -> Result<&[String]> {
        self.venue_groups
            .iter()
            .find(|(group, _)| group.eq_ignore_ascii_case(name))
            .map(|(_, venues)| venues.as_slice())
            .ok_or_else(|| {
                let known: Vec<&str> = self.venue_groups.keys().map(String::as_str).collect();
                DblpError::Config(format!(
                    "unknown venue group '{}' (known: {})",
                    name,
                    known.join(", ")
                ))
            })
    }
}

/// Keyword weights used when no config sets them.
pub fn default_keywords() -> KeywordWeights {
    KeywordWeights::from_pairs([("virtual", 0.2), ("machine", 0.2), ("vm", 0.2)])
}

/// Built-in venue groups (`ipps` is IPDPS).
pub fn default_venue_groups() -> BTreeMap<String, Vec<String>> {
    let groups: [(&str, &[&str]); 5] = [
        (
            "ARCH",
            &[
                "hpca", "micro", "sc", "asplos", "isca", "usenix", "eurosys", "socc", "spaa",
                "cluster", "icdcs", "sigmetrics", "icpp", "ipps", "performance", "hpdc", "europar",
            ],
        ),
        ("NET", &["infocom", "iwqos"]),
        ("SOFT", &["sosp", "osdi", "icsoc", "icws", "middleware"]),
        (
            "DM",
            &["sigmod", "kdd", "icde", "cikm", "wsdm", "dasfaa", "pkdd", "iswc", "icdm", "cidr"],
        ),
        ("AI", &["aaai", "nips", "icml", "ijcai", "iclr"]),
    ];

    groups
        .iter()
        .map(|(name, venues)| {
            (
                name.to_string(),
                venues.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

/// Platform config path: `<config_dir>/rustdblp/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rustdblp").join("config.toml"))
}

/// Load the config cascade. An explicit path must exist and parse; the
/// implicit locations are skipped when absent.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    let mut config = ConfigFile::default();

    let implicit = [config_path(), Some(PathBuf::from(".rustdblp.toml"))];
    for path in implicit.iter().flatten() {
        if path.exists() {
            config = merge(config, load_from_path(path)?);
        }
    }

    if let Some(path) = explicit {
        config = merge(config, load_from_path(path)?);
    }

    Ok(config)
}

/// Load a config from a specific path.
pub fn load_from_path(path: &Path) -> Result<ConfigFile> {
    debug!(path = ?path, "Loading config file");
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        threshold: overlay.threshold.or(base.threshold),
        start_year: overlay.start_year.or(base.start_year),
        base_url: overlay.base_url.or(base.base_url),
        timeout_secs: overlay.timeout_secs.or(base.timeout_secs),
        max_pages: overlay.max_pages.or(base.max_pages),
        keywords: overlay.keywords.or(base.keywords),
        venue_groups: overlay.venue_groups.or(base.venue_groups),
    }
}

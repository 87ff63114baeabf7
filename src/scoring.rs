//! Keyword relevance scoring.
//!
//! A title's score is the sum of the weights of every keyword that occurs in
//! the lower-cased title. Each keyword counts once no matter how often it
//! occurs, overlapping keywords all count, and there is no normalization or cap.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keyword → weight table used both to build the server-side query and to
/// score titles. Keywords are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct KeywordWeights {
    weights: BTreeMap<String, f64>,
}

impl KeywordWeights {
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let weights = pairs
            .into_iter()
            .map(|(k, w)| (k.as_ref().trim().to_lowercase(), w))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        Self { weights }
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, w)| (k.as_str(), *w))
    }

    /// Relevance score of `title`.
    pub fn score(&self, title: &str) -> f64 {
        let title = title.to_lowercase();
        self.weights
            .iter()
            .filter(|(keyword, _)| title.contains(keyword.as_str()))
            .map(|(_, weight)| weight)
            .sum()
    }

    /// All keywords OR'd together in DBLP query syntax: `k1|k2|...`.
    pub fn disjunction(&self) -> String {
        self.weights
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl From<BTreeMap<String, f64>> for KeywordWeights {
    fn from(map: BTreeMap<String, f64>) -> Self {
        Self::from_pairs(map)
    }
}

impl From<KeywordWeights> for BTreeMap<String, f64> {
    fn from(keywords: KeywordWeights) -> Self {
        keywords.weights
    }
}

/// Inclusion rule: the threshold is inclusive.
pub fn qualifies(score: f64, threshold: f64) -> bool {
    score >= threshold
}

/// Parse a `keyword=weight` command-line pair.
pub fn parse_keyword_pair(s: &str) -> std::result::Result<(String, f64), String> {
    let (keyword, weight) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEYWORD=WEIGHT, got '{}'", s))?;
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(format!("empty keyword in '{}'", s));
    }
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|e| format!("invalid weight in '{}': {}", s, e))?;
    if !weight.is_finite() {
        return Err(format!("weight must be finite in '{}'", s));
    }
    Ok((keyword.to_string(), weight))
}

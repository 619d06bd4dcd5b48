//! Canonical tool shape produced by the normalizer

use serde::{Deserialize, Serialize};

/// Pricing classification for a tool listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pricing {
    Free,
    Freemium,
    Paid,
    Unknown,
}

impl Pricing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pricing::Free => "free",
            Pricing::Freemium => "freemium",
            Pricing::Paid => "paid",
            Pricing::Unknown => "unknown",
        }
    }
}

/// Canonical, validated tool record ready for duplicate detection and
/// persistence
///
/// Created by the normalizer from a [`CandidateRecord`]; never exists
/// independently of a run. Admin curation flags are deliberately absent:
/// new rows are written unverified and merges never touch those columns.
///
/// [`CandidateRecord`]: crate::models::CandidateRecord
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedTool {
    pub name: String,
    pub slug: String,
    pub website: String,
    /// Lowercased host with any leading `www.` stripped
    pub website_domain: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub pricing: Pricing,
    pub tags: Vec<String>,
    pub logo_url: Option<String>,
    /// Name of the source this record came from
    pub source: String,
}

//! Candidate records as returned by import sources

use serde::{Deserialize, Serialize};

/// One unprocessed record from an external catalog
///
/// Adapters map their source-specific response shapes into this common raw
/// form. Nothing here is trimmed, validated, or deduplicated; that is the
/// normalizer's job. A candidate only exists for the duration of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: Option<String>,
    pub website: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    /// Free-form pricing text as the source reports it (e.g. "freemium")
    pub pricing: Option<String>,
    pub tags: Vec<String>,
    pub logo_url: Option<String>,
}

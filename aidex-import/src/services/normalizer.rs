//! Candidate normalization
//!
//! Maps a raw source candidate to the canonical tool shape, or skips it.
//! Pure transform: no I/O, no side effects. A candidate missing its name or
//! a well-formed `http(s)://` website is skipped (counted as skipped, not
//! as an error). Missing optional fields stay empty; nothing is invented.

use url::Url;

use crate::models::{CandidateRecord, NormalizedTool, Pricing};

/// Result of normalizing one candidate
#[derive(Debug, Clone)]
pub enum Outcome {
    Tool(NormalizedTool),
    Skip(SkipReason),
}

/// Why a candidate was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingName,
    /// Name contains no alphanumeric characters, so no slug can be derived
    UnusableName,
    MissingWebsite,
    InvalidWebsite,
}

/// Normalize one candidate from the named source
pub fn normalize(candidate: &CandidateRecord, source: &str) -> Outcome {
    let name = match candidate.name.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => return Outcome::Skip(SkipReason::MissingName),
    };

    // An empty slug would alias every such tool onto one row
    let slug = slugify(&name);
    if slug.is_empty() {
        return Outcome::Skip(SkipReason::UnusableName);
    }

    let website = match candidate.website.as_deref().map(str::trim) {
        Some(w) if !w.is_empty() => w.to_string(),
        _ => return Outcome::Skip(SkipReason::MissingWebsite),
    };

    let domain = match normalize_domain(&website) {
        Some(d) => d,
        None => return Outcome::Skip(SkipReason::InvalidWebsite),
    };

    let trim_opt = |v: &Option<String>| -> Option<String> {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let tags = candidate
        .tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    Outcome::Tool(NormalizedTool {
        slug,
        name,
        website,
        website_domain: domain,
        tagline: trim_opt(&candidate.tagline),
        description: trim_opt(&candidate.description),
        pricing: classify_pricing(candidate.pricing.as_deref()),
        tags,
        logo_url: trim_opt(&candidate.logo_url),
        source: source.to_string(),
    })
}

/// Derive a URL slug from a display name
///
/// Lowercase alphanumeric runs joined by single dashes: "ChatGPT 4 Turbo"
/// becomes "chatgpt-4-turbo".
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true; // suppress leading dash

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Normalize a website URL to its comparison domain
///
/// Returns None unless the URL is an absolute, well-formed `http(s)://`
/// link with a host. The host is lowercased and a leading `www.` stripped.
pub fn normalize_domain(website: &str) -> Option<String> {
    let url = Url::parse(website).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    let host = url.host_str()?.to_lowercase();
    let domain = host.strip_prefix("www.").unwrap_or(&host);

    if domain.is_empty() {
        return None;
    }

    Some(domain.to_string())
}

/// Classify free-form pricing text
fn classify_pricing(raw: Option<&str>) -> Pricing {
    let text = match raw {
        Some(t) => t.trim().to_lowercase(),
        None => return Pricing::Unknown,
    };

    if text.is_empty() {
        return Pricing::Unknown;
    }

    if text.contains("freemium") || (text.contains("free") && text.contains("paid")) {
        Pricing::Freemium
    } else if text.contains("free") {
        Pricing::Free
    } else if text.contains("paid") || text.contains("subscription") || text.contains('$') {
        Pricing::Paid
    } else {
        Pricing::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: Option<&str>, website: Option<&str>) -> CandidateRecord {
        CandidateRecord {
            name: name.map(str::to_string),
            website: website.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_name_is_skipped() {
        let outcome = normalize(&candidate(None, Some("https://a.example.com")), "test");
        assert!(matches!(outcome, Outcome::Skip(SkipReason::MissingName)));

        let outcome = normalize(&candidate(Some("   "), Some("https://a.example.com")), "test");
        assert!(matches!(outcome, Outcome::Skip(SkipReason::MissingName)));
    }

    #[test]
    fn test_name_without_alphanumerics_is_skipped() {
        // Would slugify to "" and alias onto any other such name
        let outcome = normalize(&candidate(Some("!!!"), Some("https://bang.example.com")), "test");
        assert!(matches!(outcome, Outcome::Skip(SkipReason::UnusableName)));

        let outcome = normalize(&candidate(Some("---"), Some("https://dash.example.com")), "test");
        assert!(matches!(outcome, Outcome::Skip(SkipReason::UnusableName)));
    }

    #[test]
    fn test_missing_or_invalid_website_is_skipped() {
        let outcome = normalize(&candidate(Some("Tool"), None), "test");
        assert!(matches!(outcome, Outcome::Skip(SkipReason::MissingWebsite)));

        let outcome = normalize(&candidate(Some("Tool"), Some("not a url")), "test");
        assert!(matches!(outcome, Outcome::Skip(SkipReason::InvalidWebsite)));

        let outcome = normalize(&candidate(Some("Tool"), Some("ftp://a.example.com")), "test");
        assert!(matches!(outcome, Outcome::Skip(SkipReason::InvalidWebsite)));
    }

    #[test]
    fn test_valid_candidate_normalizes() {
        let mut raw = candidate(Some("  ChatGPT 4 Turbo "), Some("https://WWW.OpenAI.com/chatgpt"));
        raw.description = Some("  A conversational model.  ".to_string());
        raw.pricing = Some("Freemium".to_string());
        raw.tags = vec![" Chat ".to_string(), String::new()];

        let tool = match normalize(&raw, "aggregator-a") {
            Outcome::Tool(t) => t,
            Outcome::Skip(r) => panic!("unexpected skip: {:?}", r),
        };

        assert_eq!(tool.name, "ChatGPT 4 Turbo");
        assert_eq!(tool.slug, "chatgpt-4-turbo");
        assert_eq!(tool.website_domain, "openai.com");
        assert_eq!(tool.description.as_deref(), Some("A conversational model."));
        assert_eq!(tool.pricing, Pricing::Freemium);
        assert_eq!(tool.tags, vec!["chat".to_string()]);
        assert_eq!(tool.source, "aggregator-a");
    }

    #[test]
    fn test_optional_fields_stay_empty() {
        let tool = match normalize(&candidate(Some("Tool"), Some("https://t.example.com")), "test") {
            Outcome::Tool(t) => t,
            _ => panic!("expected tool"),
        };

        assert!(tool.tagline.is_none());
        assert!(tool.description.is_none());
        assert!(tool.logo_url.is_none());
        assert_eq!(tool.pricing, Pricing::Unknown);
        assert!(tool.tags.is_empty());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Midjourney"), "midjourney");
        assert_eq!(slugify("GPT-4o (omni)"), "gpt-4o-omni");
        assert_eq!(slugify("  spaced   out  "), "spaced-out");
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(
            normalize_domain("https://www.Example.COM/path?x=1"),
            Some("example.com".to_string())
        );
        assert_eq!(
            normalize_domain("http://sub.example.com"),
            Some("sub.example.com".to_string())
        );
        assert_eq!(normalize_domain("example.com"), None);
        assert_eq!(normalize_domain("mailto:hi@example.com"), None);
    }

    #[test]
    fn test_classify_pricing() {
        assert_eq!(classify_pricing(Some("free")), Pricing::Free);
        assert_eq!(classify_pricing(Some("Free + Paid plans")), Pricing::Freemium);
        assert_eq!(classify_pricing(Some("$20/month")), Pricing::Paid);
        assert_eq!(classify_pricing(Some("contact us")), Pricing::Unknown);
        assert_eq!(classify_pricing(None), Pricing::Unknown);
    }
}

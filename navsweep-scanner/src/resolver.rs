use crate::extract::NavEntry;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// A navigation entry whose href resolved to an absolute, comparable URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLink {
    pub label: String,
    pub url: String,
}

impl ResolvedLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

fn has_web_scheme(href: &str) -> bool {
    let lower = href
        .get(..8)
        .unwrap_or(href)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Turn a possibly relative href into an absolute URL using `base_url`.
///
/// Returns `None` for missing, empty, or unresolvable hrefs, and for anything
/// that does not land on http(s) (`mailto:`, `tel:`, `javascript:`...).
/// Absolute http(s) hrefs are returned unchanged.
pub fn resolve_url(href: Option<&str>, base_url: &str) -> Option<String> {
    let href = href?.trim();
    if href.is_empty() {
        return None;
    }

    if has_web_scheme(href) {
        return Some(href.to_string());
    }

    let base = Url::parse(base_url).ok()?;
    let resolved = base.join(href).ok()?;

    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        other => {
            debug!("Ignoring {} link: {}", other, href);
            None
        }
    }
}

/// Resolve each entry against `base_url`, dropping the ones that cannot be resolved.
///
/// Returns the resolved links in input order and the number of dropped entries.
pub fn resolve_entries(entries: &[NavEntry], base_url: &str) -> (Vec<ResolvedLink>, usize) {
    let mut resolved = Vec::with_capacity(entries.len());
    let mut dropped = 0;

    for entry in entries {
        match resolve_url(entry.raw_href.as_deref(), base_url) {
            Some(url) => resolved.push(ResolvedLink::new(entry.label.clone(), url)),
            None => {
                debug!("Dropping unresolvable link '{}' ({:?})", entry.label, entry.raw_href);
                dropped += 1;
            }
        }
    }

    (resolved, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.example.com/ski-holidays/";

    #[test]
    fn test_absolute_href_unchanged() {
        for href in [
            "http://other.example.org/a?b=c",
            "https://www.example.com/ski-deals#top",
            "HTTPS://Example.com/Upper",
        ] {
            assert_eq!(resolve_url(Some(href), BASE).as_deref(), Some(href));
        }
    }

    #[test]
    fn test_missing_or_empty_href() {
        assert_eq!(resolve_url(None, BASE), None);
        assert_eq!(resolve_url(Some(""), BASE), None);
        assert_eq!(resolve_url(Some("   "), BASE), None);
    }

    #[test]
    fn test_path_absolute() {
        assert_eq!(
            resolve_url(Some("/ski-resorts"), BASE).as_deref(),
            Some("https://www.example.com/ski-resorts")
        );
    }

    #[test]
    fn test_path_relative() {
        assert_eq!(
            resolve_url(Some("family"), BASE).as_deref(),
            Some("https://www.example.com/ski-holidays/family")
        );
        assert_eq!(
            resolve_url(Some("../about"), BASE).as_deref(),
            Some("https://www.example.com/about")
        );
    }

    #[test]
    fn test_query_and_fragment_only() {
        assert_eq!(
            resolve_url(Some("?page=2"), BASE).as_deref(),
            Some("https://www.example.com/ski-holidays/?page=2")
        );
        assert_eq!(
            resolve_url(Some("#reviews"), BASE).as_deref(),
            Some("https://www.example.com/ski-holidays/#reviews")
        );
    }

    #[test]
    fn test_relative_keeps_base_scheme_and_host() {
        for href in ["/a", "b/c", "?q=1", "#x", "./d"] {
            let resolved = resolve_url(Some(href), BASE).unwrap();
            assert!(resolved.starts_with("https://www.example.com/"), "{}", resolved);
        }
    }

    #[test]
    fn test_non_web_schemes_are_unresolvable() {
        assert_eq!(resolve_url(Some("mailto:sales@example.com"), BASE), None);
        assert_eq!(resolve_url(Some("tel:+441234567"), BASE), None);
        assert_eq!(resolve_url(Some("javascript:void(0)"), BASE), None);
    }

    #[test]
    fn test_bad_base_url() {
        assert_eq!(resolve_url(Some("/a"), "not a url"), None);
        // Absolute hrefs never need the base
        assert_eq!(
            resolve_url(Some("https://example.com/a"), "not a url").as_deref(),
            Some("https://example.com/a")
        );
    }

    #[test]
    fn test_resolve_entries_drops_unresolvable() {
        let entries = vec![
            NavEntry::new("Family", Some("family")),
            NavEntry::new("Nothing", None),
            NavEntry::new("Email", Some("mailto:a@b.c")),
            NavEntry::new("Deals", Some("/ski-deals")),
        ];
        let (resolved, dropped) = resolve_entries(&entries, BASE);

        assert_eq!(dropped, 2);
        assert_eq!(
            resolved,
            vec![
                ResolvedLink::new("Family", "https://www.example.com/ski-holidays/family"),
                ResolvedLink::new("Deals", "https://www.example.com/ski-deals"),
            ]
        );
    }
}

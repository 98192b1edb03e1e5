use url::Url;

/// Schemes that never lead to a crawlable page
const SKIPPED_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves a raw href against the page it appeared on and canonicalizes it
///
/// Returns None if the link should be excluded:
/// - empty hrefs and fragment-only links (same page anchors)
/// - javascript:, mailto:, tel: and data: links
/// - hrefs that fail to resolve
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use url::Url;
/// use geo_readiness::url::normalize_href;
///
/// let page = Url::parse("https://example.com/blog/").unwrap();
/// let url = normalize_href("post-1/#comments", &page).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/blog/post-1");
/// ```
pub fn normalize_href(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        return None;
    }

    let absolute = page_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    if absolute.host_str().is_none() {
        return None;
    }

    Some(canonicalize(&absolute))
}

/// Reduces an absolute URL to its canonical crawl form
///
/// # Normalization Steps
///
/// 1. Drop the fragment
/// 2. Drop the query string
/// 3. Remove a trailing slash, except for the root path
///
/// Host lowercasing and dot-segment removal are already performed by the
/// `url` crate's parser.
pub fn canonicalize(url: &Url) -> Url {
    let mut canonical = url.clone();
    canonical.set_fragment(None);
    canonical.set_query(None);

    let path = canonical.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        canonical.set_path(path.trim_end_matches('/'));
        if canonical.path().is_empty() {
            canonical.set_path("/");
        }
    }

    canonical
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://example.com/docs/guide").unwrap()
    }

    #[test]
    fn test_relative_link() {
        let url = normalize_href("/pricing", &page()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/pricing");
    }

    #[test]
    fn test_relative_path_link() {
        let url = normalize_href("intro", &page()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/intro");
    }

    #[test]
    fn test_fragment_is_stripped() {
        for href in [
            "/pricing#plans",
            "https://example.com/a/b#x",
            "https://other.com/#top",
            "intro#",
            "/#",
        ] {
            let url = normalize_href(href, &page()).unwrap();
            assert!(url.fragment().is_none(), "fragment kept for {}", href);
            assert!(!url.as_str().contains('#'), "fragment kept for {}", href);
        }
    }

    #[test]
    fn test_fragment_only_is_skipped() {
        assert!(normalize_href("#section", &page()).is_none());
    }

    #[test]
    fn test_skip_special_schemes() {
        for href in [
            "javascript:void(0)",
            "mailto:team@example.com",
            "tel:+821012345678",
            "data:text/html,<h1>x</h1>",
            "JavaScript:alert(1)",
        ] {
            assert!(normalize_href(href, &page()).is_none(), "kept {}", href);
        }
    }

    #[test]
    fn test_reject_non_http_after_resolution() {
        assert!(normalize_href("ftp://example.com/file", &page()).is_none());
    }

    #[test]
    fn test_empty_href() {
        assert!(normalize_href("   ", &page()).is_none());
    }

    #[test]
    fn test_query_is_dropped() {
        let url = normalize_href("/search?q=rust&page=2", &page()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/search");
    }

    #[test]
    fn test_trailing_slash_removed() {
        let url = normalize_href("/blog/", &page()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/blog");
    }

    #[test]
    fn test_root_slash_kept() {
        let url = normalize_href("/", &page()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/");

        let url = normalize_href("https://EXAMPLE.com", &page()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_dot_segments_resolved() {
        let url = normalize_href("../api/./v1/", &page()).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/v1");
    }

    #[test]
    fn test_port_preserved() {
        let base = Url::parse("http://127.0.0.1:8080/").unwrap();
        let url = normalize_href("/page", &base).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/page");
    }
}

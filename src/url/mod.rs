//! URL handling module
//!
//! This module provides href normalization, target-domain scoping,
//! internal/external classification, and filesystem slug derivation.

mod domain;
mod normalize;
mod slug;

pub use domain::{LinkScope, TargetDomain};
pub use normalize::{canonicalize, normalize_href};
pub use slug::{url_to_slug, INDEX_SLUG};

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses an absolute URL string and scopes it to the target domain
///
/// This is the insertion gate for seeds and sitemap entries: the result is
/// canonical (see [`canonicalize`]) and guaranteed to be on the target domain.
///
/// # Arguments
///
/// * `raw` - Absolute URL string
/// * `target` - The crawl's target domain
///
/// # Returns
///
/// * `Ok(Url)` - Canonical, domain-scoped URL
/// * `Err(UrlError)` - Malformed, non-HTTP, or out-of-scope URL
pub fn scope_url(raw: &str, target: &TargetDomain) -> UrlResult<Url> {
    let parsed = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
    }
    if parsed.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    let canonical = canonicalize(&parsed);
    if target.classify(&canonical) != LinkScope::Internal {
        return Err(UrlError::OutOfScope {
            url: canonical.to_string(),
            domain: target.to_string(),
        });
    }

    Ok(canonical)
}

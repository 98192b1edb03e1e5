//! Link edges and images

use super::text::element_text;
use crate::record::{Image, Link};
use crate::url::{normalize_href, LinkScope, TargetDomain};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("Failed to parse anchor selector - this is a bug")
});

static NAV_ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("nav a[href], header a[href]")
        .expect("Failed to parse nav anchor selector - this is a bug")
});

static IMAGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img[src]").expect("Failed to parse image selector - this is a bug")
});

/// Outbound link edges of one page
#[derive(Debug, Default)]
pub struct LinkEdges {
    pub internal: Vec<Link>,
    pub external: Vec<Link>,
    pub nav: Vec<Link>,
}

/// Collects internal, external and navigation links
///
/// Every link is normalized and de-duplicated by URL within its list, keeping
/// the first anchor text seen. Nav links are the internal links that sit
/// inside a `<nav>` or `<header>`.
pub fn extract_links(document: &Html, page_url: &Url, target: &TargetDomain) -> LinkEdges {
    let mut edges = LinkEdges::default();
    let mut seen_internal = HashSet::new();
    let mut seen_external = HashSet::new();
    let mut seen_nav = HashSet::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(url) = element
            .value()
            .attr("href")
            .and_then(|href| normalize_href(href, page_url))
        else {
            continue;
        };

        let link = Link {
            url: url.to_string(),
            text: element_text(element),
        };

        match target.classify(&url) {
            LinkScope::Internal => {
                if seen_internal.insert(link.url.clone()) {
                    edges.internal.push(link);
                }
            }
            LinkScope::External => {
                if seen_external.insert(link.url.clone()) {
                    edges.external.push(link);
                }
            }
        }
    }

    for element in document.select(&NAV_ANCHOR_SELECTOR) {
        let Some(url) = element
            .value()
            .attr("href")
            .and_then(|href| normalize_href(href, page_url))
        else {
            continue;
        };
        if target.classify(&url) != LinkScope::Internal {
            continue;
        }
        if seen_nav.insert(url.to_string()) {
            edges.nav.push(Link {
                url: url.to_string(),
                text: element_text(element),
            });
        }
    }

    edges
}

/// Images with a non-empty `src`, resolved against the page when possible
pub fn extract_images(document: &Html, page_url: &Url) -> Vec<Image> {
    document
        .select(&IMAGE_SELECTOR)
        .filter_map(|el| {
            let src = el.value().attr("src")?.trim();
            if src.is_empty() {
                return None;
            }
            let resolved = page_url
                .join(src)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| src.to_string());
            let alt = el.value().attr("alt").unwrap_or("").trim().to_string();
            Some(Image { src: resolved, alt })
        })
        .collect()
}

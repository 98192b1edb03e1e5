//! Document-level signals: title, meta tags, Open Graph, canonical, hreflang

use crate::record::Hreflang;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("title").expect("Failed to parse title selector - this is a bug")
});

static META_NAME_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[name]").expect("Failed to parse meta name selector - this is a bug")
});

static META_PROPERTY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[property]")
        .expect("Failed to parse meta property selector - this is a bug")
});

static CANONICAL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"link[rel~="canonical"][href]"#)
        .expect("Failed to parse canonical selector - this is a bug")
});

static HREFLANG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"link[rel~="alternate"][hreflang][href]"#)
        .expect("Failed to parse hreflang selector - this is a bug")
});

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Text of the first `<title>`, None when missing or blank
pub fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .and_then(|element| non_empty(&element.text().collect::<String>()))
}

/// Content of the first `<meta name=...>` whose name matches case-insensitively
pub fn extract_meta(document: &Html, name: &str) -> Option<String> {
    document
        .select(&META_NAME_SELECTOR)
        .find(|el| {
            el.value()
                .attr("name")
                .map(|n| n.trim().eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
        .and_then(|el| el.value().attr("content"))
        .and_then(non_empty)
}

/// All `og:*` properties that carry content
///
/// A repeated property keeps its last value.
pub fn extract_og_tags(document: &Html) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    for element in document.select(&META_PROPERTY_SELECTOR) {
        let Some(property) = element.value().attr("property").map(str::trim) else {
            continue;
        };
        if !property.starts_with("og:") {
            continue;
        }
        if let Some(content) = element.value().attr("content").and_then(non_empty) {
            tags.insert(property.to_string(), content);
        }
    }
    tags
}

/// The `href` of the first canonical link, as written in the page
pub fn extract_canonical(document: &Html) -> Option<String> {
    document
        .select(&CANONICAL_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(non_empty)
}

/// hreflang alternates with both a language and a URL
pub fn extract_hreflang(document: &Html) -> Vec<Hreflang> {
    document
        .select(&HREFLANG_SELECTOR)
        .filter_map(|el| {
            let lang = non_empty(el.value().attr("hreflang")?)?;
            let url = non_empty(el.value().attr("href")?)?;
            Some(Hreflang { lang, url })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
        <title>  Pricing | Example  </title>
        <meta name="Description" content="Plans for every team size.">
        <meta name="keywords" content="pricing, plans">
        <meta name="ROBOTS" content="index, follow">
        <meta property="og:title" content="Pricing">
        <meta property="og:description" content="">
        <meta property="og:type" content="website">
        <meta property="twitter:card" content="summary">
        <link rel="canonical" href=" https://example.com/pricing ">
        <link rel="alternate" hreflang="en" href="https://example.com/en/pricing">
        <link rel="alternate" hreflang="ko" href="">
        </head><body></body></html>"#;

    #[test]
    fn test_title_and_meta() {
        let document = Html::parse_document(PAGE);
        assert_eq!(extract_title(&document).as_deref(), Some("Pricing | Example"));
        assert_eq!(
            extract_meta(&document, "description").as_deref(),
            Some("Plans for every team size.")
        );
        assert_eq!(
            extract_meta(&document, "keywords").as_deref(),
            Some("pricing, plans")
        );
        assert_eq!(
            extract_meta(&document, "robots").as_deref(),
            Some("index, follow")
        );
        assert_eq!(extract_meta(&document, "author"), None);
    }

    #[test]
    fn test_og_tags_skip_empty_and_non_og() {
        let document = Html::parse_document(PAGE);
        let og = extract_og_tags(&document);
        assert_eq!(og.len(), 2);
        assert_eq!(og.get("og:title").map(String::as_str), Some("Pricing"));
        assert!(!og.contains_key("og:description"));
        assert!(!og.contains_key("twitter:card"));
    }

    #[test]
    fn test_canonical_and_hreflang() {
        let document = Html::parse_document(PAGE);
        assert_eq!(
            extract_canonical(&document).as_deref(),
            Some("https://example.com/pricing")
        );
        let alternates = extract_hreflang(&document);
        assert_eq!(alternates.len(), 1);
        assert_eq!(alternates[0].lang, "en");
    }

    #[test]
    fn test_blank_title_is_none() {
        let document = Html::parse_document("<title>   </title>");
        assert_eq!(extract_title(&document), None);
    }
}

//! Heading outline and structured data blocks

use super::text::element_text;
use crate::record::Heading;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6")
        .expect("Failed to parse heading selector - this is a bug")
});

static JSON_LD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#)
        .expect("Failed to parse JSON-LD selector - this is a bug")
});

static ITEMSCOPE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[itemscope][itemtype]")
        .expect("Failed to parse microdata selector - this is a bug")
});

static TYPEOF_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[typeof]").expect("Failed to parse RDFa selector - this is a bug")
});

/// Headings h1-h6 with non-empty text, in document order
pub fn extract_headings(document: &Html) -> Vec<Heading> {
    document
        .select(&HEADING_SELECTOR)
        .filter_map(|el| {
            let level = el.value().name().strip_prefix('h')?.parse().ok()?;
            let text = element_text(el);
            if text.is_empty() {
                None
            } else {
                Some(Heading { level, text })
            }
        })
        .collect()
}

/// Parsed JSON-LD script blocks; unparseable blocks are skipped
pub fn extract_json_ld(document: &Html) -> Vec<serde_json::Value> {
    document
        .select(&JSON_LD_SELECTOR)
        .filter_map(|el| {
            let raw = el.text().collect::<String>();
            match serde_json::from_str(raw.trim()) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!("Skipping unparseable JSON-LD block: {}", e);
                    None
                }
            }
        })
        .collect()
}

/// Microdata `itemtype` values of `itemscope` elements
pub fn extract_microdata(document: &Html) -> Vec<String> {
    typed_attributes(document, &ITEMSCOPE_SELECTOR, "itemtype")
}

/// RDFa `typeof` values
pub fn extract_rdfa(document: &Html) -> Vec<String> {
    typed_attributes(document, &TYPEOF_SELECTOR, "typeof")
}

fn typed_attributes(document: &Html, selector: &Selector, attr: &str) -> Vec<String> {
    document
        .select(selector)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_in_document_order() {
        let html = r#"<body>
            <h2>Overview</h2>
            <h1>Product <em>Name</em></h1>
            <h3>   </h3>
            <h6>Small print</h6>
        </body>"#;
        let headings = extract_headings(&Html::parse_document(html));
        let outline: Vec<(u8, &str)> = headings
            .iter()
            .map(|h| (h.level, h.text.as_str()))
            .collect();
        assert_eq!(
            outline,
            vec![(2, "Overview"), (1, "Product Name"), (6, "Small print")]
        );
    }

    #[test]
    fn test_json_ld_skips_broken_blocks() {
        let html = r#"<head>
            <script type="application/ld+json">{"@type": "Organization", "name": "Example"}</script>
            <script type="application/ld+json">{not json</script>
            <script type="application/ld+json">[{"@type": "FAQPage"}]</script>
        </head>"#;
        let blocks = extract_json_ld(&Html::parse_document(html));
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["@type"], "Organization");
        assert!(blocks[1].is_array());
    }

    #[test]
    fn test_microdata_and_rdfa() {
        let html = r#"<body>
            <div itemscope itemtype="https://schema.org/Product"></div>
            <div itemscope></div>
            <div vocab="https://schema.org/" typeof="Event"></div>
            <div typeof=""></div>
        </body>"#;
        let document = Html::parse_document(html);
        assert_eq!(extract_microdata(&document), vec!["https://schema.org/Product"]);
        assert_eq!(extract_rdfa(&document), vec!["Event"]);
    }
}

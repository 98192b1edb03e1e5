//! Sitemap XML parser
//!
//! Element names are matched by local name, so documents with or without the
//! sitemaps.org namespace (or a prefix) parse the same way.

use super::SitemapError;
use quick_xml::events::Event;
use quick_xml::Reader;

/// The two sitemap document shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: child sitemap locations
    Index(Vec<String>),
    /// `<urlset>`: page locations
    UrlSet(Vec<String>),
}

/// Parses sitemap XML into its document shape
///
/// A document with any `<sitemap><loc>` entry is an index; otherwise the
/// `<url><loc>` entries are returned.
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument, SitemapError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut loc_text = String::new();
    let mut children = Vec::new();
    let mut pages = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_ascii_lowercase();
                if name == "loc" {
                    loc_text.clear();
                }
                stack.push(name);
            }
            Ok(Event::End(_)) => {
                let closed = stack.pop();
                if closed.as_deref() == Some("loc") {
                    let loc = loc_text.trim();
                    if !loc.is_empty() {
                        match stack.last().map(String::as_str) {
                            Some("sitemap") => children.push(loc.to_string()),
                            Some("url") => pages.push(loc.to_string()),
                            _ => {}
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if stack.last().map(String::as_str) == Some("loc") {
                    let text = t.unescape().map_err(|e| SitemapError::Xml(e.to_string()))?;
                    loc_text.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if stack.last().map(String::as_str) == Some("loc") {
                    loc_text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SitemapError::Xml(format!(
                    "at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if children.is_empty() {
        Ok(SitemapDocument::UrlSet(pages))
    } else {
        Ok(SitemapDocument::Index(children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset_with_namespace() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/</loc><lastmod>2025-01-01</lastmod></url>
  <url><loc> https://example.com/about?a=1&amp;b=2 </loc></url>
  <url><loc></loc></url>
</urlset>"#;
        assert_eq!(
            parse_sitemap(xml).unwrap(),
            SitemapDocument::UrlSet(vec![
                "https://example.com/".to_string(),
                "https://example.com/about?a=1&b=2".to_string(),
            ])
        );
    }

    #[test]
    fn test_parse_index_without_namespace() {
        let xml = r#"<sitemapindex>
  <sitemap><loc>https://example.com/a.xml</loc></sitemap>
  <sitemap><loc><![CDATA[https://example.com/b.xml]]></loc></sitemap>
</sitemapindex>"#;
        assert_eq!(
            parse_sitemap(xml).unwrap(),
            SitemapDocument::Index(vec![
                "https://example.com/a.xml".to_string(),
                "https://example.com/b.xml".to_string(),
            ])
        );
    }

    #[test]
    fn test_parse_prefixed_namespace() {
        let xml = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sm:url><sm:loc>https://example.com/x</sm:loc></sm:url>
</sm:urlset>"#;
        assert_eq!(
            parse_sitemap(xml).unwrap(),
            SitemapDocument::UrlSet(vec!["https://example.com/x".to_string()])
        );
    }

    #[test]
    fn test_loc_outside_url_ignored() {
        let xml = "<urlset><loc>https://example.com/stray</loc></urlset>";
        assert_eq!(parse_sitemap(xml).unwrap(), SitemapDocument::UrlSet(vec![]));
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let xml = "<urlset><url><loc>https://example.com/</url></urlset>";
        assert!(matches!(parse_sitemap(xml), Err(SitemapError::Xml(_))));
    }
}

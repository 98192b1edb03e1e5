//! Visible text and FAQ signals

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Elements whose contents never count as visible text
pub(crate) const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "svg", "iframe", "head"];

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("Failed to parse body selector - this is a bug"));

static DT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("dt").expect("Failed to parse dt selector - this is a bug"));

static CLASSED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("[class]").expect("Failed to parse class selector - this is a bug")
});

static FAQ_TEXT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)자주\s*묻는\s*질문",
        r"(?i)FAQ",
        r"(?i)Q\s*[&.]\s*A",
        r"(?i)Q\.\s",
        r"(?i)Q\d+[\.\s]",
        r"(?i)질문\s*\d+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Failed to compile FAQ pattern - this is a bug"))
    .collect()
});

static FAQ_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)faq|accordion|qa").expect("Failed to compile FAQ class pattern - this is a bug")
});

/// Pushes every non-blank visible text node under `element`, trimmed
fn push_visible_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                out.push(trimmed);
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !HIDDEN_TAGS.contains(&child_element.value().name()) {
                push_visible_text(child_element, out);
            }
        }
    }
}

/// Main visible text of a document
///
/// Text nodes under `<body>`, skipping hidden elements and comments, each
/// trimmed and joined by newlines.
pub fn visible_text(document: &Html) -> String {
    let Some(body) = document.select(&BODY_SELECTOR).next() else {
        return String::new();
    };

    let mut parts = Vec::new();
    push_visible_text(body, &mut parts);
    parts.join("\n")
}

/// Visible text of one element with whitespace collapsed to single spaces
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    push_visible_text(element, &mut parts);
    parts
        .iter()
        .flat_map(|p| p.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Counts FAQ-like signals: text pattern hits, `<dt>` elements, and
/// elements carrying a FAQ-ish class name
pub fn count_faq_signals(text: &str, document: &Html) -> usize {
    let text_hits: usize = FAQ_TEXT_PATTERNS
        .iter()
        .map(|re| re.find_iter(text).count())
        .sum();

    let definition_terms = document.select(&DT_SELECTOR).count();

    let classed = document
        .select(&CLASSED_SELECTOR)
        .filter(|el| el.value().classes().any(|c| FAQ_CLASS.is_match(c)))
        .count();

    text_hits + definition_terms + classed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_skips_hidden_and_comments() {
        let html = r#"<html><head><title>T</title></head><body>
            <p>First</p>
            <!-- a comment -->
            <script>var x = 1;</script>
            <style>p { color: red }</style>
            <noscript>Enable JS</noscript>
            <div>  Second <span>part</span></div>
        </body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(visible_text(&document), "First\nSecond\npart");
    }

    #[test]
    fn test_element_text_collapses_whitespace() {
        let document = Html::parse_document("<h1>  Hello\n   <b>World</b> </h1>");
        let h1 = document
            .select(&Selector::parse("h1").unwrap())
            .next()
            .unwrap();
        assert_eq!(element_text(h1), "Hello World");
    }

    #[test]
    fn test_faq_count() {
        let html = r#"<body>
            <h2>자주 묻는 질문</h2>
            <div class="faq-list">
              <dl><dt>Q1. Price?</dt><dd>Ten.</dd></dl>
            </div>
            <section class="Accordion open">x</section>
        </body>"#;
        let document = Html::parse_document(html);
        let text = visible_text(&document);
        // 자주 묻는 질문 + Q1. in text, one <dt>, two classed elements
        assert_eq!(count_faq_signals(&text, &document), 5);
    }

    #[test]
    fn test_faq_count_zero() {
        let document = Html::parse_document("<body><p>Plain copy.</p></body>");
        let text = visible_text(&document);
        assert_eq!(count_faq_signals(&text, &document), 0);
    }
}

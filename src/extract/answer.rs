//! Answer-first block extraction
//!
//! The answer-first block is the text directly under a page's first H1, the
//! zone AI answer engines most often lift as a page's primary answer.

use super::text::element_text;
use crate::record::truncate_chars;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Maximum length of the answer-first block, in characters
pub const ANSWER_BLOCK_MAX_CHARS: usize = 500;

/// Headings that end the answer-first zone
const STOP_TAGS: &[&str] = &["h1", "h2", "h3"];

/// Containers whose text is captured by the document-order fallback walk
const BLOCK_TAGS: &[&str] = &["p", "div", "span", "li", "blockquote", "section", "article"];

static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("Failed to parse h1 selector - this is a bug"));

/// Accumulates text pieces until the length budget is reached
#[derive(Default)]
struct Collector {
    pieces: Vec<String>,
    total_chars: usize,
}

impl Collector {
    /// Adds a piece; returns true once the budget is reached
    fn push(&mut self, text: String) -> bool {
        self.total_chars += text.chars().count();
        self.pieces.push(text);
        self.total_chars >= ANSWER_BLOCK_MAX_CHARS
    }

    fn already_has(&self, text: &str) -> bool {
        self.pieces.join(" ").contains(text)
    }

    fn finish(self) -> Option<String> {
        if self.pieces.is_empty() {
            return None;
        }
        Some(truncate_chars(&self.pieces.join(" "), ANSWER_BLOCK_MAX_CHARS))
    }
}

fn is_stop(element: &ElementRef<'_>) -> bool {
    STOP_TAGS.contains(&element.value().name())
}

/// Extracts the answer-first block following the first `<h1>`
///
/// Sibling elements after the H1 are walked first. When none of them carries
/// text, the walk falls back to every following element in document order
/// (outside the H1 itself), capturing only block containers and skipping text
/// already collected. Both walks stop at the next h1-h3 or once
/// [`ANSWER_BLOCK_MAX_CHARS`] characters are gathered.
///
/// Returns None when the page has no H1 or nothing follows it.
pub fn extract_answer_first_block(document: &Html) -> Option<String> {
    let h1 = document.select(&H1_SELECTOR).next()?;

    let mut collector = Collector::default();

    for sibling in h1.next_siblings().filter_map(ElementRef::wrap) {
        if is_stop(&sibling) {
            break;
        }
        let text = element_text(sibling);
        if !text.is_empty() && collector.push(text) {
            break;
        }
    }

    if collector.pieces.is_empty() {
        let h1_id = h1.id();
        let mut after_h1 = false;

        for node in document.tree.root().descendants() {
            if node.id() == h1_id {
                after_h1 = true;
                continue;
            }
            if !after_h1 || node.ancestors().any(|a| a.id() == h1_id) {
                continue;
            }
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };
            if is_stop(&element) {
                break;
            }
            if !BLOCK_TAGS.contains(&element.value().name()) {
                continue;
            }
            let text = element_text(element);
            if text.is_empty() || collector.already_has(&text) {
                continue;
            }
            if collector.push(text) {
                break;
            }
        }
    }

    collector.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(html: &str) -> Option<String> {
        extract_answer_first_block(&Html::parse_document(html))
    }

    #[test]
    fn test_no_h1_is_absent() {
        assert_eq!(block("<body><h2>Sub</h2><p>Text</p></body>"), None);
    }

    #[test]
    fn test_siblings_until_next_heading() {
        let html = r#"<body><main>
            <h1>Title</h1>
            <p>First paragraph.</p>
            <ul><li>Point one</li></ul>
            <h2>Details</h2>
            <p>Not included.</p>
        </main></body>"#;
        assert_eq!(
            block(html).as_deref(),
            Some("First paragraph. Point one")
        );
    }

    #[test]
    fn test_h1_with_nothing_after_is_absent() {
        let html = "<body><h1>Lonely</h1></body>";
        assert_eq!(block(html), None);
    }

    #[test]
    fn test_document_order_fallback() {
        let html = r#"<body>
            <div class="hero"><h1>Title</h1></div>
            <div class="lead"><p>Nested answer text.</p></div>
            <h2>Next</h2>
        </body>"#;
        // The outer div is captured first; its inner p is already contained
        assert_eq!(block(html).as_deref(), Some("Nested answer text."));
    }

    #[test]
    fn test_exactly_500_chars_kept_whole() {
        let text = "a".repeat(500);
        let html = format!("<body><h1>T</h1><p>{}</p></body>", text);
        assert_eq!(block(&html), Some(text));
    }

    #[test]
    fn test_501_chars_truncated_to_500() {
        let text = "b".repeat(501);
        let html = format!("<body><h1>T</h1><p>{}</p></body>", text);
        let result = block(&html).unwrap();
        assert_eq!(result.chars().count(), 500);
        assert_eq!(result, "b".repeat(500));
    }

    #[test]
    fn test_stops_once_budget_reached() {
        let html = format!(
            "<body><h1>T</h1><p>{}</p><p>{}</p><p>never</p></body>",
            "x".repeat(300),
            "y".repeat(300)
        );
        let result = block(&html).unwrap();
        assert_eq!(result.chars().count(), 500);
        assert!(!result.contains("never"));
    }

    #[test]
    fn test_multibyte_truncation() {
        let html = format!("<body><h1>제목</h1><p>{}</p></body>", "가".repeat(600));
        let result = block(&html).unwrap();
        assert_eq!(result.chars().count(), 500);
    }
}

//! Console scorecard table

use super::scorecard::{PageScore, Scorecard};

/// Column width of the page label
const PAGE_COLUMN: usize = 45;

/// Longest page label shown before truncation
const MAX_LABEL_CHARS: usize = 43;

/// Width of the dimension-average bar (5 points x 4)
const BAR_WIDTH: usize = 20;

/// Short page label: `/slug`, or the URL when the slug is empty
pub fn page_label(page: &PageScore) -> String {
    let label = if page.slug.is_empty() {
        page.url.clone()
    } else {
        format!("/{}", page.slug)
    };
    if label.chars().count() > MAX_LABEL_CHARS {
        let head: String = label.chars().take(MAX_LABEL_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        label
    }
}

/// Row flag: `[CSR]` for browser-rendered pages, else `[!]` when critical
pub fn page_flag(page: &PageScore) -> &'static str {
    if page.is_browser_rendered() {
        "[CSR]"
    } else if page.is_critical() {
        "[!]"
    } else {
        ""
    }
}

/// Formats the ranked table, top issues and dimension averages
pub fn format_scorecard(card: &Scorecard) -> String {
    let mut out = String::new();
    if card.pages.is_empty() {
        out.push_str("No pages to analyze.\n");
        return out;
    }

    out.push_str("\n=== GEO Readiness Scorecard ===\n");
    out.push_str(&format!("Pages analyzed: {}\n", card.total_pages));
    out.push_str(&format!("Average score:  {:.1} / 25\n\n", card.average_score));

    let header = format!(
        "  {:<width$} {:>6} {:>5} {:>7} {:>5} {:>5} {:>5}",
        "Page",
        "Answer",
        "Proof",
        "Fan-out",
        "Crawl",
        "Trust",
        "TOTAL",
        width = PAGE_COLUMN
    );
    out.push_str(&header);
    out.push('\n');
    out.push_str(&format!("  {}\n", "-".repeat(header.chars().count() - 2)));

    for page in &card.pages {
        let s = &page.scores;
        let flag = page_flag(page);
        out.push_str(&format!(
            "  {:<width$} {:>6} {:>5} {:>7} {:>5} {:>5} {:>5}{}\n",
            page_label(page),
            s.answerability,
            s.proof,
            s.fan_out,
            s.crawlability,
            s.trust,
            s.total,
            if flag.is_empty() {
                String::new()
            } else {
                format!("  {}", flag)
            },
            width = PAGE_COLUMN
        ));
    }
    out.push('\n');

    if !card.summary.top_issues.is_empty() {
        out.push_str("Top Issues:\n");
        for (i, issue) in card.summary.top_issues.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, issue));
        }
        out.push('\n');
    }

    out.push_str("Dimension Averages:\n");
    for (dimension, stats) in &card.summary.by_dimension {
        let filled = ((stats.avg * 4.0) as usize).min(BAR_WIDTH);
        let bar = format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled));
        out.push_str(&format!(
            "  {:<15} {:>4.1}  [{}]  (min={}, max={})\n",
            dimension.as_str(),
            stats.avg,
            bar,
            stats.min,
            stats.max
        ));
    }
    out
}

/// Prints the scorecard to stdout
pub fn print_scorecard(card: &Scorecard) {
    println!("{}", format_scorecard(card));
}

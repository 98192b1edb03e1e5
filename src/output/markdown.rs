//! Markdown report generation
//!
//! This module renders the human-readable crawl report and the ranked
//! scorecard table.

use super::console::{page_flag, page_label};
use super::scorecard::Scorecard;
use super::summary::CrawlSummary;
use crate::record::PageRecord;
use crate::robots::RobotsAnalysis;

/// Long URL lists are cut to this many entries
const LIST_LIMIT: usize = 50;

/// Characters of an answer-first block shown in the audit
const PREVIEW_CHARS: usize = 150;

/// Issues shown per page in the GEO score table
const GEO_ISSUE_LIMIT: usize = 3;

/// Links shown per page in the internal link map
const LINK_MAP_LIMIT: usize = 30;

fn push_limited_list(md: &mut String, urls: &[String]) {
    for url in urls.iter().take(LIST_LIMIT) {
        md.push_str(&format!("- {}\n", url));
    }
    if urls.len() > LIST_LIMIT {
        md.push_str(&format!("- ... and {} more\n", urls.len() - LIST_LIMIT));
    }
}

fn or_missing(value: Option<&str>, missing: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => missing.to_string(),
    }
}

/// Formats the crawl report
///
/// # Arguments
///
/// * `records` - Page records of the run, in crawl order
/// * `summary` - The run's crawl summary
/// * `robots` - The run's robots.txt analysis
pub fn format_crawl_report(
    records: &[PageRecord],
    summary: &CrawlSummary,
    robots: &RobotsAnalysis,
) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} Crawl Report\n\n", summary.base_domain));
    md.push_str(&format!("- **Crawl Date**: {}\n", summary.crawl_timestamp.to_rfc3339()));
    md.push_str(&format!("- **Pages Crawled**: {}\n", summary.page_count));
    md.push_str(&format!(
        "- **Internal Links Found**: {}\n",
        summary.total_internal_links
    ));
    md.push_str(&format!(
        "- **External Links Found**: {}\n",
        summary.total_external_links
    ));
    md.push_str(&format!(
        "- **Average GEO Score**: {}/100\n",
        summary.average_geo_score
    ));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    push_outcomes(&mut md, summary);
    push_robots(&mut md, summary, robots);
    push_sitemap_coverage(&mut md, summary);
    push_rendering(&mut md, summary);
    push_answer_audit(&mut md, records);
    push_geo_scores(&mut md, summary);
    push_navigation(&mut md, summary);
    push_per_page(&mut md, records);
    push_link_map(&mut md, records);
    push_missing_elements(&mut md, records);

    if !summary.discovered_urls_not_crawled.is_empty() {
        md.push_str("## Discovered but Not Crawled\n\n");
        md.push_str(&format!(
            "Found {} internal URL(s) that were not crawled (raise --max-pages to include them):\n\n",
            summary.discovered_urls_not_crawled.len()
        ));
        push_limited_list(&mut md, &summary.discovered_urls_not_crawled);
        md.push('\n');
    }

    md
}

fn push_outcomes(md: &mut String, summary: &CrawlSummary) {
    md.push_str("## Page Outcomes\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    for state in crate::state::PageState::all_states() {
        let count = summary.outcomes.get(state);
        if count > 0 {
            md.push_str(&format!("| {} | {} |\n", state, count));
        }
    }
    md.push_str(&format!("| **Total attempted** | {} |\n\n", summary.outcomes.attempted()));
}

fn push_robots(md: &mut String, summary: &CrawlSummary, robots: &RobotsAnalysis) {
    md.push_str("## Robots.txt Analysis\n\n");

    match (robots.status, &robots.error) {
        (Some(404), _) => {
            md.push_str("**robots.txt not found (404).** No crawl restrictions detected.\n\n");
        }
        (_, Some(error)) => {
            md.push_str(&format!("**Error fetching robots.txt:** {}\n\n", error));
        }
        (status, None) => {
            if let Some(status) = status {
                md.push_str(&format!("**Status:** {}\n\n", status));
            }

            if !robots.bot_summary.is_empty() {
                md.push_str("### Search and AI Bot Access\n\n");
                md.push_str("| Bot | Status | Disallow Paths | Source |\n");
                md.push_str("|-----|--------|----------------|--------|\n");
                for bot in &robots.bot_summary {
                    let disallow = if bot.disallow.is_empty() {
                        "(none)".to_string()
                    } else {
                        bot.disallow.join(", ")
                    };
                    md.push_str(&format!(
                        "| {} | {} | {} | {} |\n",
                        bot.agent,
                        bot.status,
                        disallow,
                        bot.source_agent.as_deref().unwrap_or("-")
                    ));
                }
                md.push('\n');
            }

            if !robots.user_agent_blocks.is_empty() {
                md.push_str("### All User-Agent Blocks\n\n");
                for block in &robots.user_agent_blocks {
                    md.push_str(&format!("**{}:**\n", block.agent));
                    for rule in &block.rules {
                        md.push_str(&format!("- {}: {}\n", rule.directive.as_str(), rule.value));
                    }
                    md.push('\n');
                }
            }

            if !robots.sitemaps.is_empty() {
                md.push_str("### Sitemaps Referenced in robots.txt\n\n");
                for sitemap in &robots.sitemaps {
                    md.push_str(&format!("- {}\n", sitemap));
                }
                md.push('\n');
            }
        }
    }

    let blocked = &summary.robots_txt.blocked_pages;
    if !blocked.is_empty() {
        md.push_str("### Crawled Pages Blocked per Bot\n\n");
        for (bot, pages) in blocked {
            md.push_str(&format!("**{}** ({} page(s)):\n", bot, pages.len()));
            push_limited_list(md, pages);
            md.push('\n');
        }
    }

    md.push_str("---\n\n");
}

fn push_sitemap_coverage(md: &mut String, summary: &CrawlSummary) {
    md.push_str("## Sitemap Coverage\n\n");

    if summary.sitemap_urls.is_empty() {
        md.push_str("No sitemap found or sitemap was empty.\n\n");
    } else {
        md.push_str(&format!(
            "- **Total URLs in sitemap**: {}\n",
            summary.sitemap_url_count
        ));
        md.push_str(&format!(
            "- **Crawled from sitemap**: {}\n",
            summary.sitemap_urls_in_crawl.len()
        ));
        md.push_str(&format!(
            "- **Not crawled from sitemap**: {}\n\n",
            summary.sitemap_urls_not_crawled.len()
        ));
        if !summary.sitemap_urls_not_crawled.is_empty() {
            md.push_str("### Sitemap URLs Not Crawled\n\n");
            push_limited_list(md, &summary.sitemap_urls_not_crawled);
            md.push('\n');
        }
    }

    md.push_str("---\n\n");
}

fn push_rendering(md: &mut String, summary: &CrawlSummary) {
    md.push_str("## JS Rendering Status\n\n");
    let rendering = &summary.rendering_summary;

    if summary.pages_needing_render.is_empty() {
        md.push_str("All pages were served with enough markup; no browser rendering was needed.\n\n");
    } else {
        md.push_str(&format!(
            "**{} page(s)** looked client-rendered:\n\n",
            summary.pages_needing_render.len()
        ));
        for url in &summary.pages_needing_render {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    if !summary.pages_render_failed.is_empty() {
        md.push_str(&format!(
            "**{} page(s)** where browser rendering failed (direct HTML kept):\n\n",
            summary.pages_render_failed.len()
        ));
        for url in &summary.pages_render_failed {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    if !rendering.browser_rendered.is_empty() {
        md.push_str(&format!(
            "**{} page(s)** rendered with the headless browser.\n\n",
            rendering.browser_rendered.len()
        ));
    }
    md.push_str(&format!(
        "**{} page(s)** used the direct HTTP response.\n\n",
        rendering.direct.len()
    ));
    md.push_str("---\n\n");
}

fn push_answer_audit(md: &mut String, records: &[PageRecord]) {
    md.push_str("## Answer-first Audit\n\n");
    md.push_str(
        "The answer-first block is the text right after the first H1, up to the next \
         H1-H3. Answer engines often lift this zone as the primary answer.\n\n",
    );

    let (with_block, without_block): (Vec<&PageRecord>, Vec<&PageRecord>) = records
        .iter()
        .partition(|r| r.answer_first_block.as_deref().map(|b| !b.is_empty()).unwrap_or(false));

    md.push_str(&format!(
        "- **Pages with an answer-first block**: {}\n",
        with_block.len()
    ));
    md.push_str(&format!(
        "- **Pages without an answer-first block**: {}\n\n",
        without_block.len()
    ));

    if !with_block.is_empty() {
        md.push_str("### Pages with Answer-first Content\n\n");
        for record in &with_block {
            let block = record.answer_first_block.as_deref().unwrap_or_default();
            let preview = if block.chars().count() > PREVIEW_CHARS {
                format!("{}...", block.chars().take(PREVIEW_CHARS).collect::<String>())
            } else {
                block.to_string()
            };
            md.push_str(&format!(
                "**{}**\n> {}\n\n",
                record.title.as_deref().unwrap_or(&record.url),
                preview
            ));
        }
    }

    if !without_block.is_empty() {
        md.push_str("### Pages Missing Answer-first Content\n\n");
        for record in &without_block {
            md.push_str(&format!(
                "- [ ] {} -- {}\n",
                record.url,
                record.title.as_deref().unwrap_or("(no title)")
            ));
        }
        md.push('\n');
    }

    md.push_str("---\n\n");
}

fn push_geo_scores(md: &mut String, summary: &CrawlSummary) {
    md.push_str("## GEO Score Summary\n\n");
    if summary.page_geo_scores.is_empty() {
        md.push_str("No pages scored.\n\n---\n\n");
        return;
    }

    let mut ranked: Vec<_> = summary.page_geo_scores.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    md.push_str("| Page | Score | Grade | Key Issues |\n");
    md.push_str("|------|-------|-------|------------|\n");
    for page in ranked {
        let mut issues = page
            .issues
            .iter()
            .take(GEO_ISSUE_LIMIT)
            .cloned()
            .collect::<Vec<_>>()
            .join("; ");
        if page.issues.len() > GEO_ISSUE_LIMIT {
            issues.push_str(&format!(" (+{} more)", page.issues.len() - GEO_ISSUE_LIMIT));
        }
        md.push_str(&format!(
            "| {} | {}/{} | {} | {} |\n",
            page.slug, page.score, page.max_score, page.grade, issues
        ));
    }
    md.push_str("\n---\n\n");
}

fn push_navigation(md: &mut String, summary: &CrawlSummary) {
    md.push_str("## Site Structure\n\n### Navigation Links\n\n");
    if summary.navigation_structure.is_empty() {
        md.push_str("No navigation links discovered.\n");
    }
    for (url, text) in &summary.navigation_structure {
        let label = if text.is_empty() { "(no text)" } else { text };
        md.push_str(&format!("- [{}]({})\n", label, url));
    }
    md.push('\n');
}

fn push_per_page(md: &mut String, records: &[PageRecord]) {
    md.push_str("## Per-Page Analysis\n\n");

    for record in records {
        md.push_str(&format!(
            "### {}\n\n",
            record.title.as_deref().unwrap_or("(no title)")
        ));
        md.push_str(&format!("- **URL**: {}\n", record.url));
        if let Some(status) = record.status_code {
            md.push_str(&format!("- **Status**: {}\n", status));
        }
        md.push_str(&format!("- **Rendered with**: {}\n", record.rendered_with));
        md.push_str(&format!(
            "- **Meta Description**: {}\n",
            or_missing(record.meta_description.as_deref(), "MISSING")
        ));
        md.push_str(&format!(
            "- **Canonical**: {}\n",
            or_missing(record.canonical.as_deref(), "MISSING")
        ));
        md.push_str(&format!(
            "- **Meta Robots**: {}\n",
            or_missing(record.meta_robots.as_deref(), "none")
        ));
        md.push_str(&format!(
            "- **X-Robots-Tag**: {}\n",
            or_missing(record.x_robots_tag.as_deref(), "none")
        ));
        md.push_str(&format!("- **Text Length**: {} chars\n", record.text_length));
        md.push_str(&format!("- **Word Count**: {}\n", record.word_count));
        md.push_str(&format!("- **Subheadings (H2-H4)**: {}\n", record.subheading_count));
        md.push_str(&format!("- **FAQ signals**: {}\n", record.faq_count));
        let alt = &record.img_alt_coverage;
        if alt.total > 0 {
            md.push_str(&format!(
                "- **Image Alt Coverage**: {}/{} ({:.0}%)\n",
                alt.with_alt,
                alt.total,
                alt.ratio * 100.0
            ));
        } else {
            md.push_str("- **Image Alt Coverage**: no images\n");
        }
        md.push_str(&format!(
            "- **Links**: {} internal, {} external\n\n",
            record.internal_links.len(),
            record.external_links.len()
        ));

        if record.headings.is_empty() {
            md.push_str("**Heading Structure:** none\n\n");
        } else {
            md.push_str("**Heading Structure:**\n```\n");
            for heading in &record.headings {
                let indent = "  ".repeat(heading.level.saturating_sub(1) as usize);
                md.push_str(&format!("{}H{}: {}\n", indent, heading.level, heading.text));
            }
            md.push_str("```\n\n");
        }

        if record.has_structured_data {
            md.push_str("**Structured Data:**\n");
            for (i, block) in record.json_ld.iter().enumerate() {
                let kind = block
                    .get("@type")
                    .map(|t| match t.as_str() {
                        Some(s) => s.to_string(),
                        None => t.to_string(),
                    })
                    .unwrap_or_else(|| "unknown".to_string());
                md.push_str(&format!("- JSON-LD #{}: @type = {}\n", i + 1, kind));
            }
            for item_type in &record.schema_microdata {
                md.push_str(&format!("- Microdata: {}\n", item_type));
            }
            for rdfa in &record.rdfa_types {
                md.push_str(&format!("- RDFa: {}\n", rdfa));
            }
            md.push('\n');
        } else {
            md.push_str("**Structured Data:** none\n\n");
        }

        md.push_str("---\n\n");
    }
}

fn push_link_map(md: &mut String, records: &[PageRecord]) {
    md.push_str("## Internal Link Map\n\n");
    md.push_str("Source page -> target pages (internal)\n\n");
    for record in records.iter().filter(|r| !r.internal_links.is_empty()) {
        md.push_str(&format!("### {}\n\n", record.slug));
        for link in record.internal_links.iter().take(LINK_MAP_LIMIT) {
            let text = or_missing(Some(link.text.as_str()), "(no anchor text)");
            md.push_str(&format!("- [{}]({})\n", text, link.url));
        }
        if record.internal_links.len() > LINK_MAP_LIMIT {
            md.push_str(&format!(
                "- ... and {} more\n",
                record.internal_links.len() - LINK_MAP_LIMIT
            ));
        }
        md.push('\n');
    }
    md.push_str("---\n\n");
}

/// Findings listed for one page in the missing-elements report
pub fn missing_elements(record: &PageRecord) -> Vec<String> {
    let mut issues = Vec::new();
    let blank = |v: &Option<String>| v.as_deref().map(|s| s.trim().is_empty()).unwrap_or(true);

    if blank(&record.title) {
        issues.push("No <title> tag".to_string());
    }
    if blank(&record.meta_description) {
        issues.push("No meta description".to_string());
    }
    match record.h1_count {
        0 => issues.push("No H1 tag".to_string()),
        1 => {}
        n => issues.push(format!("Multiple H1 tags ({})", n)),
    }
    if !record.has_structured_data {
        issues.push("No structured data (JSON-LD, microdata or RDFa)".to_string());
    }
    if blank(&record.canonical) {
        issues.push("No canonical URL".to_string());
    }
    if record.og_tags.is_empty() {
        issues.push("No Open Graph tags".to_string());
    }
    if blank(&record.answer_first_block) {
        issues.push("No answer-first block after H1".to_string());
    }
    let alt = &record.img_alt_coverage;
    if alt.total > 0 && alt.ratio < 0.5 {
        issues.push(format!("Low image alt coverage ({:.0}%)", alt.ratio * 100.0));
    }
    if record.word_count < 200 {
        issues.push(format!("Low word count ({})", record.word_count));
    }
    if record.subheading_count == 0 {
        issues.push("No subheadings (H2-H4)".to_string());
    }
    if record.is_noindex() {
        issues.push(format!(
            "meta robots noindex: {}",
            record.meta_robots.as_deref().unwrap_or_default()
        ));
    }
    if let Some(tag) = &record.x_robots_tag {
        if tag.to_lowercase().contains("noindex") {
            issues.push(format!("X-Robots-Tag noindex: {}", tag));
        }
    }
    issues
}

fn push_missing_elements(md: &mut String, records: &[PageRecord]) {
    md.push_str("## Missing Elements Report\n\n");

    let mut any = false;
    for record in records {
        let issues = missing_elements(record);
        if issues.is_empty() {
            continue;
        }
        any = true;
        md.push_str(&format!("### {}\n\n", record.url));
        for issue in issues {
            md.push_str(&format!("- [ ] {}\n", issue));
        }
        md.push('\n');
    }

    if !any {
        md.push_str("No issues found.\n\n");
    }
}

/// Formats the ranked scorecard as markdown
pub fn format_scorecard_markdown(card: &Scorecard) -> String {
    let mut md = String::new();
    md.push_str("# GEO Readiness Scorecard\n\n");
    md.push_str(&format!("- **Generated**: {}\n", card.generated_at.to_rfc3339()));
    md.push_str(&format!("- **Pages analyzed**: {}\n", card.total_pages));
    md.push_str(&format!("- **Average score**: {:.1} / 25\n\n", card.average_score));

    md.push_str("## Ranked Pages\n\n");
    md.push_str("| Rank | Page | Answer | Proof | Fan-out | Crawl | Trust | Total | Flag |\n");
    md.push_str("|------|------|--------|-------|---------|-------|-------|-------|------|\n");
    for page in &card.pages {
        let s = &page.scores;
        md.push_str(&format!(
            "| {} | [{}]({}) | {} | {} | {} | {} | {} | {} | {} |\n",
            page.priority_rank,
            page_label(page),
            page.url,
            s.answerability,
            s.proof,
            s.fan_out,
            s.crawlability,
            s.trust,
            s.total,
            page_flag(page)
        ));
    }
    md.push('\n');

    if !card.summary.top_issues.is_empty() {
        md.push_str("## Top Issues\n\n");
        for (i, issue) in card.summary.top_issues.iter().enumerate() {
            md.push_str(&format!("{}. {}\n", i + 1, issue));
        }
        md.push('\n');
    }

    md.push_str("## Dimension Averages\n\n");
    md.push_str("| Dimension | Avg | Min | Max |\n");
    md.push_str("|-----------|-----|-----|-----|\n");
    for (dimension, stats) in &card.summary.by_dimension {
        md.push_str(&format!(
            "| {} | {:.1} | {} | {} |\n",
            dimension, stats.avg, stats.min, stats.max
        ));
    }
    md
}

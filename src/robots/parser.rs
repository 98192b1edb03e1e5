//! Robots.txt parser implementation
//!
//! Builds a per-agent rule table from robots.txt text. Allow/Disallow
//! matching of concrete URLs is delegated to the robotstxt crate.

use robotstxt::DefaultMatcher;
use serde::Serialize;

/// Directives kept in the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Directive {
    Allow,
    Disallow,
    #[serde(rename = "Crawl-delay")]
    CrawlDelay,
}

impl Directive {
    /// Directive name as written in robots.txt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "Allow",
            Self::Disallow => "Disallow",
            Self::CrawlDelay => "Crawl-delay",
        }
    }
}

/// One rule line inside an agent block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RobotsRule {
    pub directive: Directive,
    pub value: String,
}

/// All rules that apply to one user-agent name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentBlock {
    pub agent: String,
    pub rules: Vec<RobotsRule>,
}

impl AgentBlock {
    /// Non-empty paths of rules with the given directive, in file order
    pub fn paths(&self, directive: Directive) -> Vec<String> {
        self.rules
            .iter()
            .filter(|r| r.directive == directive && !r.value.is_empty())
            .map(|r| r.value.clone())
            .collect()
    }
}

/// Parsed robots.txt data
///
/// Agent blocks keep the order in which agents first appear. Rules from
/// separate groups naming the same agent (case-insensitively) are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RobotsPolicy {
    /// Raw robots.txt content
    #[serde(skip)]
    content: String,
    pub agents: Vec<AgentBlock>,
    pub sitemaps: Vec<String>,
}

impl RobotsPolicy {
    /// Parses raw robots.txt content
    ///
    /// # Grouping Rules
    ///
    /// - A `User-agent` line after any directive starts a new group
    /// - Consecutive `User-agent` lines share the directives that follow
    /// - `Allow`, `Disallow` and `Crawl-delay` apply to the current group
    /// - `Sitemap` lines are recorded without touching the current group
    /// - Any other line resets the current group
    ///
    /// Keys are case-insensitive; comments and blank lines are ignored.
    pub fn parse(content: &str) -> Self {
        let mut policy = Self {
            content: content.to_string(),
            ..Self::default()
        };
        let mut current: Vec<usize> = Vec::new();
        let mut in_directives = false;

        for line in content.lines() {
            let line = match line.find('#') {
                Some(idx) => &line[..idx],
                None => line,
            }
            .trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                current.clear();
                in_directives = false;
                continue;
            };
            let value = value.trim();

            let directive = match key.trim().to_ascii_lowercase().as_str() {
                "user-agent" => {
                    if in_directives {
                        current.clear();
                        in_directives = false;
                    }
                    let idx = policy.block_index(value);
                    if !current.contains(&idx) {
                        current.push(idx);
                    }
                    continue;
                }
                "sitemap" => {
                    if !value.is_empty() {
                        policy.sitemaps.push(value.to_string());
                    }
                    continue;
                }
                "allow" => Directive::Allow,
                "disallow" => Directive::Disallow,
                "crawl-delay" => Directive::CrawlDelay,
                _ => {
                    current.clear();
                    in_directives = false;
                    continue;
                }
            };

            in_directives = true;
            for &idx in &current {
                policy.agents[idx].rules.push(RobotsRule {
                    directive,
                    value: value.to_string(),
                });
            }
        }

        policy
    }

    /// Index of the block for `agent`, creating it if needed
    fn block_index(&mut self, agent: &str) -> usize {
        if let Some(idx) = self
            .agents
            .iter()
            .position(|b| b.agent.eq_ignore_ascii_case(agent))
        {
            return idx;
        }
        self.agents.push(AgentBlock {
            agent: agent.to_string(),
            rules: Vec::new(),
        });
        self.agents.len() - 1
    }

    /// Returns the raw robots.txt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Finds the block for an exact (case-insensitive) agent name
    pub fn block_for(&self, agent: &str) -> Option<&AgentBlock> {
        self.agents
            .iter()
            .find(|b| b.agent.eq_ignore_ascii_case(agent))
    }

    /// Resolves the block a named bot obeys: its own, else the `*` block
    pub fn resolve(&self, bot: &str) -> Option<&AgentBlock> {
        self.block_for(bot).or_else(|| self.block_for("*"))
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// Uses Google's robots.txt matching semantics. Empty content allows all.
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The product token of the bot
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_block_with_sitemap() {
        let policy =
            RobotsPolicy::parse("User-agent: *\nDisallow: /admin/\nSitemap: https://x/sitemap.xml");
        assert_eq!(policy.agents.len(), 1);
        assert_eq!(policy.agents[0].agent, "*");
        assert_eq!(policy.agents[0].paths(Directive::Disallow), vec!["/admin/"]);
        assert_eq!(policy.sitemaps, vec!["https://x/sitemap.xml"]);
    }

    #[test]
    fn test_consecutive_user_agents_share_rules() {
        let policy = RobotsPolicy::parse("User-agent: BotA\nUser-agent: BotB\nDisallow: /x\n");
        assert_eq!(policy.block_for("BotA").unwrap().paths(Directive::Disallow), vec!["/x"]);
        assert_eq!(policy.block_for("botb").unwrap().paths(Directive::Disallow), vec!["/x"]);
    }

    #[test]
    fn test_user_agent_after_directives_starts_new_group() {
        let content = "User-agent: BotA\nDisallow: /a\nUser-agent: BotB\nDisallow: /b\n";
        let policy = RobotsPolicy::parse(content);
        assert_eq!(policy.block_for("BotA").unwrap().paths(Directive::Disallow), vec!["/a"]);
        assert_eq!(policy.block_for("BotB").unwrap().paths(Directive::Disallow), vec!["/b"]);
    }

    #[test]
    fn test_sitemap_does_not_reset_group() {
        let content = "User-agent: *\nSitemap: https://x/s.xml\nDisallow: /private\n";
        let policy = RobotsPolicy::parse(content);
        assert_eq!(policy.block_for("*").unwrap().paths(Directive::Disallow), vec!["/private"]);
    }

    #[test]
    fn test_unknown_directive_resets_group() {
        let content = "User-agent: BotA\nHost: example.com\nDisallow: /orphan\n";
        let policy = RobotsPolicy::parse(content);
        assert!(policy.block_for("BotA").unwrap().rules.is_empty());
    }

    #[test]
    fn test_comments_and_case() {
        let content = "# comment\nUSER-AGENT: GPTBot # inline\nDISALLOW: / \ncrawl-delay: 5\n";
        let policy = RobotsPolicy::parse(content);
        let block = policy.block_for("gptbot").unwrap();
        assert_eq!(block.paths(Directive::Disallow), vec!["/"]);
        assert_eq!(block.paths(Directive::CrawlDelay), vec!["5"]);
    }

    #[test]
    fn test_resolve_falls_back_to_wildcard() {
        let policy = RobotsPolicy::parse("User-agent: GPTBot\nDisallow: /\n\nUser-agent: *\nAllow: /\n");
        assert_eq!(policy.resolve("GPTBot").unwrap().agent, "GPTBot");
        assert_eq!(policy.resolve("ExampleBot").unwrap().agent, "*");

        let only_named = RobotsPolicy::parse("User-agent: GPTBot\nDisallow: /\n");
        assert!(only_named.resolve("ExampleBot").is_none());
    }

    #[test]
    fn test_is_allowed() {
        let policy = RobotsPolicy::parse("User-agent: *\nDisallow: /private\nAllow: /private/public");
        assert!(policy.is_allowed("https://example.com/", "TestBot"));
        assert!(!policy.is_allowed("https://example.com/private", "TestBot"));
        assert!(policy.is_allowed("https://example.com/private/public", "TestBot"));
    }

    #[test]
    fn test_is_allowed_specific_agent() {
        let policy = RobotsPolicy::parse("User-agent: BadBot\nDisallow: /\n\nUser-agent: *\nAllow: /");
        assert!(policy.is_allowed("https://example.com/page", "GoodBot"));
        assert!(!policy.is_allowed("https://example.com/page", "BadBot"));
    }

    #[test]
    fn test_empty_allows_all() {
        let policy = RobotsPolicy::parse("");
        assert!(policy.agents.is_empty());
        assert!(policy.is_allowed("https://example.com/any/path", "TestBot"));
    }
}

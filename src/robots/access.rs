//! Per-bot access classification

use super::parser::{Directive, RobotsPolicy};
use serde::Serialize;
use std::fmt;

/// How much of the site a named bot may crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessStatus {
    /// The only Disallow path is `/`
    FullyBlocked,
    /// Some Disallow paths exist
    PartiallyBlocked,
    /// A block applies but disallows nothing
    Allowed,
    /// Neither a named nor a wildcard block applies
    NoRules,
}

impl AccessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullyBlocked => "fully-blocked",
            Self::PartiallyBlocked => "partially-blocked",
            Self::Allowed => "allowed",
            Self::NoRules => "no-rules",
        }
    }
}

impl fmt::Display for AccessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access summary for one named bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotAccessSummary {
    pub agent: String,
    pub status: AccessStatus,
    pub disallow: Vec<String>,
    pub allow: Vec<String>,
    /// The block the bot resolved to (its own name or `*`)
    pub source_agent: Option<String>,
}

impl BotAccessSummary {
    /// Classifies a named bot against a parsed policy
    pub fn for_bot(policy: &RobotsPolicy, bot: &str) -> Self {
        let Some(block) = policy.resolve(bot) else {
            return Self {
                agent: bot.to_string(),
                status: AccessStatus::NoRules,
                disallow: Vec::new(),
                allow: Vec::new(),
                source_agent: None,
            };
        };

        let disallow = block.paths(Directive::Disallow);
        let allow = block.paths(Directive::Allow);
        let status = if disallow.len() == 1 && disallow[0] == "/" {
            AccessStatus::FullyBlocked
        } else if !disallow.is_empty() {
            AccessStatus::PartiallyBlocked
        } else {
            AccessStatus::Allowed
        };

        Self {
            agent: bot.to_string(),
            status,
            disallow,
            allow,
            source_agent: Some(block.agent.clone()),
        }
    }
}

/// Summarizes every named bot, in the given order
pub fn summarize_bots(policy: &RobotsPolicy, bots: &[String]) -> Vec<BotAccessSummary> {
    bots.iter()
        .map(|bot| BotAccessSummary::for_bot(policy, bot))
        .collect()
}

//! Keyword tables
//!
//! Rules are ordered. Within a list the first rule with a matching trigger
//! wins, and the priority list is always consulted before the general one.

use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::types::KeywordRule;

pub const LIVE_SUPPORT_KEY: &str = "live support";
pub const DEFAULT_KEY: &str = "default";

/// Human hand-off triggers, checked before anything else
pub const ESCALATION_TRIGGERS: &[&str] = &["live support", "human", "agent", "speak", "talk"];

/// Technical-issue rules
const PRIORITY_RULES: &[(&str, &[&str])] = &[
    (
        "down",
        &[
            "down",
            "outage",
            "offline",
            "not loading",
            "unavailable",
            "can't access",
            "cannot access",
        ],
    ),
    (
        "bug",
        &["bug", "error", "broken", "glitch", "not working", "crash"],
    ),
    (
        "slow",
        &["slow", "lag", "performance", "takes forever", "loading time"],
    ),
    ("update", &["update", "upgrade", "new version", "patch"]),
    (
        "feature",
        &["feature request", "new feature", "add a feature", "suggest"],
    ),
];

/// Everything else
const GENERAL_RULES: &[(&str, &[&str])] = &[
    (
        "quote",
        &["quote", "estimate", "how much", "cost", "price", "pricing", "budget"],
    ),
    (
        "internship",
        &["internship", "trainee", "student", "graduate program"],
    ),
    (
        "careers",
        &[
            "career",
            "job",
            "hiring",
            "hire",
            "vacanc",
            "position",
            "join your team",
            "work with you",
            "apply",
        ],
    ),
    (
        "events",
        &["event", "webinar", "workshop", "meetup", "conference"],
    ),
    (
        "investment",
        &["invest", "funding", "partnership", "shareholder"],
    ),
    (
        "web development",
        &[
            "website",
            "web app",
            "web development",
            "web design",
            "landing page",
            "e-commerce",
            "ecommerce",
        ],
    ),
    (
        "mobile app",
        &["mobile", "android", "iphone", "app development"],
    ),
    (
        "digital marketing",
        &["marketing", "seo", "social media", "advertis", "branding"],
    ),
    (
        "services",
        &["service", "what do you do", "what you do", "offer", "solution"],
    ),
    (
        "portfolio",
        &["portfolio", "case stud", "previous work", "clients", "projects"],
    ),
    ("articles", &["blog", "article", "news", "insight"]),
    (
        "about",
        &["about", "who are you", "company", "team", "history", "founded", "mission"],
    ),
    (
        "contact",
        &["contact", "email", "phone", "call", "reach", "address", "office", "location"],
    ),
    (
        "greeting",
        &["hello", "hey", "greetings", "good morning", "good afternoon", "good evening"],
    ),
    ("thanks", &["thank", "thx", "appreciate"]),
    ("goodbye", &["bye", "see you", "farewell"]),
];

/// Complete, ordered rule configuration for one matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub escalation_triggers: Vec<String>,
    #[serde(default = "default_escalation_key")]
    pub escalation_key: String,
    pub priority: Vec<KeywordRule>,
    pub general: Vec<KeywordRule>,
}

fn default_escalation_key() -> String {
    LIVE_SUPPORT_KEY.to_string()
}

fn to_rules(table: &[(&str, &[&str])]) -> Vec<KeywordRule> {
    table
        .iter()
        .map(|(key, triggers)| KeywordRule::new(key, triggers.iter().copied()))
        .collect()
}

impl RuleSet {
    /// The tables the website ships with
    pub fn builtin() -> Self {
        Self {
            escalation_triggers: ESCALATION_TRIGGERS.iter().map(|t| t.to_string()).collect(),
            escalation_key: default_escalation_key(),
            priority: to_rules(PRIORITY_RULES),
            general: to_rules(GENERAL_RULES),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Every response key referenced by the rule set, in check order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.escalation_key.as_str()).chain(
            self.priority
                .iter()
                .chain(self.general.iter())
                .map(|r| r.response_key.as_str()),
        )
    }

    /// Lowercase every trigger so matching only needs to lowercase the input
    pub(crate) fn normalized(mut self) -> Self {
        for trigger in &mut self.escalation_triggers {
            *trigger = trigger.to_lowercase();
        }
        for rule in self.priority.iter_mut().chain(self.general.iter_mut()) {
            for trigger in &mut rule.triggers {
                *trigger = trigger.to_lowercase();
            }
        }
        self
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

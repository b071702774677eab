//! Intent matcher - Maps free text to a response key with ordered substring rules

use std::sync::OnceLock;

use tracing::debug;

use crate::error::RuleError;
use crate::responses::ResponseTable;
use crate::rules::{RuleSet, DEFAULT_KEY};
use crate::types::{IntentMatch, KeywordRule, MatchTier};

/// Validated, read-only rule tables
///
/// Matching is case-insensitive and substring based, so a trigger like
/// "chat" also matches inside "chatbot". The matcher keeps no state between
/// calls and never looks at earlier turns of a conversation.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    rules: RuleSet,
}

impl IntentMatcher {
    /// Build a matcher, checking every key it can return against `responses`
    pub fn new(rules: RuleSet, responses: &ResponseTable) -> Result<Self, RuleError> {
        if !responses.contains(DEFAULT_KEY) {
            return Err(RuleError::MissingDefault);
        }

        for rule in rules.priority.iter().chain(rules.general.iter()) {
            if rule.triggers.is_empty() {
                return Err(RuleError::NoTriggers(rule.response_key.clone()));
            }
            if rule.triggers.iter().any(|t| t.is_empty()) {
                return Err(RuleError::EmptyTrigger(rule.response_key.clone()));
            }
        }
        // An empty trigger would match every input
        if rules.escalation_triggers.iter().any(|t| t.is_empty()) {
            return Err(RuleError::EmptyTrigger(rules.escalation_key.clone()));
        }

        if let Some(key) = rules.keys().find(|key| !responses.contains(key)) {
            return Err(RuleError::UnknownKey(key.to_string()));
        }

        Ok(Self {
            rules: rules.normalized(),
        })
    }

    /// Matcher over the built-in tables
    pub fn builtin() -> Result<Self, RuleError> {
        Self::new(RuleSet::builtin(), &ResponseTable::builtin())
    }

    /// Process-wide matcher over the built-in tables, built on first use
    pub fn shared() -> Result<&'static Self, RuleError> {
        static BUILTIN: OnceLock<IntentMatcher> = OnceLock::new();
        if let Some(matcher) = BUILTIN.get() {
            return Ok(matcher);
        }
        let matcher = Self::builtin()?;
        Ok(BUILTIN.get_or_init(|| matcher))
    }

    /// Return the response key for `input`
    pub fn classify(&self, input: &str) -> &str {
        let input_lower = input.to_lowercase();
        self.find(&input_lower)
            .map(|(key, _, _)| key)
            .unwrap_or(DEFAULT_KEY)
    }

    /// Like [`classify`](Self::classify) but also reports the tier and trigger
    pub fn classify_detailed(&self, input: &str) -> IntentMatch {
        let input_lower = input.to_lowercase();
        let result = match self.find(&input_lower) {
            Some((key, tier, trigger)) => {
                IntentMatch::new(key.to_string(), tier, Some(trigger.to_string()))
            }
            None => IntentMatch::new(DEFAULT_KEY.to_string(), MatchTier::Fallback, None),
        };
        debug!(
            key = %result.response_key,
            tier = ?result.tier,
            trigger = ?result.trigger,
            "classified message"
        );
        result
    }

    /// Whether `key` is returned by the technical-issue rules
    pub fn is_priority_key(&self, key: &str) -> bool {
        self.rules.priority.iter().any(|r| r.response_key == key)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    fn find(&self, input_lower: &str) -> Option<(&str, MatchTier, &str)> {
        if let Some(trigger) = first_trigger(input_lower, &self.rules.escalation_triggers) {
            return Some((self.rules.escalation_key.as_str(), MatchTier::Escalation, trigger));
        }
        if let Some((key, trigger)) = first_rule(input_lower, &self.rules.priority) {
            return Some((key, MatchTier::Priority, trigger));
        }
        if let Some((key, trigger)) = first_rule(input_lower, &self.rules.general) {
            return Some((key, MatchTier::General, trigger));
        }
        None
    }
}

fn first_trigger<'a>(input_lower: &str, triggers: &'a [String]) -> Option<&'a str> {
    triggers
        .iter()
        .find(|t| input_lower.contains(t.as_str()))
        .map(String::as_str)
}

fn first_rule<'a>(input_lower: &str, rules: &'a [KeywordRule]) -> Option<(&'a str, &'a str)> {
    rules.iter().find_map(|rule| {
        first_trigger(input_lower, &rule.triggers).map(|t| (rule.response_key.as_str(), t))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> IntentMatcher {
        IntentMatcher::builtin().unwrap()
    }

    #[test]
    fn test_example_scenarios() {
        let m = matcher();
        assert_eq!(m.classify("Is your site down right now?"), "down");
        assert_eq!(m.classify("Can I get a quote for a website?"), "quote");
        assert_eq!(
            m.classify("I want to talk to a live support agent"),
            "live support"
        );
        assert_eq!(m.classify("asdfqwerty nonsense"), "default");
        assert_eq!(
            m.classify("Tell me about your internship program"),
            "internship"
        );
    }

    #[test]
    fn test_escalation_overrides_everything() {
        let m = matcher();
        for input in [
            "LIVE SUPPORT please",
            "the site is down, get me a human",
            "Can I speak to someone about a quote?",
            "who is your agent for careers",
            "let's Talk pricing",
        ] {
            assert_eq!(m.classify(input), "live support", "input: {input}");
        }
        let detailed = m.classify_detailed("I need a HUMAN");
        assert_eq!(detailed.tier, MatchTier::Escalation);
        assert_eq!(detailed.trigger.as_deref(), Some("human"));
    }

    #[test]
    fn test_priority_before_general() {
        let m = matcher();
        assert_eq!(m.classify("my site is down"), "down");
        assert_eq!(m.classify("the pricing page has a bug"), "bug");
        assert_eq!(m.classify("careers page is slow"), "slow");
        assert_eq!(
            m.classify_detailed("website keeps crashing").tier,
            MatchTier::Priority
        );
    }

    #[test]
    fn test_first_match_wins_within_list() {
        let m = matcher();
        // "quote" precedes "careers" in the general list
        assert_eq!(m.classify("I need a job and a quote"), "quote");
        // "down" precedes "bug"
        assert_eq!(m.classify("there's an error and the site is down"), "down");
    }

    #[test]
    fn test_fallback() {
        let m = matcher();
        assert_eq!(m.classify(""), "default");
        assert_eq!(m.classify("zzz"), "default");
        let detailed = m.classify_detailed("");
        assert_eq!(detailed.tier, MatchTier::Fallback);
        assert!(detailed.trigger.is_none());
    }

    #[test]
    fn test_case_insensitive() {
        let m = matcher();
        assert_eq!(m.classify("HIRING"), m.classify("hiring"));
        assert_eq!(m.classify("HIRING"), "careers");
    }

    #[test]
    fn test_substring_not_whole_word() {
        let m = matcher();
        // "talk" inside "stalking" still escalates
        assert_eq!(m.classify("stalking horse"), "live support");
        assert_eq!(m.classify("download the brochure"), "down");
    }

    #[test]
    fn test_idempotent() {
        let m = matcher();
        let input = "Do you offer SEO services?";
        assert_eq!(m.classify(input), m.classify(input));
        assert_eq!(m.classify_detailed(input), m.classify_detailed(input));
    }

    #[test]
    fn test_every_result_has_response() {
        let m = matcher();
        let table = ResponseTable::builtin();
        for input in ["", "hi", "bug", "events", "ünïcödé ☃", "a".repeat(10_000).as_str()] {
            assert!(table.contains(m.classify(input)));
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut rules = RuleSet::builtin();
        rules.general.push(KeywordRule::new("pets", ["dog"]));
        let result = IntentMatcher::new(rules, &ResponseTable::builtin());
        assert!(matches!(result, Err(RuleError::UnknownKey(k)) if k == "pets"));
    }

    #[test]
    fn test_empty_trigger_rejected() {
        let mut rules = RuleSet::builtin();
        rules.priority[0].triggers.push(String::new());
        let result = IntentMatcher::new(rules, &ResponseTable::builtin());
        assert!(matches!(result, Err(RuleError::EmptyTrigger(k)) if k == "down"));
    }

    #[test]
    fn test_mixed_case_triggers_normalized() {
        let mut responses = ResponseTable::builtin();
        responses.insert("pets", "We love pets");
        let mut rules = RuleSet::builtin();
        rules.general.insert(0, KeywordRule::new("pets", ["Dog"]));
        let m = IntentMatcher::new(rules, &responses).unwrap();
        assert_eq!(m.classify("my DOG ate the invoice"), "pets");
    }

    #[test]
    fn test_shared_built_once() {
        let first = IntentMatcher::shared().unwrap();
        let second = IntentMatcher::shared().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.classify("Is your site down right now?"), "down");
    }

    #[test]
    fn test_is_priority_key() {
        let m = matcher();
        assert!(m.is_priority_key("down"));
        assert!(m.is_priority_key("feature"));
        assert!(!m.is_priority_key("quote"));
        assert!(!m.is_priority_key("default"));
    }
}

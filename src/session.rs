//! Chat session logic behind the Tepabot widget
//!
//! [`Tepabot`] owns the immutable tables and decides what the bot says;
//! the caller owns the [`Conversation`] and supplies the current time.

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::configuration::Settings;
use crate::conversation::Conversation;
use crate::error::{ConfigError, RuleError, TicketError};
use crate::matcher::IntentMatcher;
use crate::responses::{ResponseTable, FOLLOW_UP_KEY, TICKET_CONFIRMED_KEY};
use crate::rules::RuleSet;
use crate::ticket::TicketSink;
use crate::types::{MatchTier, SupportTicket, TicketPriority};

const GREETING_KEY: &str = "greeting";

/// Keys the session speaks on its own, independent of any rule
const SESSION_KEYS: &[&str] = &[GREETING_KEY, FOLLOW_UP_KEY, TICKET_CONFIRMED_KEY];

/// Which response keys open the support-ticket form, and at what priority
#[derive(Debug, Clone)]
pub struct TicketPolicy {
    keys: AHashMap<String, TicketPriority>,
}

impl TicketPolicy {
    pub fn new(keys: impl IntoIterator<Item = (String, TicketPriority)>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Ticket priority for the technical-issue rules of `rules`. Outages and
    /// bugs are high, slowness medium, anything else low.
    pub fn for_rules(rules: &RuleSet) -> Self {
        Self::new(rules.priority.iter().map(|rule| {
            let priority = match rule.response_key.as_str() {
                "down" | "bug" => TicketPriority::High,
                "slow" => TicketPriority::Medium,
                _ => TicketPriority::Low,
            };
            (rule.response_key.clone(), priority)
        }))
    }

    pub fn priority_for(&self, key: &str) -> Option<TicketPriority> {
        self.keys.get(key).copied()
    }
}

/// What the bot answered to one user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub message_id: u64,
    pub response_key: String,
    pub text: String,
    pub open_ticket_form: bool,
    pub ticket_priority: Option<TicketPriority>,
}

#[derive(Debug, Clone)]
pub struct Tepabot {
    matcher: IntentMatcher,
    responses: ResponseTable,
    policy: TicketPolicy,
    settings: Settings,
}

impl Tepabot {
    /// Session keys missing from `responses` take their built-in text
    pub fn new(
        rules: RuleSet,
        mut responses: ResponseTable,
        settings: Settings,
    ) -> Result<Self, RuleError> {
        let builtin = ResponseTable::builtin();
        for key in SESSION_KEYS {
            if !responses.contains(key) {
                if let Some(text) = builtin.get(key) {
                    responses.insert(*key, text);
                }
            }
        }

        let policy = TicketPolicy::for_rules(&rules);
        let matcher = IntentMatcher::new(rules, &responses)?;
        Ok(Self {
            matcher,
            responses,
            policy,
            settings,
        })
    }

    /// Built-in tables with default settings
    pub fn builtin() -> Result<Self, RuleError> {
        Self::new(
            RuleSet::builtin(),
            ResponseTable::builtin(),
            Settings::default(),
        )
    }

    /// Tables named by `settings`, falling back to the built-in ones
    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        let rules = settings.load_rules()?;
        let responses = settings.load_responses()?;
        Ok(Self::new(rules, responses, settings)?)
    }

    pub fn with_policy(mut self, policy: TicketPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn matcher(&self) -> &IntentMatcher {
        &self.matcher
    }

    pub fn responses(&self) -> &ResponseTable {
        &self.responses
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Append the opening message with quick actions
    pub fn greet(&self, conversation: &mut Conversation, now: DateTime<Utc>) -> u64 {
        let text = self.responses.text(GREETING_KEY);
        conversation.push_bot(text, now, false, true)
    }

    /// Record the user's message and the bot's answer to it
    pub fn reply(
        &self,
        conversation: &mut Conversation,
        text: &str,
        now: DateTime<Utc>,
    ) -> Reply {
        conversation.push_user(text, now);

        let matched = self.matcher.classify_detailed(text);
        let key = matched.response_key.as_str();
        let answer = self.responses.text(key);
        let is_default = matched.tier == MatchTier::Fallback;
        let is_escalation = matched.tier == MatchTier::Escalation;
        let ticket_priority = self.policy.priority_for(key);

        let message_id = conversation.push_bot(
            answer,
            now,
            !is_default && !is_escalation,
            is_default,
        );

        Reply {
            message_id,
            response_key: key.to_string(),
            text: answer.to_string(),
            open_ticket_form: ticket_priority.is_some(),
            ticket_priority,
        }
    }

    /// Nudge an idle user. Returns the id of the appended message, if any.
    pub fn follow_up(&self, conversation: &mut Conversation, now: DateTime<Utc>) -> Option<u64> {
        if !conversation.is_idle(now, self.settings.inactivity()) {
            return None;
        }
        let id = conversation.push_bot(self.responses.text(FOLLOW_UP_KEY), now, false, true);
        conversation.mark_followed_up();
        Some(id)
    }

    /// Hand a ticket to `sink`. The confirmation is only appended once the
    /// sink accepts it; on failure the conversation is left as it was.
    pub fn submit_ticket(
        &self,
        conversation: &mut Conversation,
        sink: &dyn TicketSink,
        ticket: &SupportTicket,
        now: DateTime<Utc>,
    ) -> Result<u64, TicketError> {
        if let Err(err) = sink.submit(ticket) {
            warn!(error = %err, priority = ticket.priority.as_str(), "ticket submission failed");
            return Err(err);
        }
        info!(priority = ticket.priority.as_str(), "ticket submitted");
        Ok(conversation.push_bot(
            self.responses.text(TICKET_CONFIRMED_KEY),
            now,
            false,
            false,
        ))
    }
}

//! Core data types shared by the matcher, the conversation log and tickets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Bot,
}

/// One turn of a chat conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: u64,
    pub author: Author,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub awaiting_feedback: bool,
    pub has_quick_actions: bool,
}

/// An ordered rule: any trigger occurring in the input selects `response_key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub triggers: Vec<String>,
    pub response_key: String,
}

/// Which stage of classification produced a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Escalation,
    Priority,
    General,
    Fallback,
}

/// Detailed classification result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentMatch {
    pub response_key: String,
    pub tier: MatchTier,
    pub trigger: Option<String>, // None for the fallback
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

/// Support ticket request, as posted to the contact endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub priority: TicketPriority,
}

impl KeywordRule {
    pub fn new<I, S>(response_key: &str, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            triggers: triggers.into_iter().map(Into::into).collect(),
            response_key: response_key.to_string(),
        }
    }
}

impl IntentMatch {
    pub fn new(response_key: String, tier: MatchTier, trigger: Option<String>) -> Self {
        Self {
            response_key,
            tier,
            trigger,
        }
    }
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
        }
    }
}

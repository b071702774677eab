//! Canned response texts keyed by response key

use std::collections::HashMap;

use ahash::AHashMap;

use crate::error::RuleError;
use crate::rules::DEFAULT_KEY;

pub const FOLLOW_UP_KEY: &str = "follow up";
pub const TICKET_CONFIRMED_KEY: &str = "ticket confirmed";

/// Labels shown as quick-action buttons under fallback and greeting replies
pub const QUICK_ACTIONS: &[&str] = &[
    "Our services",
    "Get a quote",
    "Careers",
    "Events",
    "Live support",
];

const BUILTIN_RESPONSES: &[(&str, &str)] = &[
    (
        DEFAULT_KEY,
        "I'm not sure I understood that. You can ask me about our services, pricing, careers or events, or pick one of the options below.",
    ),
    (
        "live support",
        "I'll connect you with a member of our team. Leave your name and email and someone will get back to you shortly, usually within one business day.",
    ),
    (
        "down",
        "Sorry to hear the site is unavailable. Our team monitors uptime around the clock.\n\nPlease open a support ticket below so we can look into it right away.",
    ),
    (
        "bug",
        "Thanks for reporting this. Please describe what you were doing when the problem appeared and open a support ticket so our developers can reproduce it.",
    ),
    (
        "slow",
        "Performance issues can have many causes: hosting, heavy assets or third-party scripts.\n\nOpen a support ticket and we'll run a performance audit.",
    ),
    (
        "update",
        "We roll out updates and security patches regularly. If you need a specific update applied, open a support ticket and we'll schedule it.",
    ),
    (
        "feature",
        "We love hearing ideas! Open a ticket with your feature request and our product team will review it.",
    ),
    (
        "quote",
        "Every project is different, so we prepare tailored quotes.\n\nTell us about your goals through the contact form and we'll send an estimate within 48 hours.",
    ),
    (
        "internship",
        "Our internship program runs twice a year and pairs each intern with a senior mentor. Check the Careers page for the next intake.",
    ),
    (
        "careers",
        "We're always looking for talented people! Browse our open positions on the Careers page and apply directly from there.",
    ),
    (
        "events",
        "We host webinars, workshops and meetups throughout the year. See the Events page for upcoming dates and registration.",
    ),
    (
        "investment",
        "For investment and partnership enquiries, please reach out through the contact form and our management team will follow up.",
    ),
    (
        "web development",
        "We design and build fast, responsive websites and web applications, from landing pages to full e-commerce platforms.",
    ),
    (
        "mobile app",
        "We build native and cross-platform mobile apps for Android and iOS, from prototype to store release.",
    ),
    (
        "digital marketing",
        "Our digital marketing team covers SEO, social media, paid advertising and branding to help you grow online.",
    ),
    (
        "services",
        "We offer:\n• Web development\n• Mobile apps\n• UI/UX design\n• Digital marketing and SEO\n• Maintenance and support",
    ),
    (
        "portfolio",
        "Take a look at our Portfolio page for case studies of recent client projects.",
    ),
    (
        "articles",
        "Our blog covers web development, design and digital marketing insights. Visit the Articles page to read the latest posts.",
    ),
    (
        "about",
        "We're a digital-services agency helping businesses build and grow their online presence with a multidisciplinary team of developers, designers and marketers.",
    ),
    (
        "contact",
        "You can reach us through the contact form, by email, or by phone during office hours. All details are on the Contact page.",
    ),
    (
        "greeting",
        "Hi! I'm Tepabot. How can I help you today?",
    ),
    ("thanks", "You're welcome! Anything else I can help with?"),
    ("goodbye", "Thanks for chatting with us. Have a great day!"),
    (
        FOLLOW_UP_KEY,
        "Are you still there? Let me know if there's anything else I can help you with.",
    ),
    (
        TICKET_CONFIRMED_KEY,
        "Your support ticket has been submitted. Our team will contact you soon.",
    ),
];

/// Key to canned text map, always holding a `"default"` entry
#[derive(Debug, Clone)]
pub struct ResponseTable {
    entries: AHashMap<String, String>,
}

impl ResponseTable {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Result<Self, RuleError> {
        let entries: AHashMap<String, String> = entries.into_iter().collect();
        if !entries.contains_key(DEFAULT_KEY) {
            return Err(RuleError::MissingDefault);
        }
        Ok(Self { entries })
    }

    pub fn builtin() -> Self {
        let entries = BUILTIN_RESPONSES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { entries }
    }

    /// Parse a flat JSON object of `key: text` pairs
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let map: HashMap<String, String> = serde_json::from_str(json)?;
        Self::new(map)
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Text for `key`, or the default text when the key is unknown
    pub fn text(&self, key: &str) -> &str {
        self.get(key)
            .or_else(|| self.get(DEFAULT_KEY))
            .unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResponseTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_default() {
        let table = ResponseTable::builtin();
        assert!(table.contains("default"));
        assert!(table.contains("live support"));
    }

    #[test]
    fn test_unknown_key_falls_back() {
        let table = ResponseTable::builtin();
        assert_eq!(table.text("no such key"), table.text("default"));
    }

    #[test]
    fn test_missing_default_rejected() {
        let result = ResponseTable::from_json(r#"{"quote": "Ask us"}"#);
        assert!(matches!(result, Err(RuleError::MissingDefault)));
    }

    #[test]
    fn test_from_json() {
        let table =
            ResponseTable::from_json(r#"{"default": "Pardon?", "quote": "Ask us"}"#).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.text("quote"), "Ask us");
    }
}

//! Error types

use thiserror::Error;

/// Problems found while assembling rule and response tables
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("response table has no \"default\" entry")]
    MissingDefault,

    #[error("rule key \"{0}\" has no entry in the response table")]
    UnknownKey(String),

    #[error("rule \"{0}\" has no triggers")]
    NoTriggers(String),

    #[error("rule \"{0}\" contains an empty trigger")]
    EmptyTrigger(String),

    #[error("failed to parse table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure reported by a ticket sink
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("network error: {0}")]
    Network(String),

    #[error("ticket rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("failed to encode ticket: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failure while loading settings or table files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Rules(#[from] RuleError),
}

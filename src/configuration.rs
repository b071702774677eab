//! Runtime settings for hosts embedding the chatbot

use std::path::Path;

use chrono::Duration;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::responses::ResponseTable;
use crate::rules::RuleSet;

pub const ENV_PREFIX: &str = "TEPABOT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Quiet period before the bot re-engages an idle user
    pub inactivity_secs: u64,
    /// Simulated typing delay the widget waits before showing a reply
    pub typing_delay_ms: u64,
    pub log_level: String,
    pub rules_path: Option<String>,
    pub responses_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inactivity_secs: 60,
            typing_delay_ms: 800,
            log_level: "info".to_string(),
            rules_path: None,
            responses_path: None,
        }
    }
}

impl Settings {
    pub fn inactivity(&self) -> Duration {
        Duration::seconds(i64::from(u32::try_from(self.inactivity_secs).unwrap_or(u32::MAX)))
    }

    /// Rule tables from `rules_path`, or the built-in ones
    pub fn load_rules(&self) -> Result<RuleSet, ConfigError> {
        match &self.rules_path {
            Some(path) => Ok(RuleSet::from_json(&read(path)?)?),
            None => Ok(RuleSet::builtin()),
        }
    }

    /// Response table from `responses_path`, or the built-in one
    pub fn load_responses(&self) -> Result<ResponseTable, ConfigError> {
        match &self.responses_path {
            Some(path) => Ok(ResponseTable::from_json(&read(path)?)?),
            None => Ok(ResponseTable::builtin()),
        }
    }
}

fn read(path: &str) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })
}

/// Load settings from an optional file (`.toml`, `.yaml` or `.json`) and
/// `TEPABOT_*` environment variables, in that order of precedence
pub fn get_configuration(file: Option<&Path>) -> Result<Settings, ConfigError> {
    let defaults = Settings::default();
    let mut builder = config::Config::builder()
        .set_default("inactivity_secs", defaults.inactivity_secs)?
        .set_default("typing_delay_ms", defaults.typing_delay_ms)?
        .set_default("log_level", defaults.log_level)?;

    builder = match file {
        Some(path) => builder.add_source(config::File::from(path)),
        None => builder.add_source(config::File::with_name("tepabot").required(false)),
    };

    let settings = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();

        let settings = get_configuration(Some(file.path())).unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.typing_delay_ms, 800);
    }

    // Only this test reads or writes TEPABOT_INACTIVITY_SECS or asserts on
    // inactivity_secs, so it cannot race the others.
    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "inactivity_secs = 30\nlog_level = \"warn\"").unwrap();

        std::env::set_var("TEPABOT_INACTIVITY_SECS", "45");
        let result = get_configuration(Some(file.path()));
        std::env::remove_var("TEPABOT_INACTIVITY_SECS");

        let settings = result.unwrap();
        assert_eq!(settings.inactivity_secs, 45);
        assert_eq!(settings.inactivity(), Duration::seconds(45));
        assert_eq!(settings.log_level, "warn");

        let settings = get_configuration(Some(file.path())).unwrap();
        assert_eq!(settings.inactivity_secs, 30);
    }

    #[test]
    fn test_no_file_uses_defaults() {
        // No tepabot.* file sits in the crate root
        let settings = get_configuration(None).unwrap();
        assert_eq!(settings.typing_delay_ms, 800);
        assert_eq!(settings.log_level, "info");
        assert!(settings.rules_path.is_none());
        assert!(settings.responses_path.is_none());
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = get_configuration(Some(Path::new("/nonexistent/tepabot.toml")));
        assert!(matches!(result, Err(ConfigError::Config(_))));
    }

    #[test]
    fn test_load_tables_from_json_files() {
        let mut responses = tempfile::NamedTempFile::new().unwrap();
        write!(responses, r#"{{"default": "Huh?", "live support": "One moment"}}"#).unwrap();
        let mut rules = tempfile::NamedTempFile::new().unwrap();
        write!(
            rules,
            r#"{{"escalation_triggers": ["human"], "priority": [], "general": []}}"#
        )
        .unwrap();

        let settings = Settings {
            rules_path: Some(rules.path().display().to_string()),
            responses_path: Some(responses.path().display().to_string()),
            ..Settings::default()
        };
        let table = settings.load_responses().unwrap();
        assert_eq!(table.text("anything"), "Huh?");
        let rule_set = settings.load_rules().unwrap();
        assert!(rule_set.general.is_empty());
    }

    #[test]
    fn test_unreadable_table_path() {
        let settings = Settings {
            responses_path: Some("/nonexistent/responses.json".into()),
            ..Settings::default()
        };
        assert!(matches!(
            settings.load_responses(),
            Err(ConfigError::Io { .. })
        ));
    }
}

//! Python bindings for the chatbot core using PyO3

use chrono::Utc;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::configuration::Settings;
use crate::conversation::Conversation;
use crate::matcher::IntentMatcher;
use crate::responses::ResponseTable;
use crate::rules::RuleSet;
use crate::session::Tepabot;

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyErr::new::<PyValueError, _>(err.to_string())
}

fn load_tables(
    rules_json: Option<&str>,
    responses_json: Option<&str>,
) -> PyResult<(RuleSet, ResponseTable)> {
    let rules = match rules_json {
        Some(json) => RuleSet::from_json(json).map_err(value_error)?,
        None => RuleSet::builtin(),
    };
    let responses = match responses_json {
        Some(json) => ResponseTable::from_json(json).map_err(value_error)?,
        None => ResponseTable::builtin(),
    };
    Ok((rules, responses))
}

/// Classify with the built-in tables (Python function)
#[pyfunction]
pub fn py_classify(input: &str) -> PyResult<String> {
    let matcher = IntentMatcher::shared().map_err(value_error)?;
    Ok(matcher.classify(input).to_string())
}

/// Python wrapper for the intent matcher
#[pyclass]
pub struct PyIntentMatcher {
    matcher: IntentMatcher,
}

#[pymethods]
impl PyIntentMatcher {
    /// Tables are JSON strings; omitted ones use the built-in tables
    #[new]
    #[pyo3(signature = (rules_json=None, responses_json=None))]
    fn new(rules_json: Option<&str>, responses_json: Option<&str>) -> PyResult<Self> {
        let (rules, responses) = load_tables(rules_json, responses_json)?;
        let matcher = IntentMatcher::new(rules, &responses).map_err(value_error)?;
        Ok(Self { matcher })
    }

    fn classify(&self, input: &str) -> String {
        self.matcher.classify(input).to_string()
    }

    /// Classification with tier and trigger
    fn classify_detailed<'py>(&self, input: &str, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let m = self.matcher.classify_detailed(input);
        let tier = serde_json::to_value(m.tier).map_err(value_error)?;
        let dict = PyDict::new_bound(py);
        dict.set_item("response_key", m.response_key)?;
        dict.set_item("tier", tier.as_str().unwrap_or_default())?;
        dict.set_item("trigger", m.trigger)?;
        Ok(dict)
    }

    fn is_priority_key(&self, key: &str) -> bool {
        self.matcher.is_priority_key(key)
    }
}

/// Python wrapper holding one chat conversation
#[pyclass]
pub struct PyChatSession {
    bot: Tepabot,
    conversation: Conversation,
}

#[pymethods]
impl PyChatSession {
    #[new]
    #[pyo3(signature = (rules_json=None, responses_json=None, inactivity_secs=None))]
    fn new(
        rules_json: Option<&str>,
        responses_json: Option<&str>,
        inactivity_secs: Option<u64>,
    ) -> PyResult<Self> {
        let (rules, responses) = load_tables(rules_json, responses_json)?;
        let mut settings = Settings::default();
        if let Some(secs) = inactivity_secs {
            settings.inactivity_secs = secs;
        }
        let bot = Tepabot::new(rules, responses, settings).map_err(value_error)?;
        Ok(Self {
            bot,
            conversation: Conversation::new(),
        })
    }

    fn greet(&mut self) -> u64 {
        self.bot.greet(&mut self.conversation, Utc::now())
    }

    /// Send a user message; returns the bot reply as a dict
    fn reply<'py>(&mut self, text: &str, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let reply = self.bot.reply(&mut self.conversation, text, Utc::now());
        let dict = PyDict::new_bound(py);
        dict.set_item("message_id", reply.message_id)?;
        dict.set_item("response_key", reply.response_key)?;
        dict.set_item("text", reply.text)?;
        dict.set_item("open_ticket_form", reply.open_ticket_form)?;
        dict.set_item("ticket_priority", reply.ticket_priority.map(|p| p.as_str()))?;
        Ok(dict)
    }

    fn follow_up(&mut self) -> Option<u64> {
        self.bot.follow_up(&mut self.conversation, Utc::now())
    }

    fn resolve_feedback(&mut self, message_id: u64) -> bool {
        self.conversation.resolve_feedback(message_id)
    }

    /// Conversation log serialized as JSON
    fn messages_json(&self) -> PyResult<String> {
        serde_json::to_string(self.conversation.messages()).map_err(value_error)
    }

    fn reset(&mut self) {
        self.conversation.reset();
    }

    fn __len__(&self) -> usize {
        self.conversation.len()
    }
}

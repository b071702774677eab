//! Tepabot core - Keyword-based intent matching for the agency website chatbot
//!
//! This crate maps free-text visitor messages to canned responses, keeps the
//! conversation log for a chat session and raises support tickets.

pub mod types;
pub mod error;
pub mod rules;
pub mod responses;
pub mod matcher;
pub mod conversation;
pub mod ticket;
pub mod configuration;
pub mod session;
pub mod telemetry;

pub use types::*;
pub use error::*;
pub use rules::{RuleSet, DEFAULT_KEY, LIVE_SUPPORT_KEY};
pub use responses::ResponseTable;
pub use matcher::*;
pub use conversation::*;
pub use ticket::*;
pub use configuration::{get_configuration, Settings};
pub use session::*;

// Python bindings
#[cfg(feature = "extension-module")]
pub mod py;

#[cfg(feature = "extension-module")]
use pyo3::prelude::*;

#[cfg(feature = "extension-module")]
#[pymodule]
fn tepabot_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use py::*;
    m.add_class::<PyIntentMatcher>()?;
    m.add_class::<PyChatSession>()?;
    m.add_function(wrap_pyfunction!(py_classify, m)?)?;
    Ok(())
}

//! Tracing subscriber setup for binaries

use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Subscriber writing compact lines to stderr. `RUST_LOG` wins over `env_filter`.
pub fn get_subscriber(env_filter: &str) -> impl Subscriber + Send + Sync {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
}

pub fn init_subscriber(
    subscriber: impl Subscriber + Send + Sync,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(subscriber)
}

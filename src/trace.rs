//! Tracing

use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

use crate::config::TraceConfig;

/// Tracing setup error
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// The filter directive does not parse
    #[error("invalid trace filter: {0}")]
    InvalidFilter(#[from] tracing_subscriber::filter::ParseError),
    /// A global subscriber is already installed
    #[error("tracing already initialized: {0}")]
    AlreadySet(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initializes the tracer
pub fn init_tracer(cfg: &TraceConfig) -> Result<(), TraceError> {
    // -> STDERR, stdout belongs to the terminal UI
    if cfg.stdout {
        let layer_stdout = tracing_subscriber::fmt::Layer::default().with_writer(std::io::stderr);
        let layer_filter = tracing_subscriber::EnvFilter::builder().parse(cfg.filter.as_str())?;

        let trc_subscriber = tracing_subscriber::Registry::default()
            .with(layer_stdout)
            .with(layer_filter);
        tracing::subscriber::set_global_default(trc_subscriber)?;
    }
    Ok(())
}

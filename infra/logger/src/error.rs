use thiserror::Error;

/// Errors that can occur while installing the diagnostic subscriber.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// A global tracing subscriber is already installed for this process.
    #[error("diagnostic subscriber already installed: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),

    /// The programmatic env filter did not parse.
    #[error("invalid log filter `{filter}`: {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
}

//! Error handling for the streaming layer
//!
//! Transient overload is deliberately *not* represented here: superseded
//! events are dropped by design and only surface as discard counts in the
//! logs. The error type covers recoverable and lifecycle failures.

use thiserror::Error;

/// Main error type for streaming operations
#[derive(Error, Debug)]
pub enum StreamError {
    /// The downstream sink rejected an event. Recoverable per iteration;
    /// the consumer loop logs it and continues.
    #[error("Sink error: {0}")]
    Sink(String),

    /// Lifecycle misuse: the consumer task was already started.
    #[error("Pipeline '{0}' already started")]
    AlreadyStarted(String),

    /// Errors related to curve model parsing
    #[error("Invalid curve model: {0}")]
    Model(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors (thread spawn, config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for streaming operations
pub type Result<T> = std::result::Result<T, StreamError>;

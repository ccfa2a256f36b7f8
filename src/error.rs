//! # Error Types
//!
//! Two error families live here:
//!
//! - [`ListenerError`] is what an [`ExecutionListener`](crate::events::ExecutionListener)
//!   returns when it cannot handle an event. The queue hands it back to the dispatcher
//!   untouched.
//! - [`EventQueueError`] covers everything else the crate can fail on (configuration)
//!   and can absorb a `ListenerError` for hosts that want a single error type.

use thiserror::Error;

/// Failure raised by a listener while handling an execution event
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The listener refused the event (for example a guard on the payload failed)
    #[error("Listener rejected event: {reason}")]
    Rejected { reason: String },

    /// The listener failed while processing the event
    #[error("Listener failed: {0}")]
    Failed(String),

    /// Any other error bubbled up from the listener body
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ListenerError {
    /// Create a rejection with the given reason
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Create a processing failure with the given message
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum EventQueueError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Configuration source error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

pub type Result<T> = std::result::Result<T, EventQueueError>;

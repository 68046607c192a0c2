use std::error::Error;

use thiserror::Error;
use tokio::runtime::TryCurrentError;

type BoxError = Box<dyn Error + Send + Sync>;

/// Ready-made terminal error payload for signals.
///
/// `Signal` and `Subscriber` default their error type parameter to this enum, so
/// producers that have no error type of their own can still fail with context.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SignalError {
    /// A named signal failed because of an underlying error.
    #[error("{name} signal emitted an error")]
    Named {
        name: &'static str,
        #[source]
        source: BoxError,
    },

    /// An underlying error without a signal name.
    #[error("signal emitted an error")]
    Source(#[source] BoxError),

    /// A plain message.
    #[error("{0}")]
    Message(String),

    #[error("signal emitted an error")]
    Unspecified,
}

impl SignalError {
    /// Wraps `source` as the failure of the signal called `name`.
    pub fn new(name: &'static str, source: impl Error + Send + Sync + 'static) -> Self {
        SignalError::Named {
            name,
            source: Box::new(source),
        }
    }

    pub fn message(msg: impl Into<String>) -> Self {
        SignalError::Message(msg.into())
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// ```
    /// use signalkit::SignalError;
    ///
    /// assert_eq!(SignalError::message("boom").as_label(), "signal_message");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SignalError::Named { .. } => "signal_named",
            SignalError::Source(_) => "signal_source",
            SignalError::Message(_) => "signal_message",
            SignalError::Unspecified => "signal_unspecified",
        }
    }
}

/// Errors raised while constructing a disposable.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DisposableError {
    /// Future-backed disposal logic needs a Tokio runtime to be spawned on.
    #[error("disposal future created outside of a Tokio runtime")]
    NoRuntime(#[from] TryCurrentError),
}

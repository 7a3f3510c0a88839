//! Error types for warden guards.

use std::{error::Error, fmt, io, time::Duration};

use crate::form::GuardForm;

/// Error type returned by polling callbacks.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Raised when a guard's condition does not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionError {
    message: String,
}

impl AssertionError {
    /// Build an assertion error.
    ///
    /// A caller-supplied `failure_message` always wins over the computed
    /// `description` and is used verbatim.
    pub fn new(description: impl Into<String>, failure_message: Option<&str>) -> Self {
        let message = match failure_message {
            Some(message) => message.to_string(),
            None => description.into(),
        };
        Self { message }
    }

    /// The final message shown to the caller.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for AssertionError {}

/// Raised by `wait_until` once its timeout elapses without a passing value.
#[derive(Debug)]
pub struct WaitUntilTimeout {
    message: String,
    timeout: Duration,
    last_error: Option<BoxError>,
}

impl WaitUntilTimeout {
    /// Build a timeout error, prefixing the caller's failure message when present.
    pub fn new(
        timeout: Duration,
        failure_message: Option<&str>,
        last_error: Option<BoxError>,
    ) -> Self {
        let detail = format!(
            "Timeout of '{}' milliseconds exceeded \
             waiting for callback value to match expectations",
            timeout.as_millis()
        );
        let message = match failure_message {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}: {detail}"),
            _ => detail,
        };
        Self {
            message,
            timeout,
            last_error,
        }
    }

    /// The full timeout message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The timeout that was exceeded.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The failure captured on the final attempt, if any.
    pub fn last_error(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.last_error.as_deref()
    }
}

impl fmt::Display for WaitUntilTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for WaitUntilTimeout {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.last_error
            .as_deref()
            .map(|err| err as &(dyn Error + 'static))
    }
}

/// Error type for warden operations.
#[derive(Debug)]
pub enum WardenError {
    /// A guard's condition did not hold.
    Assertion(AssertionError),
    /// `wait_until` gave up polling.
    Timeout(WaitUntilTimeout),
    /// A guard or derived form was called with arguments it cannot interpret.
    Usage(String),
    /// No guard with this name exists for the requested form.
    UnknownGuard {
        /// The form that was looked up.
        form: GuardForm,
        /// The requested guard name.
        name: String,
    },
    /// Guard groups could not be merged into namespaces.
    Registry(String),
    /// An underlying I/O error.
    Io(io::Error),
    /// A JSON document could not be parsed or produced.
    Json(serde_json::Error),
}

impl WardenError {
    /// Whether this error is a plain assertion failure.
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

impl fmt::Display for WardenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assertion(err) => write!(f, "{err}"),
            Self::Timeout(err) => write!(f, "{err}"),
            Self::Usage(message) => write!(f, "usage error: {message}"),
            Self::UnknownGuard { form, name } => write!(f, "unknown {form} guard: {name}"),
            Self::Registry(message) => write!(f, "registry error: {message}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl Error for WardenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Timeout(err) => err.source(),
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AssertionError> for WardenError {
    fn from(value: AssertionError) -> Self {
        Self::Assertion(value)
    }
}

impl From<WaitUntilTimeout> for WardenError {
    fn from(value: WaitUntilTimeout) -> Self {
        Self::Timeout(value)
    }
}

impl From<io::Error> for WardenError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for WardenError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Convenience result type for warden.
pub type Result<T> = std::result::Result<T, WardenError>;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::FlowError;

/// Destination for diagnostic messages.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str, data: Option<&Value>);
}

/// Forwards messages to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str, data: Option<&Value>) {
        match data {
            Some(data) => tracing::debug!(target: "multi_prompt", data = %data, "{message}"),
            None => tracing::debug!(target: "multi_prompt", "{message}"),
        }
    }
}

/// A sink gated by the `log_on` switch. Cheap to clone.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    enabled: bool,
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>, enabled: bool) -> Self {
        Self { sink, enabled }
    }

    pub fn silent() -> Self {
        Self::new(Arc::new(TracingSink), false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn log(&self, message: &str, data: Option<&Value>) {
        if self.enabled {
            self.sink.log(message, data);
        }
    }

    /// Like [`Logger::log`], but only builds the payload when logging is on.
    pub fn log_with(&self, message: &str, data: impl FnOnce() -> Value) {
        if self.enabled {
            self.sink.log(message, Some(&data()));
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Decides what happens when the flow hits an error.
///
/// Returning `Err` halts the flow. Returning `Ok(())` for a recoverable error
/// skips the offending section and keeps going.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, error: FlowError, log: &Logger) -> Result<(), FlowError>;
}

/// Logs the error and raises it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RaiseOnError;

impl ErrorHandler for RaiseOnError {
    fn handle(&self, error: FlowError, _log: &Logger) -> Result<(), FlowError> {
        tracing::error!(target: "multi_prompt", error = %error, "multi-prompt aborted");
        Err(error)
    }
}

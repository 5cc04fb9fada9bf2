//! Error reporting traits shared across the workspace.

/// Trait implemented by service error types for uniform reporting.
///
/// Every failure surfaced to a caller carries a stable code so transports
/// (CLI JSON output, the WebSocket service) can report errors without
/// knowing the concrete error enum.
pub trait ServiceError: std::error::Error {
    /// Get the error code for reporting.
    ///
    /// Returns a static string like "FLOW_001". These codes are stable and
    /// can be used for programmatic error handling.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    ///
    /// This is typically the same as `Display::fmt` but guaranteed to
    /// return an owned String for flexibility in error reporting.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get captured diagnostic text associated with the error, if any.
    ///
    /// For subprocess failures this is the tool's stderr; for
    /// unrecognizable output it is the full stdout. `None` when there is
    /// nothing beyond the message itself.
    fn detail(&self) -> Option<&str> {
        None
    }

    /// Get the error category for grouping related errors.
    ///
    /// Returns a category like "request", "tool", "internal".
    fn category(&self) -> &'static str;
}

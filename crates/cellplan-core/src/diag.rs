//! Diagnostics reporting for the engine.
//!
//! The engine never holds global logger state. Non-fatal anomalies (near-zero
//! distance, degenerate breakpoint, validity-window excursions) are reported
//! through an injectable sink; callers decide whether advisories end up in a
//! log, in a result's warning list, or both.

/// Receiver for advisory events emitted during a computation.
pub trait DiagnosticsSink {
    /// Report a non-fatal anomaly. The computation continues.
    fn advisory(&mut self, message: String);
}

/// Sink that forwards advisories to the `log` crate.
///
/// Use this for standalone model calls where no result object collects
/// warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn advisory(&mut self, message: String) {
        log::warn!("{message}");
    }
}

/// Sink that collects advisories for attachment to a result.
///
/// Messages are also mirrored to `log::warn!` so nothing is silently
/// discarded even if the buffer is dropped.
#[derive(Debug, Default)]
pub struct DiagnosticsBuffer {
    messages: Vec<String>,
}

impl DiagnosticsBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the collected messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Consume the buffer, returning the collected messages in order.
    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl DiagnosticsSink for DiagnosticsBuffer {
    fn advisory(&mut self, message: String) {
        log::warn!("{message}");
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_collects_in_order() {
        let mut buffer = DiagnosticsBuffer::new();
        buffer.advisory("first".to_string());
        buffer.advisory("second".to_string());
        assert_eq!(buffer.messages(), ["first", "second"]);
        assert_eq!(buffer.into_messages(), vec!["first", "second"]);
    }
}

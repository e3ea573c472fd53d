//! Boundary sink that writes one JSON message per line.

use std::io::Write;

use tracing::{debug, error};
use underpass_core::message::{MessageSink, Outbound};

/// Writes outbound messages as JSON lines to any writer.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
}

impl JsonLinesSink<std::io::Stdout> {
    /// A sink on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Wraps `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwraps the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MessageSink for JsonLinesSink<W> {
    fn send(&mut self, message: Outbound) {
        let line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "outbound message could not be encoded");
                return;
            }
        };
        let written = writeln!(self.writer, "{line}").and_then(|()| self.writer.flush());
        match written {
            Ok(()) => debug!(message = %line, "message sent"),
            Err(e) => error!(error = %e, "boundary write failed"),
        }
    }
}

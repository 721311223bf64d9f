#[cfg(test)]
#[path = "streaming_test.rs"]
mod tests;

const DATA_PREFIX: &str = "data: ";

/// Shown in place of the assistant reply when the exchange fails.
pub const STREAM_ERROR_TEXT: &str = "Sorry, I encountered an error. Please try again.";

/// Returns the payload of a `data: ` framed line. Keep-alives and any other
/// framing yield `None`.
pub fn parse_data_line(line: &str) -> Option<&str> {
    return line.strip_prefix(DATA_PREFIX);
}

/// Client side bookkeeping for the one assistant reply that may be in flight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamingState {
    active: bool,
    buffer: String,
    session_id: Option<String>,
    target: Option<usize>,
}

impl StreamingState {
    pub fn is_active(&self) -> bool {
        return self.active;
    }

    pub fn buffer(&self) -> &str {
        return &self.buffer;
    }

    pub fn session_id(&self) -> Option<&str> {
        return self.session_id.as_deref();
    }

    /// Index of the assistant message receiving streamed text.
    pub fn target(&self) -> Option<usize> {
        return self.target;
    }

    pub fn begin(&mut self, session_id: &str, target: usize) {
        self.active = true;
        self.buffer = "".to_string();
        self.session_id = Some(session_id.to_string());
        self.target = Some(target);
    }

    /// Appends a payload and returns the cumulative reply so far.
    pub fn push(&mut self, payload: &str) -> &str {
        self.buffer += payload;
        return &self.buffer;
    }

    /// Clears the latch, handing back the index of the message that was
    /// being streamed into.
    pub fn finish(&mut self) -> Option<usize> {
        let target = self.target;
        *self = StreamingState::default();
        return target;
    }
}

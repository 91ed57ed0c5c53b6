/// Accumulates a reply as the model streams it.
#[derive(Debug, Default, Clone)]
pub struct StreamingReply {
    buffer: String,
    tokens: usize,
}

impl StreamingReply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: &str) {
        self.buffer.push_str(token);
        self.tokens += 1;
    }

    /// Text received so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn token_count(&self) -> usize {
        self.tokens
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

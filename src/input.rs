/// Maximum length of the in-game typing buffer
pub const MAX_TYPED_LEN: usize = 24;

/// Bounded single-line text buffer used for the nickname and typed words
#[derive(Debug, Clone, PartialEq)]
pub struct TextInput {
    text: String,
    max_len: usize,
}

impl TextInput {
    pub fn new(max_len: usize) -> Self {
        Self {
            text: String::new(),
            max_len,
        }
    }

    pub fn with_text(text: &str, max_len: usize) -> Self {
        let mut input = Self::new(max_len);
        for c in text.chars() {
            input.push(c);
        }
        input
    }

    /// Append a character. Whitespace, control characters and anything past
    /// the length limit are dropped. Returns whether the buffer changed.
    pub fn push(&mut self, c: char) -> bool {
        if c.is_whitespace() || c.is_control() {
            return false;
        }
        if self.len() >= self.max_len {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Trimmed contents, or None when only whitespace was typed
    pub fn trimmed(&self) -> Option<&str> {
        let t = self.text.trim();
        (!t.is_empty()).then_some(t)
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new(MAX_TYPED_LEN)
    }
}

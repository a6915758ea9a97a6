/// Single-line text editor. The cursor is a char index, not a byte offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the content, keeping the cursor where it was when possible.
    pub fn set(&mut self, text: &str) {
        if self.buffer == text {
            return;
        }
        self.buffer = text.to_string();
        self.cursor = self.cursor.min(self.char_len());
    }

    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index();
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn handle_backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.buffer.remove(at);
    }

    pub fn handle_delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index();
            self.buffer.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }
}

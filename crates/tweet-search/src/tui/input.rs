use crossterm::event::{KeyCode, KeyModifiers};

/// Single-line text input with a byte-offset cursor kept on char boundaries
#[derive(Default, Clone, Debug)]
pub struct TextInput {
    pub text: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Offset of the char boundary before the cursor
    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Offset of the char boundary after the cursor
    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.cursor)
    }

    pub fn delete_char_before(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete_char_at(&mut self) {
        let next = self.next_boundary();
        self.text.drain(self.cursor..next);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Start of the word before the cursor, skipping trailing whitespace
    fn word_start_before(&self) -> usize {
        let s = &self.text[..self.cursor];
        let trimmed = s.trim_end();
        trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0)
    }

    pub fn move_word_left(&mut self) {
        self.cursor = self.word_start_before();
    }

    pub fn move_word_right(&mut self) {
        let s = &self.text[self.cursor..];
        let leading = s.len() - s.trim_start().len();
        let word = s[leading..]
            .find(char::is_whitespace)
            .unwrap_or(s.len() - leading);
        self.cursor += leading + word;
    }

    pub fn delete_word_before(&mut self) {
        let start = self.word_start_before();
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Handle an editing key, returns true if the event was consumed
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let has_ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let has_alt = modifiers.contains(KeyModifiers::ALT) || modifiers.contains(KeyModifiers::SUPER);

        match code {
            KeyCode::Char('u') if has_ctrl => self.clear(),
            KeyCode::Char('w') if has_ctrl => self.delete_word_before(),
            KeyCode::Backspace if has_alt => self.delete_word_before(),
            KeyCode::Char('a') if has_ctrl => self.move_start(),
            KeyCode::Home => self.move_start(),
            KeyCode::Char('e') if has_ctrl => self.move_end(),
            KeyCode::End => self.move_end(),
            KeyCode::Char('b') if has_alt => self.move_word_left(),
            KeyCode::Char('f') if has_alt => self.move_word_right(),
            KeyCode::Left if has_alt || has_ctrl => self.move_word_left(),
            KeyCode::Right if has_alt || has_ctrl => self.move_word_right(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Backspace => self.delete_char_before(),
            KeyCode::Delete => self.delete_char_at(),
            KeyCode::Char(c) if !has_ctrl && !has_alt => self.insert_char(c),
            _ => return false,
        }
        true
    }
}

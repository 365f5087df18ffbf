use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

/// Line editor for the search term. The term is applied on every change,
/// `finished` only tells the caller that the input lost focus.
#[derive(Default, Debug)]
pub struct Inputter {
    current_input: String,
    curser_pos: usize,
    finished: bool,
}

#[derive(Default, Clone, Debug, PartialEq)]
pub struct InputResult {
    pub input: String,
    pub finished: bool,
    pub changed: bool,
    pub curser_pos: usize,
}

impl Inputter {
    pub fn read(&mut self, key: KeyEvent) -> InputResult {
        let before = self.current_input.clone();
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) | (KeyCode::Esc, _) => self.finished = true,
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, _) => self.curser_pos = self.curser_pos.saturating_sub(1),
            (KeyCode::Right, _) => {
                self.curser_pos = std::cmp::min(self.curser_pos + 1, self.char_count())
            }
            (KeyCode::Home, _) => self.curser_pos = 0,
            (KeyCode::End, _) => self.curser_pos = self.char_count(),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.clear(),
            (kc, KeyModifiers::NONE) | (kc, KeyModifiers::SHIFT) => self.key(kc),
            _ => {}
        }
        let mut result = self.get();
        result.changed = result.input != before;
        trace!("Input {:?}", result);
        result
    }

    /// Replaces the content and puts the cursor at the end.
    pub fn set(&mut self, s: &str) {
        self.current_input = s.to_string();
        self.curser_pos = self.char_count();
        self.finished = false;
    }

    pub fn get(&self) -> InputResult {
        InputResult {
            input: self.current_input.clone(),
            finished: self.finished,
            changed: false,
            curser_pos: self.curser_pos,
        }
    }

    pub fn clear(&mut self) {
        self.current_input.clear();
        self.curser_pos = 0;
        self.finished = false;
    }

    pub fn value(&self) -> &str {
        &self.current_input
    }

    fn char_count(&self) -> usize {
        self.current_input.chars().count()
    }

    fn backspace(&mut self) {
        if self.curser_pos > 0 {
            self.curser_pos -= 1;
            let at = self.getbytepos();
            self.current_input.remove(at);
        }
    }

    fn delete(&mut self) {
        if self.curser_pos < self.char_count() {
            let at = self.getbytepos();
            self.current_input.remove(at);
        }
    }

    fn key(&mut self, code: KeyCode) {
        if let Some(chr) = code.as_char() {
            let at = self.getbytepos();
            self.current_input.insert(at, chr);
            self.curser_pos += 1;
        }
    }

    fn getbytepos(&self) -> usize {
        self.current_input
            .char_indices()
            .nth(self.curser_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.current_input.len())
    }
}

use std::time::Duration;
use tracing::trace;

use crate::domain::{AppConfig, Error, Message};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &AppConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, Error> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            return Ok(self.handle_key(key, model.raw_keyevents()));
        }
        Ok(None)
    }

    /// Maps a key press to a message. In raw mode every key goes to the search
    /// input, except Tab which still switches the search column.
    pub fn handle_key(&self, key: KeyEvent, raw: bool) -> Option<Message> {
        let message = if raw {
            match key.code {
                KeyCode::Tab => Some(Message::CycleScope),
                _ => Some(Message::RawKey(key)),
            }
        } else {
            match (key.code, key.modifiers) {
                (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
                (KeyCode::Char('q'), _) => Some(Message::Quit),
                (KeyCode::Esc, _) => Some(Message::Exit),
                (KeyCode::Enter, _) => Some(Message::Enter),
                (KeyCode::Up, _) | (KeyCode::Char('k'), _) => Some(Message::MoveUp),
                (KeyCode::Down, _) | (KeyCode::Char('j'), _) => Some(Message::MoveDown),
                (KeyCode::Right, _) | (KeyCode::Char('l'), _) | (KeyCode::PageDown, _) => {
                    Some(Message::NextPage)
                }
                (KeyCode::Left, _) | (KeyCode::Char('h'), _) | (KeyCode::PageUp, _) => {
                    Some(Message::PrevPage)
                }
                (KeyCode::Char('+'), _) => Some(Message::CyclePageSize),
                (KeyCode::Tab, _) => Some(Message::CycleScope),
                (KeyCode::Char('/'), _) => Some(Message::Search),
                (KeyCode::Char('o'), _) => Some(Message::OpenFiles),
                (KeyCode::Char('r'), _) => Some(Message::Reload),
                (KeyCode::Char('e'), _) => Some(Message::Export),
                (KeyCode::Char('y'), _) => Some(Message::CopyRow),
                (KeyCode::Char('?'), _) => Some(Message::Help),
                _ => None,
            }
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> Controller {
        Controller::new(&AppConfig::default())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_table_keys() {
        let c = controller();
        assert_eq!(c.handle_key(press(KeyCode::Char('q')), false), Some(Message::Quit));
        assert_eq!(c.handle_key(press(KeyCode::Char('/')), false), Some(Message::Search));
        assert_eq!(c.handle_key(press(KeyCode::Right), false), Some(Message::NextPage));
        assert_eq!(c.handle_key(press(KeyCode::Char('e')), false), Some(Message::Export));
        assert_eq!(c.handle_key(press(KeyCode::Esc), false), Some(Message::Exit));
        assert_eq!(c.handle_key(press(KeyCode::Char('z')), false), None);
    }

    #[test]
    fn raw_mode_forwards_keys() {
        let c = controller();
        let q = press(KeyCode::Char('q'));
        assert_eq!(c.handle_key(q, true), Some(Message::RawKey(q)));
        assert_eq!(c.handle_key(press(KeyCode::Tab), true), Some(Message::CycleScope));
    }
}

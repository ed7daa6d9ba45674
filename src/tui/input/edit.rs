use chrono::{DateTime, Timelike, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::task::{TaskId, parse_due_date};
use crate::tui::app::{App, Mode};
use crate::util::unicode;

/// Single-line text buffer with a grapheme-aware cursor (byte offset)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    text: String,
    cursor: usize,
}

impl LineEditor {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the contents and put the cursor at the end
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    /// Apply a line-editing key. Returns true if the key was consumed.
    pub fn handle(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => self.clear(),
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => self.cursor = 0,
            KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.cursor = self.text.len()
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.left(),
            KeyCode::Right => self.right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.text.len(),
            _ => return false,
        }
        true
    }
}

/// Typing into the add input. Enter submits and stays in add mode for the
/// next entry; the line is locked while a submission is pending.
pub(super) fn handle_add(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.editor.clear();
            app.store.set_input("");
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            if app.store.is_adding() {
                return;
            }
            if app.store.submit_input().is_some() {
                app.cursor = 0;
                app.scroll_offset = 0;
            }
            if app.editor.text() != app.store.input() {
                app.editor.set(app.store.input());
            }
        }
        _ => {
            if app.store.is_adding() {
                return;
            }
            if app.editor.handle(key) {
                app.store.set_input(app.editor.text());
            }
        }
    }
}

/// Live search: every edit re-filters the list
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.editor.clear();
            app.store.set_search("");
            app.mode = Mode::Navigate;
            app.clamp_cursor();
        }
        KeyCode::Enter => {
            app.editor.clear();
            app.mode = Mode::Navigate;
        }
        _ => {
            if app.editor.handle(key) {
                app.store.set_search(app.editor.text());
                app.cursor = 0;
                app.scroll_offset = 0;
            }
        }
    }
}

/// Due-date prompt. Empty input clears the date; unparseable input keeps
/// the prompt open.
pub(super) fn handle_due(app: &mut App, key: KeyEvent, id: TaskId) {
    match key.code {
        KeyCode::Esc => {
            app.editor.clear();
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => {
            let input = app.editor.text().trim().to_string();
            let due = if input.is_empty() {
                None
            } else {
                match parse_due_date(&input) {
                    Some(d) => Some(d),
                    None => {
                        app.message = Some(format!(
                            "invalid date: {} (use YYYY-MM-DD or YYYY-MM-DDTHH:MM)",
                            input
                        ));
                        return;
                    }
                }
            };
            app.store.set_due_date(id, due);
            app.message = None;
            app.editor.clear();
            app.mode = Mode::Navigate;
        }
        _ => {
            app.editor.handle(key);
        }
    }
}

/// Text to pre-fill the due prompt with, in a form the prompt accepts back
pub(super) fn due_prompt_text(due: Option<DateTime<Utc>>) -> String {
    match due {
        Some(d) if d.hour() == 0 && d.minute() == 0 && d.second() == 0 => {
            d.format("%Y-%m-%d").to_string()
        }
        Some(d) => d.to_rfc3339(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::tests::{press, type_str};
    use crate::tui::render::test_helpers::{test_app, test_app_with};
    use crate::ops::store::StoreConfig;
    use chrono::TimeZone;
    use std::time::Duration;

    #[test]
    fn editor_handles_graphemes() {
        let mut ed = LineEditor::default();
        ed.set("cafe\u{301}");
        ed.backspace();
        assert_eq!(ed.text(), "caf");
        ed.left();
        ed.insert('X');
        assert_eq!(ed.text(), "caXf");
        assert_eq!(ed.cursor(), 3);
        ed.delete();
        assert_eq!(ed.text(), "caX");
    }

    #[test]
    fn ctrl_u_clears_the_line() {
        let mut ed = LineEditor::default();
        ed.set("something");
        assert!(ed.handle(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert_eq!(ed.text(), "");
    }

    #[test]
    fn submit_adds_and_clears_input() {
        let (mut app, _) = test_app(&["old"]);
        app.mode = Mode::Add;
        type_str(&mut app, "  new task ");
        assert_eq!(app.store.input(), "  new task ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.store.tasks()[0].text, "new task");
        assert_eq!(app.editor.text(), "");
        assert_eq!(app.store.input(), "");
        assert_eq!(app.mode, Mode::Add);
    }

    #[test]
    fn input_is_locked_while_adding() {
        let (mut app, clock) = test_app_with(&[], StoreConfig::default());
        app.mode = Mode::Add;
        type_str(&mut app, "slow");
        press(&mut app, KeyCode::Enter);
        assert!(app.store.is_adding());

        type_str(&mut app, "more");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.editor.text(), "slow");
        assert!(app.store.tasks().is_empty());

        clock.advance(Duration::from_millis(200));
        app.tick();
        assert_eq!(app.store.tasks().len(), 1);
        assert_eq!(app.editor.text(), "");
        assert!(!app.store.is_adding());
    }

    #[test]
    fn escape_abandons_input() {
        let (mut app, _) = test_app(&[]);
        app.mode = Mode::Add;
        type_str(&mut app, "draft");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.store.input(), "");
        assert!(app.store.tasks().is_empty());
    }

    #[test]
    fn search_filters_live_and_escape_resets() {
        let (mut app, _) = test_app(&["Buy milk", "Walk dog", "buy bread"]);
        app.mode = Mode::Search;
        type_str(&mut app, "BUY");
        assert_eq!(app.store.search_query(), "BUY");
        assert_eq!(app.rows().len(), 2);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.store.search_query(), "");
        assert_eq!(app.rows().len(), 3);
    }

    #[test]
    fn search_enter_keeps_query() {
        let (mut app, _) = test_app(&["Buy milk", "Walk dog"]);
        app.mode = Mode::Search;
        type_str(&mut app, "dog");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.store.search_query(), "dog");
        assert_eq!(app.rows().len(), 1);
    }

    #[test]
    fn due_prompt_sets_and_clears() {
        let (mut app, _) = test_app(&["a"]);
        let id = app.store.tasks()[0].id;
        app.mode = Mode::Due(id);
        type_str(&mut app, "2025-06-01");
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.store.get(id).unwrap().due_date,
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(app.mode, Mode::Navigate);

        app.mode = Mode::Due(id);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.get(id).unwrap().due_date, None);
    }

    #[test]
    fn due_accepts_local_date_and_time() {
        let (mut app, _) = test_app(&["a"]);
        let id = app.store.tasks()[0].id;
        app.mode = Mode::Due(id);
        type_str(&mut app, "2025-06-01T09:15");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.message.is_none());
        assert_eq!(
            app.store.get(id).unwrap().due_date,
            parse_due_date("2025-06-01T09:15")
        );
        assert!(app.store.get(id).unwrap().due_date.is_some());
    }

    #[test]
    fn invalid_due_keeps_prompt_open() {
        let (mut app, _) = test_app(&["a"]);
        let id = app.store.tasks()[0].id;
        app.mode = Mode::Due(id);
        type_str(&mut app, "next week");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Due(id));
        assert!(app.message.as_deref().unwrap().starts_with("invalid date"));
        assert_eq!(app.store.get(id).unwrap().due_date, None);
    }

    #[test]
    fn due_prompt_text_round_trips() {
        let midnight = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(due_prompt_text(Some(midnight)), "2025-06-01");
        let afternoon = Utc.with_ymd_and_hms(2025, 6, 1, 15, 30, 0).unwrap();
        let text = due_prompt_text(Some(afternoon));
        assert_eq!(parse_due_date(&text), Some(afternoon));
        assert_eq!(due_prompt_text(None), "");
    }
}

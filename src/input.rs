//! Keystroke-level line editing for the raw-mode front ends.
//!
//! Raw mode hands us one key event at a time, so a submission only exists
//! once ENTER arrives. Polling never blocks on a partial line.

use crate::debug_log;
use crate::game_state::UserAction;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

const MAX_LINE_LEN: usize = 64;

#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text typed so far on the current line.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Applies one key press. Returns an action once a line is complete or
    /// the player asks to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Some(UserAction::Exit),
            KeyCode::Char('c' | 'd') if ctrl => Some(UserAction::Exit),
            KeyCode::Char('u') if ctrl => {
                self.buffer.clear();
                None
            }
            KeyCode::Enter => Some(UserAction::Submit(std::mem::take(&mut self.buffer))),
            KeyCode::Backspace => {
                self.buffer.pop();
                None
            }
            KeyCode::Char(c)
                if !ctrl
                    && !key.modifiers.contains(KeyModifiers::ALT)
                    && !c.is_control()
                    && self.buffer.chars().count() < MAX_LINE_LEN =>
            {
                self.buffer.push(c);
                None
            }
            _ => {
                debug_log!("LineEditor::handle_key() - Ignoring key: {:?}", key.code);
                None
            }
        }
    }

    /// Appends pasted text up to the line limit. Control characters, line
    /// breaks included, are dropped so a paste never submits on its own.
    pub fn handle_paste(&mut self, text: &str) {
        let room = MAX_LINE_LEN.saturating_sub(self.buffer.chars().count());
        self.buffer
            .extend(text.chars().filter(|c| !c.is_control()).take(room));
    }

    /// Reads at most one terminal event, waiting no longer than `timeout`.
    pub fn poll_terminal(&mut self, timeout: Duration) -> io::Result<Option<UserAction>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => Ok(self.handle_key(key)),
            Event::Paste(text) => {
                self.handle_paste(&text);
                Ok(None)
            }
            other => {
                debug_log!("LineEditor::poll_terminal() - Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }
}

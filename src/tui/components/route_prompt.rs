//! # Route Prompt
//!
//! One-line input opened with `:` for jumping to an arbitrary path, known or
//! not. Lives in the hint bar's place while open.

use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

/// Events emitted by the route prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    Navigate(String),
    Cancel,
}

#[derive(Debug, Default)]
pub struct RoutePromptState {
    pub buffer: String,
}

impl RoutePromptState {
    pub fn new() -> Self {
        Self {
            buffer: "/".to_string(),
        }
    }
}

impl EventHandler for RoutePromptState {
    type Event = PromptEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<PromptEvent> {
        match event {
            TuiEvent::Escape => Some(PromptEvent::Cancel),
            TuiEvent::Submit => {
                let path = self.buffer.trim();
                if path.is_empty() {
                    Some(PromptEvent::Cancel)
                } else {
                    Some(PromptEvent::Navigate(path.to_string()))
                }
            }
            TuiEvent::Backspace => {
                self.buffer.pop();
                None
            }
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                None
            }
            TuiEvent::Paste(text) => {
                // Paths are single-line
                self.buffer
                    .extend(text.chars().filter(|c| !c.is_control()));
                None
            }
            _ => None,
        }
    }
}

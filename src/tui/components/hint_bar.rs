//! # HintBar Component
//!
//! Bottom line: key hints, or the route prompt while it is open.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;

const HINTS: &str = " ↑↓ Move  Enter Open  Tab Collapse  Bksp Back  : Go to  q Quit ";

pub struct HintBar<'a> {
    /// Prompt buffer when the route prompt is open.
    pub prompt: Option<&'a str>,
}

impl Component for HintBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        match self.prompt {
            Some(buffer) => {
                let line = Line::from(vec![
                    Span::styled(" go to: ", Style::default().fg(Color::Yellow)),
                    Span::raw(buffer.to_string()),
                ]);
                frame.render_widget(line, area);
                let cursor_x = area.x + (" go to: ".width() + buffer.width()) as u16;
                frame.set_cursor_position(Position::new(
                    cursor_x.min(area.right().saturating_sub(1)),
                    area.y,
                ));
            }
            None => {
                let line = Line::from(Span::styled(HINTS, Style::default().fg(Color::DarkGray)));
                frame.render_widget(line, area);
            }
        }
    }
}

//! # TitleBar Component
//!
//! Top status line: application name, current route and a breadcrumb of the
//! active entry.
//!
//! Stateless: every field is a prop supplied by the run loop, so the title
//! bar never reaches into the router or the navigation manager itself.
//!
//! 1. **Known route**: `"erpnav | /compras/recebimento | Compras › Recebimento"`
//! 2. **Unknown route**: `"erpnav | /relatorios | (no matching screen)"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Top status bar component.
pub struct TitleBar {
    pub current_path: String,
    /// `["Compras", "Recebimento"]`; empty when the route matches nothing.
    pub breadcrumb: Vec<String>,
}

impl TitleBar {
    pub fn new(current_path: String, breadcrumb: Vec<String>) -> Self {
        Self {
            current_path,
            breadcrumb,
        }
    }

    fn text(&self) -> String {
        let trail = if self.breadcrumb.is_empty() {
            "(no matching screen)".to_string()
        } else {
            self.breadcrumb.join(" › ")
        };
        format!("erpnav | {} | {}", self.current_path, trail)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.text(),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
        frame.render_widget(line, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_with_breadcrumb() {
        let bar = TitleBar::new(
            "/compras/recebimento".into(),
            vec!["Compras".into(), "Recebimento".into()],
        );
        assert_eq!(bar.text(), "erpnav | /compras/recebimento | Compras › Recebimento");
    }

    #[test]
    fn test_title_for_unknown_route() {
        let bar = TitleBar::new("/relatorios".into(), Vec::new());
        assert_eq!(bar.text(), "erpnav | /relatorios | (no matching screen)");
    }
}

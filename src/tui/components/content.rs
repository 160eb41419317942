//! # Content Pane
//!
//! Placeholder for the screen the current route names. The ERP screens
//! themselves (technical sheets, production orders, ...) live elsewhere; this
//! pane only confirms which one would be shown, or that the route is unknown.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::core::nav::LeafMatch;
use crate::tui::component::Component;

pub struct ContentPane<'a> {
    pub current_path: &'a str,
    pub screen: Option<LeafMatch<'a>>,
}

impl<'a> ContentPane<'a> {
    pub fn new(current_path: &'a str, screen: Option<LeafMatch<'a>>) -> Self {
        Self {
            current_path,
            screen,
        }
    }
}

impl Component for ContentPane<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::NONE)
            .padding(Padding::new(2, 2, 1, 1));

        let paragraph = match self.screen {
            Some(found) => {
                let mut lines = vec![Line::from(Span::styled(
                    found.leaf.label.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ))];
                if let Some(section) = found.parent {
                    lines.push(Line::from(Span::styled(
                        section.label.clone(),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(format!("Route: {}", self.current_path)));
                Paragraph::new(lines)
            }
            None => Paragraph::new(vec![
                Line::from(Span::styled(
                    "Route not found",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("Nothing is registered at {}", self.current_path)),
                Line::from(Span::styled(
                    "Backspace returns to the previous screen",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(Alignment::Left),
        };

        frame.render_widget(paragraph.wrap(Wrap { trim: true }).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_tree;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(path: &str) -> String {
        let tree = sample_tree();
        let mut terminal = Terminal::new(TestBackend::new(50, 10)).unwrap();
        terminal
            .draw(|f| ContentPane::new(path, tree.find_leaf_by_path(path)).render(f, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_known_route_shows_screen_and_section() {
        let text = draw("/compras/recebimento");
        assert!(text.contains("Recebimento"));
        assert!(text.contains("Compras"));
        assert!(text.contains("Route: /compras/recebimento"));
    }

    #[test]
    fn test_unknown_route_shows_notice() {
        let text = draw("/relatorios");
        assert!(text.contains("Route not found"));
        assert!(text.contains("/relatorios"));
    }
}

//! # Sidebar Component
//!
//! Draws the navigation rows produced by `core::projection` and turns cursor
//! and mouse input into high-level sidebar events.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SidebarState` lives in `TuiState` (cursor, scroll offset, hit areas)
//! - `Sidebar` is created each frame with borrowed state and the current rows
//!
//! The cursor follows an id rather than an index, so it survives rows
//! appearing and disappearing when sections open or close.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::projection::{NavRow, RowKind};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Width of the icon-only rail, borders included.
pub const COLLAPSED_WIDTH: u16 = 6;

/// Events emitted by the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEvent {
    SelectLeaf { id: String, parent_id: Option<String> },
    ToggleSection(String),
}

impl SidebarEvent {
    fn for_row(row: &NavRow) -> Self {
        if row.is_section() {
            SidebarEvent::ToggleSection(row.id.clone())
        } else {
            SidebarEvent::SelectLeaf {
                id: row.id.clone(),
                parent_id: row.parent_id.clone(),
            }
        }
    }
}

/// Persistent state for the sidebar.
#[derive(Debug, Default)]
pub struct SidebarState {
    /// Rows currently shown, refreshed by `sync`.
    pub visible_rows: Vec<NavRow>,
    /// Id of the row under the keyboard cursor.
    pub cursor_id: Option<String>,
    /// First visible row when the list is taller than the panel.
    pub offset: usize,
    /// Screen area and id of each drawn row, for mouse hit testing.
    /// Emptied by `sync` until the next render.
    pub row_areas: Vec<(Rect, String)>,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows after a state change, keeping the cursor on the same
    /// entry when it is still visible.
    pub fn sync(&mut self, rows: &[NavRow]) {
        self.visible_rows = rows.iter().filter(|r| r.visible).cloned().collect();
        // Drawn positions describe the old rows
        self.row_areas.clear();

        if self.cursor_index().is_some() {
            return;
        }
        // Cursor row vanished: prefer its section, then the active row, then the top
        let fallback = self
            .cursor_id
            .as_ref()
            .and_then(|id| rows.iter().find(|r| &r.id == id))
            .and_then(|r| r.parent_id.clone())
            .filter(|parent| self.visible_rows.iter().any(|r| &r.id == parent))
            .or_else(|| {
                self.visible_rows
                    .iter()
                    .find(|r| r.active)
                    .map(|r| r.id.clone())
            })
            .or_else(|| self.visible_rows.first().map(|r| r.id.clone()));
        self.cursor_id = fallback;
    }

    pub fn cursor_index(&self) -> Option<usize> {
        let id = self.cursor_id.as_ref()?;
        self.visible_rows.iter().position(|r| &r.id == id)
    }

    /// Place the cursor on `id` if that row is visible.
    pub fn focus(&mut self, id: &str) {
        if self.visible_rows.iter().any(|r| r.id == id) {
            self.cursor_id = Some(id.to_string());
        }
    }

    fn move_cursor(&mut self, down: bool) {
        if self.visible_rows.is_empty() {
            return;
        }
        let last = self.visible_rows.len() - 1;
        let next = match (self.cursor_index(), down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(last),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.cursor_id = Some(self.visible_rows[next].id.clone());
    }

    /// Visible row drawn at the given screen position.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<&NavRow> {
        let position = Position::new(column, row);
        let (_, id) = self
            .row_areas
            .iter()
            .find(|(area, _)| area.contains(position))?;
        self.visible_rows.iter().find(|r| &r.id == id)
    }

    /// Keep the cursor row inside a viewport of `height` rows.
    fn clamp_offset(&mut self, height: usize) {
        let Some(cursor) = self.cursor_index() else {
            self.offset = 0;
            return;
        };
        if height == 0 {
            return;
        }
        if cursor < self.offset {
            self.offset = cursor;
        } else if cursor >= self.offset + height {
            self.offset = cursor + 1 - height;
        }
        let max_offset = self.visible_rows.len().saturating_sub(height);
        self.offset = self.offset.min(max_offset);
    }
}

impl EventHandler for SidebarState {
    type Event = SidebarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SidebarEvent> {
        match event {
            TuiEvent::CursorUp => {
                self.move_cursor(false);
                None
            }
            TuiEvent::CursorDown => {
                self.move_cursor(true);
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar(' ') => {
                let index = self.cursor_index()?;
                self.visible_rows.get(index).map(SidebarEvent::for_row)
            }
            TuiEvent::MouseClick(column, row) => {
                let event = SidebarEvent::for_row(self.hit_test(*column, *row)?);
                let id = match &event {
                    SidebarEvent::SelectLeaf { id, .. } | SidebarEvent::ToggleSection(id) => id,
                };
                self.cursor_id = Some(id.clone());
                Some(event)
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the sidebar.
pub struct Sidebar<'a> {
    state: &'a mut SidebarState,
    collapsed: bool,
}

impl<'a> Sidebar<'a> {
    pub fn new(state: &'a mut SidebarState, collapsed: bool) -> Self {
        Self { state, collapsed }
    }
}

impl Component for Sidebar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.collapsed { "" } else { " ERP " };
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let height = inner.height as usize;
        self.state.clamp_offset(height);
        self.state.row_areas.clear();

        let cursor = self.state.cursor_index();
        let mut lines = Vec::with_capacity(height);
        for (index, row) in self
            .state
            .visible_rows
            .iter()
            .enumerate()
            .skip(self.state.offset)
            .take(height)
        {
            let y = inner.y + (index - self.state.offset) as u16;
            self.state
                .row_areas
                .push((Rect::new(inner.x, y, inner.width, 1), row.id.clone()));
            lines.push(row_line(row, inner.width as usize, cursor == Some(index)));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn row_line(row: &NavRow, width: usize, under_cursor: bool) -> Line<'static> {
    let mut style = if row.active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else if row.is_section() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    if under_cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }

    let Some(label) = &row.label else {
        // Rail: icon only, centered-ish
        return Line::from(Span::styled(format!(" {} ", row.icon), style));
    };

    let indent = "  ".repeat(row.depth as usize);
    let chevron = match &row.kind {
        RowKind::Section {
            chevron: Some(chevron),
            ..
        } => chevron.glyph(),
        _ => " ",
    };
    let prefix = format!("{indent}{chevron} {} ", row.icon);
    let label_width = width.saturating_sub(prefix.width());
    let text = format!("{prefix}{}", truncate_str(label, label_width));
    let padded = format!("{:<width$}", text, width = width);
    Line::from(Span::styled(padded, style))
}

/// Truncate to `max_width` display columns, adding "…" if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::projection::render;
    use crate::core::state::NavigationState;
    use crate::test_support::{sample_tree, set_of};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn synced(state: &NavigationState) -> SidebarState {
        let mut sidebar = SidebarState::new();
        sidebar.sync(&render(&sample_tree(), state));
        sidebar
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_sync_starts_on_active_row() {
        let state = NavigationState::new("produtos", false);
        let sidebar = synced(&state);
        assert_eq!(sidebar.cursor_id.as_deref(), Some("produtos"));
        let ids: Vec<_> = sidebar.visible_rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["dashboard", "compras", "produtos"]);
    }

    #[test]
    fn test_cursor_moves_and_clamps() {
        let state = NavigationState::new("dashboard", false);
        let mut sidebar = synced(&state);
        sidebar.handle_event(&TuiEvent::CursorUp);
        assert_eq!(sidebar.cursor_id.as_deref(), Some("dashboard"));
        sidebar.handle_event(&TuiEvent::CursorDown);
        sidebar.handle_event(&TuiEvent::CursorDown);
        sidebar.handle_event(&TuiEvent::CursorDown);
        assert_eq!(sidebar.cursor_id.as_deref(), Some("produtos"));
    }

    #[test]
    fn test_submit_on_section_toggles_it() {
        let state = NavigationState::new("dashboard", false);
        let mut sidebar = synced(&state);
        sidebar.focus("compras");
        assert_eq!(
            sidebar.handle_event(&TuiEvent::Submit),
            Some(SidebarEvent::ToggleSection("compras".into()))
        );
    }

    #[test]
    fn test_space_on_child_selects_with_parent() {
        let mut state = NavigationState::new("dashboard", false);
        state.expanded_ids = set_of(&["compras"]);
        let mut sidebar = synced(&state);
        sidebar.focus("recebimento");
        assert_eq!(
            sidebar.handle_event(&TuiEvent::InputChar(' ')),
            Some(SidebarEvent::SelectLeaf {
                id: "recebimento".into(),
                parent_id: Some("compras".into())
            })
        );
    }

    #[test]
    fn test_hidden_cursor_row_falls_back_to_section() {
        let mut state = NavigationState::new("dashboard", false);
        state.expanded_ids = set_of(&["compras"]);
        let mut sidebar = synced(&state);
        sidebar.focus("recebimento");

        state.expanded_ids.clear();
        sidebar.sync(&render(&sample_tree(), &state));
        assert_eq!(sidebar.cursor_id.as_deref(), Some("compras"));
    }

    #[test]
    fn test_render_then_click_selects_row() {
        let mut state = NavigationState::new("dashboard", false);
        state.expanded_ids = set_of(&["compras"]);
        let mut sidebar = synced(&state);

        let mut terminal = Terminal::new(TestBackend::new(30, 10)).unwrap();
        terminal
            .draw(|f| Sidebar::new(&mut sidebar, false).render(f, f.area()))
            .unwrap();

        // The title takes the first line, so rows start below it
        assert_eq!(sidebar.row_areas[0].0.y, 1);
        let (area, id) = sidebar.row_areas[3].clone();
        assert_eq!(id, "recebimento");
        let event = sidebar.handle_event(&TuiEvent::MouseClick(area.x + 2, area.y));
        assert_eq!(
            event,
            Some(SidebarEvent::SelectLeaf {
                id: "recebimento".into(),
                parent_id: Some("compras".into())
            })
        );
        assert_eq!(sidebar.cursor_id.as_deref(), Some("recebimento"));
        assert_eq!(sidebar.handle_event(&TuiEvent::MouseClick(29, 9)), None);
    }

    #[test]
    fn test_render_shows_labels_and_chevrons() {
        let mut state = NavigationState::new("recebimento", false);
        state.expanded_ids = set_of(&["compras"]);
        let mut sidebar = synced(&state);

        let mut terminal = Terminal::new(TestBackend::new(30, 10)).unwrap();
        terminal
            .draw(|f| Sidebar::new(&mut sidebar, false).render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("▾ ⇩ Compras"));
        assert!(text.contains("Recebimento"));
        assert!(text.contains("Produtos"));
    }

    #[test]
    fn test_render_collapsed_hides_labels() {
        let state = NavigationState::new("produtos", true);
        let mut sidebar = synced(&state);

        let mut terminal = Terminal::new(TestBackend::new(COLLAPSED_WIDTH, 10)).unwrap();
        terminal
            .draw(|f| Sidebar::new(&mut sidebar, true).render(f, f.area()))
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(!text.contains("Produtos"));
        assert!(text.contains("▤"));
        assert_eq!(sidebar.row_areas.len(), 3);
    }

    #[test]
    fn test_offset_follows_cursor() {
        let mut state = NavigationState::new("dashboard", false);
        state.expanded_ids = set_of(&["compras"]);
        let mut sidebar = synced(&state);
        sidebar.focus("produtos");

        let mut terminal = Terminal::new(TestBackend::new(30, 3)).unwrap();
        terminal
            .draw(|f| Sidebar::new(&mut sidebar, false).render(f, f.area()))
            .unwrap();
        assert_eq!(sidebar.offset, 3);
        assert_eq!(sidebar.row_areas.len(), 2);
        assert_eq!(sidebar.row_areas[1].1, "produtos");
    }

    #[test]
    fn test_click_after_rows_shrink_before_redraw() {
        let mut state = NavigationState::new("dashboard", false);
        state.expanded_ids = set_of(&["compras"]);
        let mut sidebar = synced(&state);

        let mut terminal = Terminal::new(TestBackend::new(30, 10)).unwrap();
        terminal
            .draw(|f| Sidebar::new(&mut sidebar, false).render(f, f.area()))
            .unwrap();
        assert_eq!(sidebar.visible_rows.len(), 5);
        let (last_area, _) = sidebar.row_areas[4].clone();
        let (second_area, _) = sidebar.row_areas[1].clone();

        // Section closes; the click arrives before the next frame
        state.expanded_ids.clear();
        sidebar.sync(&render(&sample_tree(), &state));
        assert_eq!(sidebar.visible_rows.len(), 3);
        assert!(sidebar.row_areas.is_empty());
        assert_eq!(
            sidebar.handle_event(&TuiEvent::MouseClick(last_area.x, last_area.y)),
            None
        );
        assert_eq!(
            sidebar.handle_event(&TuiEvent::MouseClick(second_area.x, second_area.y)),
            None
        );

        // Fresh frame: clicks resolve against the new rows
        terminal
            .draw(|f| Sidebar::new(&mut sidebar, false).render(f, f.area()))
            .unwrap();
        assert_eq!(
            sidebar.handle_event(&TuiEvent::MouseClick(last_area.x, 3)),
            Some(SidebarEvent::SelectLeaf {
                id: "produtos".into(),
                parent_id: None
            })
        );
    }

    #[test]
    fn test_hit_test_ignores_ids_no_longer_visible() {
        let state = NavigationState::new("dashboard", false);
        let mut sidebar = synced(&state);
        sidebar
            .row_areas
            .push((Rect::new(0, 1, 10, 1), "recebimento".to_string()));
        assert!(sidebar.hit_test(0, 1).is_none());
    }

    #[test]
    fn test_truncate_str_respects_width() {
        assert_eq!(truncate_str("Produção", 20), "Produção");
        assert_eq!(truncate_str("Ordens de produção", 8), "Ordens …");
        assert_eq!(truncate_str("abc", 0), "");
    }
}

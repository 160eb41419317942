use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws one region of the shell.
///
/// Inputs arrive as struct fields (the route, the rows, the prompt buffer);
/// a component never reaches into the router or the navigation manager.
///
/// `render` takes `&mut self` so a component can write back what it learned
/// while drawing. The sidebar records its row rectangles there, which later
/// mouse clicks are tested against.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A stateful component that turns terminal events into its own events.
pub trait EventHandler {
    type Event;

    /// `None` when the event is not for this component.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}

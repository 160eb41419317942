use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::manager::NavigationManager;
use crate::core::nav::NavTree;
use crate::core::router::Router;
use crate::core::storage::KeyValueStore;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::sidebar::COLLAPSED_WIDTH;
use crate::tui::components::{ContentPane, HintBar, Sidebar, TitleBar};

/// Screen areas for one frame.
pub struct ShellLayout {
    pub title: Rect,
    pub sidebar: Rect,
    pub content: Rect,
    pub hints: Rect,
}

pub fn shell_layout(area: Rect, sidebar_width: u16, collapsed: bool) -> ShellLayout {
    use Constraint::{Length, Min};
    let [title, main, hints] = Layout::vertical([Length(1), Min(0), Length(1)]).areas(area);
    let width = if collapsed { COLLAPSED_WIDTH } else { sidebar_width };
    let [sidebar, content] = Layout::horizontal([Length(width), Min(0)]).areas(main);
    ShellLayout {
        title,
        sidebar,
        content,
        hints,
    }
}

pub fn draw_ui<S: KeyValueStore>(
    frame: &mut Frame,
    nav: &NavigationManager<S>,
    router: &Router,
    tui: &mut TuiState,
) {
    let collapsed = nav.state().collapsed;
    let layout = shell_layout(frame.area(), tui.sidebar_width, collapsed);
    let current_path = router.current_path();

    TitleBar::new(current_path.to_string(), breadcrumb(nav.tree(), current_path))
        .render(frame, layout.title);

    Sidebar::new(&mut tui.sidebar, collapsed).render(frame, layout.sidebar);

    ContentPane::new(current_path, nav.tree().find_leaf_by_path(current_path))
        .render(frame, layout.content);

    HintBar {
        prompt: tui.route_prompt.as_ref().map(|p| p.buffer.as_str()),
    }
    .render(frame, layout.hints);
}

/// Section and leaf labels for the screen at `path`.
pub fn breadcrumb(tree: &NavTree, path: &str) -> Vec<String> {
    let Some(found) = tree.find_leaf_by_path(path) else {
        return Vec::new();
    };
    found
        .parent
        .into_iter()
        .map(|section| section.label.clone())
        .chain(std::iter::once(found.leaf.label.clone()))
        .collect()
}

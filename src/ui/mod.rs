//! UI module for rendering the TUI

mod components;
mod forms;
pub mod layout;

use crate::app::App;
use crate::state::View;
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Draw the main layout with sidebar
    let (sidebar_area, main_area) = layout::create_layout(area);

    // Draw sidebar
    layout::draw_sidebar(frame, sidebar_area, app);

    // Draw main content based on current view
    match app.state.current_view {
        View::CategoryForm => forms::draw_category_form(frame, main_area, app),
        View::ListForm => forms::draw_list_form(frame, main_area, app),
    }

    // Draw status bar
    layout::draw_status_bar(frame, app);

    // Error dialog overlays everything
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message);
    }
}

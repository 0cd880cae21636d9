//! Layout components (sidebar, status bar)

use super::components::{render_sidebar_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Sidebar width in columns
pub const SIDEBAR_WIDTH: u16 = 20;

/// Create the main layout with sidebar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SIDEBAR_WIDTH), // Sidebar
            Constraint::Min(0),                // Main content
        ])
        .split(area);

    // Reserve bottom line for status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(chunks[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Sidebar content
            Constraint::Length(1), // Status bar continuation
        ])
        .split(chunks[0]);

    (sidebar_chunks[0], main_chunks[0])
}

/// Areas of the sidebar buttons, one per view, vertically centered
pub fn sidebar_button_areas(sidebar: Rect) -> Vec<Rect> {
    let total = BUTTON_HEIGHT * View::ALL.len() as u16;
    let top = sidebar.y + sidebar.height.saturating_sub(total) / 2;

    (0..View::ALL.len() as u16)
        .map(|i| Rect {
            x: sidebar.x,
            y: top + i * BUTTON_HEIGHT,
            width: sidebar.width,
            height: BUTTON_HEIGHT.min(sidebar.height),
        })
        .collect()
}

/// View whose sidebar button covers the given screen cell
pub fn sidebar_view_at(screen: Rect, column: u16, row: u16) -> Option<View> {
    let (sidebar, _) = create_layout(screen);
    sidebar_button_areas(sidebar)
        .iter()
        .zip(View::ALL)
        .find(|(area, _)| area.contains(Position::new(column, row)))
        .map(|(_, view)| view)
}

/// Draw the sidebar with boxed buttons
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    for (button_area, view) in sidebar_button_areas(area).into_iter().zip(View::ALL) {
        let key = format!("F{}", view.sidebar_index() + 1);
        render_sidebar_button(
            frame,
            button_area,
            &key,
            view.label(),
            app.state.current_view == view,
            true,
        );
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.state.current_view.label()),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(
            get_view_hints(&app.state.current_view),
            Style::default().fg(Color::Gray),
        ),
    ];

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let quit_hint = " Esc/^C:quit ";

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(view: &View) -> String {
    use crate::platform::{
        APPEND_SHORTCUT, CLEAR_SHORTCUT, COPY_SHORTCUT, REMOVE_SHORTCUT, SUBMIT_SHORTCUT,
    };
    match view {
        View::CategoryForm => format!(
            "Tab:next  ←/→:category  Enter:attach  {CLEAR_SHORTCUT}:clear  {SUBMIT_SHORTCUT}:submit  {COPY_SHORTCUT}:copy"
        ),
        View::ListForm => format!(
            "Tab:next  {APPEND_SHORTCUT}:add  {REMOVE_SHORTCUT}:remove  {CLEAR_SHORTCUT}:clear  {SUBMIT_SHORTCUT}:submit"
        ),
    }
}

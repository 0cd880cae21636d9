//! List form rendering

use super::field_renderer::{draw_field, FIELD_HEIGHT};
use crate::app::App;
use crate::state::{EntryField, ListFocus};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::ops::Range;

/// Window of entries to show so the focused one stays on screen
pub fn visible_range(len: usize, focused: Option<usize>, capacity: usize) -> Range<usize> {
    let capacity = capacity.max(1);
    if len <= capacity {
        return 0..len;
    }
    let focused = focused.unwrap_or(len - 1).min(len - 1);
    let start = (focused + 1).saturating_sub(capacity);
    start..start + capacity
}

/// Draw the list form
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.list_form;
    let focus = form.focus();

    let block = Block::default()
        .title(format!(" List Form ({} entries) ", form.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(FIELD_HEIGHT),     // Entries
            Constraint::Length(BUTTON_HEIGHT), // Submit
            Constraint::Length(1),             // Help text
        ])
        .split(inner);

    let entries_area = chunks[0];
    let capacity = (entries_area.height / FIELD_HEIGHT) as usize;
    let focused_index = match focus {
        ListFocus::Entry { index, .. } => Some(index),
        ListFocus::Submit => None,
    };
    let range = visible_range(form.len(), focused_index, capacity);

    for (row, index) in range.enumerate() {
        let Some((id, entry)) = form.entry_at(index) else {
            continue;
        };
        let row_area = Rect {
            y: entries_area.y + row as u16 * FIELD_HEIGHT,
            height: FIELD_HEIGHT,
            ..entries_area
        };
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(row_area);

        for (column, field) in [EntryField::Tin, EntryField::File].into_iter().enumerate() {
            let input = entry.field(field);
            draw_field(
                frame,
                columns[column],
                &format!("#{} {}", index + 1, input.label),
                input,
                focus == ListFocus::Entry { index, field },
                form.entry_message(id, field),
            );
        }
    }

    let submit_area = chunks[1];
    render_button(
        frame,
        Rect {
            width: submit_area.width.min(14),
            ..submit_area
        },
        "Submit",
        focus == ListFocus::Submit,
        Some(Color::Green),
    );

    let help = Paragraph::new(Line::from(vec![
        Span::styled(
            crate::platform::APPEND_SHORTCUT,
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(": add entry  "),
        Span::styled(
            crate::platform::REMOVE_SHORTCUT,
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(": remove entry  "),
        Span::styled(
            crate::platform::SUBMIT_SHORTCUT,
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(": submit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}

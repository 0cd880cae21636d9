//! Category form rendering

use super::field_renderer::{draw_field, draw_radio_group, FIELD_HEIGHT};
use crate::app::App;
use crate::state::{Category, CategoryField, CategoryFocus, FieldPath};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Draw the category form
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.category_form;
    let focus = form.focus();

    let block = Block::default()
        .title(" Category Form ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    // Dependent fields are only laid out when the category reveals them
    let fields: &[CategoryField] = if form.dependent_fields_visible() {
        &CategoryField::ALL
    } else {
        &[]
    };

    let mut constraints = vec![Constraint::Length(FIELD_HEIGHT)]; // Category
    constraints.extend(fields.iter().map(|_| Constraint::Length(FIELD_HEIGHT)));
    constraints.push(Constraint::Length(BUTTON_HEIGHT)); // Submit
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    let options: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    let selected = form
        .category
        .and_then(|c| Category::ALL.iter().position(|o| *o == c));
    draw_radio_group(
        frame,
        chunks[0],
        "Select Category",
        &options,
        selected,
        focus == CategoryFocus::Category,
        form.message_for(FieldPath::Category),
    );

    for (idx, field) in fields.iter().enumerate() {
        draw_field(
            frame,
            chunks[idx + 1],
            &form.field_label(*field),
            form.field(*field),
            focus == CategoryFocus::Field(*field),
            form.message_for(field.path()),
        );
    }

    let submit_area = chunks[fields.len() + 1];
    render_button(
        frame,
        Rect {
            width: submit_area.width.min(14),
            ..submit_area
        },
        "Submit",
        focus == CategoryFocus::Submit,
        Some(Color::Green),
    );
}

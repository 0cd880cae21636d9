//! Field rendering utilities for forms

use crate::state::FormField;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows taken by one field (border + value + border)
pub const FIELD_HEIGHT: u16 = 3;

/// Draw a form field. A violation message turns the border red and is
/// shown along the bottom edge.
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    field: &FormField,
    is_active: bool,
    error: Option<&str>,
) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let border_style = match (error, is_active) {
        (Some(_), _) => Style::default().fg(Color::Red),
        (None, true) => Style::default().fg(Color::Cyan),
        (None, false) => Style::default().fg(Color::DarkGray),
    };

    let display_value = field.display_value();
    let (display_str, value_style) = if display_value.is_empty() && !is_active {
        ("(empty)".to_string(), Style::default().fg(Color::DarkGray))
    } else {
        (display_value, style)
    };

    let mut spans = vec![Span::styled(display_str, value_style)];
    if is_active {
        spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }
    if field.attachment().is_some() {
        spans.push(Span::styled(" ✓", Style::default().fg(Color::Green)));
    } else if is_active && field.is_file() {
        spans.push(Span::styled(
            "  Enter: attach",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut block = Block::default()
        .title(format!(" {} ", label))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(message) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Draw a horizontal radio group
pub fn draw_radio_group(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    options: &[&str],
    selected: Option<usize>,
    is_active: bool,
    error: Option<&str>,
) {
    let border_style = match (error, is_active) {
        (Some(_), _) => Style::default().fg(Color::Red),
        (None, true) => Style::default().fg(Color::Cyan),
        (None, false) => Style::default().fg(Color::DarkGray),
    };

    let mut spans = Vec::new();
    for (idx, option) in options.iter().enumerate() {
        let checked = selected == Some(idx);
        let marker = if checked { "(•)" } else { "( )" };
        let style = if checked {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("{marker} {option}"), style));
        spans.push(Span::raw("   "));
    }

    let mut block = Block::default()
        .title(format!(" {} ", label))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(message) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(f: impl FnOnce(&mut Frame)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 3)).unwrap();
        terminal.draw(f).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_empty_inactive_field_shows_placeholder() {
        let field = FormField::text("Tin/Bin");
        let text = render(|frame| {
            let area = frame.area();
            draw_field(frame, area, "Tin/Bin", &field, false, None)
        });
        assert!(text.contains("Tin/Bin"));
        assert!(text.contains("(empty)"));
    }

    #[test]
    fn test_error_message_is_rendered() {
        let field = FormField::text("Tin/Bin");
        let text = render(|frame| {
            let area = frame.area();
            draw_field(
                frame,
                area,
                "Tin/Bin",
                &field,
                true,
                Some("Tin/Bin is required"),
            )
        });
        assert!(text.contains("Tin/Bin is required"));
    }

    #[test]
    fn test_radio_group_marks_selection() {
        let text = render(|frame| {
            let area = frame.area();
            draw_radio_group(
                frame,
                area,
                "Select Category",
                &["Regular", "Flagship"],
                Some(1),
                true,
                None,
            )
        });
        assert!(text.contains("( ) Regular"));
        assert!(text.contains("(•) Flagship"));
    }
}

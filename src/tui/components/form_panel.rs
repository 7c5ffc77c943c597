// Form panel component
//
// Centered popup listing one form's fields. The focused field is highlighted;
// choice and lookup fields show their value between ‹ ›.

use crate::farm::FieldKind;
use crate::tui::app::{App, OpenForm};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const PANEL_WIDTH: u16 = 56;
const LABEL_WIDTH: usize = 18;

/// Rect of `width` x `height` centered in `area`, clipped to it
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .split(vertical[1]);
    horizontal[1]
}

pub fn render(f: &mut Frame, area: Rect, app: &App, which: OpenForm) {
    let theme = &app.theme;
    let form = app.form(which);
    let busy = app.form_busy(which);

    let mut lines: Vec<Line> = Vec::with_capacity(form.fields().len() + 2);
    for (i, spec) in form.fields().iter().enumerate() {
        let focused = i == form.cursor();
        let value = form.value_at(i);

        let marker = if spec.required { "*" } else { " " };
        let label = format!("{:<width$}", format!("{}{}", spec.label, marker), width = LABEL_WIDTH);
        let label_style = if focused {
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };

        let shown = match spec.kind {
            FieldKind::Choice(_) | FieldKind::Lookup => {
                let options = app.field_options(which, spec.name);
                if options.is_empty() {
                    "‹ none available ›".to_string()
                } else if value.is_empty() {
                    "‹ choose ›".to_string()
                } else {
                    format!("‹ {} ›", value)
                }
            }
            FieldKind::Date if value.is_empty() && !focused => "YYYY-MM-DD".to_string(),
            _ if focused => format!("{}▏", value),
            _ => value.to_string(),
        };
        let value_style = if focused {
            Style::default().fg(theme.foreground).bg(theme.selection_bg)
        } else if value.is_empty() {
            Style::default().fg(theme.muted)
        } else {
            Style::default().fg(theme.foreground)
        };

        lines.push(Line::from(vec![
            Span::styled(if focused { "▶ " } else { "  " }, label_style),
            Span::styled(label, label_style),
            Span::styled(shown, value_style),
        ]));
    }

    lines.push(Line::default());
    lines.push(if busy {
        Line::styled(
            format!("  {} saving…", app.spinner_char()),
            Style::default().fg(theme.info),
        )
    } else {
        Line::styled(
            "  enter: save   esc: cancel   * required",
            Style::default().fg(theme.muted),
        )
    });

    let height = lines.len() as u16 + 2;
    let popup = centered(area, PANEL_WIDTH, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.highlight))
        .title(Span::styled(
            format!(" {} ", which.title()),
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme.background));

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered(area, 50, 10);
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 10);
        assert_eq!(popup.x, 25);
        assert_eq!(popup.y, 15);
    }

    #[test]
    fn test_centered_clips_to_area() {
        let area = Rect::new(0, 0, 30, 5);
        let popup = centered(area, 56, 12);
        assert_eq!(popup.width, 30);
        assert_eq!(popup.height, 5);
    }
}

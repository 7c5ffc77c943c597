// Status bar component
//
// Backend and uptime on the left, key hints for the current context on the right.

use crate::tui::app::{App, View};
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Key hints for what the user is doing right now
pub fn hints(app: &App, compact: bool) -> &'static str {
    if app.open_form().is_some() {
        return if compact {
            "↑↓ field  ←→ choose  ⏎ save  esc"
        } else {
            "↑/↓ tab: field │ ←/→: choose │ enter: save │ esc: cancel"
        };
    }
    if app.searching {
        return "type to filter │ enter/esc: done";
    }
    match (app.view, compact) {
        (View::Flocks, true) => "n new  / search  c close  q",
        (View::Flocks, false) => {
            "n: new flock │ /: search │ ↑/↓: select │ c: close flock │ R: reload │ q: quit"
        }
        (View::Feed, true) => "a add  r record  tab  q",
        (View::Feed, false) => {
            "a: add feed │ r: record consumption │ tab: switch table │ R: reload │ q: quit"
        }
        (View::Sales, true) => "n new  q",
        (View::Sales, false) => "n: new sale │ 1-3: pages │ ?: help │ q: quit",
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let compact = !Breakpoint::from_width(area.width).at_least(Breakpoint::Wide);

    let left = format!(" {} │ ⏱ {} ", app.backend_label, app.uptime());
    let line = Line::from(vec![
        Span::styled(left, Style::default().fg(theme.foreground)),
        Span::styled("│ ", Style::default().fg(theme.border)),
        Span::styled(hints(app, compact), Style::default().fg(theme.muted)),
    ]);

    let status = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.status_bar)),
    );
    f.render_widget(status, area);
}

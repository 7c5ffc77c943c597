// Views module - screen-level rendering logic
//
// Each page is one view:
// - Flocks: lot summary, search, flock table
// - Feed: stock summary, inventory and consumption tables
// - Sales: revenue summary, sales table
//
// `draw` builds the shell around the current view and layers the form
// panel and toast on top.

mod feed;
mod flocks;
mod sales;

use super::app::{App, View};
use super::components::{activity_panel, form_panel, nav_bar, status_bar};
use super::layout::Breakpoint;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

const ACTIVITY_HEIGHT: u16 = 6;
const ACTIVITY_WIDTH_PCT: u16 = 30;

/// Main render function, called on every frame
pub fn draw(f: &mut Frame, app: &App) {
    let bg = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg, f.area());

    let shell = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(f.area());

    nav_bar::render(f, shell[0], app);
    status_bar::render(f, shell[2], app);

    // Wide terminals put the activity panel beside the page, others below it
    let wide = Breakpoint::from_width(shell[1].width).at_least(Breakpoint::Wide);
    let body = if wide {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(100 - ACTIVITY_WIDTH_PCT),
                Constraint::Percentage(ACTIVITY_WIDTH_PCT),
            ])
            .split(shell[1])
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(ACTIVITY_HEIGHT)])
            .split(shell[1])
    };
    let content = body[0];
    activity_panel::render(f, body[1], &app.activity, &app.theme);

    match app.view {
        View::Flocks => flocks::render(f, content, app),
        View::Feed => feed::render(f, content, app),
        View::Sales => sales::render(f, content, app),
    }

    if let Some(which) = app.open_form() {
        form_panel::render(f, content, app, which);
    }

    if let Some(toast) = &app.toast {
        toast.render(f, f.area(), &app.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, FailingApi};
    use crate::demo::{demo_sales, DemoFarmApi};
    use crate::farm::{Notice, SalesPage};
    use crate::logging::ActivityLog;
    use crate::tui::app::OpenForm;
    use crate::tui::theme::Theme;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_failed_load_renders_empty_state() {
        let api = FailingApi(ApiError::Network("refused".into()));
        let (mut app, mut rx) = App::new(
            Arc::new(api),
            SalesPage::new(),
            Theme::dark(),
            ActivityLog::new(),
            "http://localhost:8080/api",
        );
        app.load_flocks();
        let outcome = rx.recv().await.unwrap();
        app.apply_outcome(outcome);

        let text = screen(&app, 120, 30);
        assert!(text.contains("No flocks found"));
        assert!(text.contains("Load failed"));
    }

    #[tokio::test]
    async fn test_each_view_renders_its_records() {
        let (mut app, mut rx) = App::new(
            Arc::new(DemoFarmApi::seeded()),
            SalesPage::with_records(demo_sales()),
            Theme::dark(),
            ActivityLog::new(),
            "demo",
        );
        app.load_all();
        while app.pending > 0 {
            let outcome = rx.recv().await.unwrap();
            app.apply_outcome(outcome);
        }

        assert!(screen(&app, 160, 30).contains("FL001"));

        app.set_view(View::Feed);
        assert!(screen(&app, 160, 30).contains("Starter feed"));

        app.set_view(View::Sales);
        let text = screen(&app, 160, 30);
        assert!(text.contains("ABC Restaurant"));
        assert!(text.contains("$975.00"));
    }

    #[test]
    fn test_form_panel_and_toast_overlay() {
        let (mut app, _rx) = App::new(
            Arc::new(DemoFarmApi::empty()),
            SalesPage::new(),
            Theme::light(),
            ActivityLog::new(),
            "demo",
        );
        app.toggle_form(OpenForm::CreateFlock);
        app.show_notice(Notice::success("Flock created", "FL001 added"));

        let text = screen(&app, 90, 30);
        assert!(text.contains("New flock"));
        assert!(text.contains("Bird type"));
        assert!(text.contains("Flock created"));
    }
}

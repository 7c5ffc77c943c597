//! Toast notification component
//!
//! A non-blocking overlay that auto-dismisses after a duration set by the
//! notice kind. Renders in the bottom-right corner on top of all other content.

use crate::farm::{Notice, NoticeKind};
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

const SUCCESS_DURATION: Duration = Duration::from_secs(3);
const ERROR_DURATION: Duration = Duration::from_secs(5);

/// Widest a toast gets before its message wraps
const MAX_TOAST_WIDTH: u16 = 60;

pub struct Toast {
    pub notice: Notice,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(notice: Notice) -> Self {
        let duration = if notice.is_error() {
            ERROR_DURATION
        } else {
            SUCCESS_DURATION
        };
        Self::with_duration(notice, duration)
    }

    pub fn with_duration(notice: Notice, duration: Duration) -> Self {
        Self {
            notice,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// Render the toast in the bottom-right corner
    ///
    /// Uses `Clear` widget to ensure toast is visible on top of other content.
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let accent = match self.notice.kind {
            NoticeKind::Success => theme.success,
            NoticeKind::Info => theme.info,
            NoticeKind::Error => theme.error,
        };

        let longest = self
            .notice
            .message
            .lines()
            .map(|l| l.width())
            .chain(std::iter::once(self.notice.title.width()))
            .max()
            .unwrap_or(0) as u16;
        let width = (longest + 4)
            .min(MAX_TOAST_WIDTH)
            .min(area.width.saturating_sub(4));
        let inner_width = width.saturating_sub(2).max(1);

        // Rough wrap estimate: each message line takes ceil(width / inner) rows
        let body_rows: u16 = self
            .notice
            .message
            .lines()
            .map(|l| (l.width() as u16).div_ceil(inner_width).max(1))
            .sum();
        let height = (body_rows + 2).min(area.height.saturating_sub(2));

        let x = area.right().saturating_sub(width + 2);
        let y = area.bottom().saturating_sub(height + 2);
        let toast_area = Rect::new(x, y, width, height);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(accent))
            .title(Line::from(Span::styled(
                format!(" {} ", self.notice.title),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            )))
            .style(Style::default().bg(theme.background));

        let text = Paragraph::new(self.notice.message.as_str())
            .style(Style::default().fg(theme.foreground))
            .wrap(Wrap { trim: true })
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}

//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::truncate_with_ellipsis;
use crate::state::AppState;
use crate::thread_view::{panel_view, render_panel};

pub const CLOSE_HINT: &str = "Esc close";

const KEY_HINTS: &str = "Ctrl+N/Ctrl+P next/prev thread · Tab room info · ↑↓ PgUp PgDn scroll";

pub fn render(app: &AppState, frame: &mut Frame) {
    let [panel_area, hints_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    let view = panel_view(&app.thread_view, CLOSE_HINT);
    render_panel(frame, panel_area, &view, &app.composer);

    let hints = truncate_with_ellipsis(KEY_HINTS, usize::from(hints_area.width));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(Color::DarkGray),
        ))),
        hints_area,
    );
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use skein_core::config::Config;

    use super::*;
    use crate::thread_view::ThreadViewState;

    #[test]
    fn test_render_full_screen_without_thread() {
        let app = AppState::new(Config::default(), ThreadViewState::default());
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();

        terminal.draw(|frame| render(&app, frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Esc close"));
        assert!(text.contains("Ctrl+N/Ctrl+P"));
    }
}

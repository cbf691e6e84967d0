//! Thread panel rendering.
//!
//! Draws a [`PanelView`] with ratatui. Reads props only.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::view::{EventTileProps, PanelView, TimelinePanelProps};
use crate::common::text::{single_line, truncate_with_ellipsis, wrap};
use crate::composer::{self, ComposerState};

/// Root tile: header, body, separator.
const ROOT_TILE_HEIGHT: u16 = 3;

/// Columns reserved for the `HH:MM ` gutter.
const TIME_GUTTER: usize = 6;

const SENDER_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::LightRed,
];

pub fn render_panel(frame: &mut Frame, area: Rect, view: &PanelView, composer: &ComposerState) {
    let dim = Style::default().fg(Color::DarkGray);
    let block = Block::bordered()
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(vec![
            Span::styled(format!("◂ {} ", view.card.previous_phase), dim),
            Span::styled(
                view.card.title,
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]))
        .title_top(
            Line::from(Span::styled(format!(" {} ", view.card.close_hint), dim)).right_aligned(),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let composer_height = composer::composer_height(&view.composer, composer).min(inner.height);

    if let (Some(root), Some(timeline)) = (&view.root, &view.timeline) {
        let [root_area, list_area, composer_area] = Layout::vertical([
            Constraint::Length(ROOT_TILE_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(composer_height),
        ])
        .areas(inner);
        render_event_tile(frame, root_area, root);
        render_timeline(frame, list_area, timeline);
        composer::render_composer(frame, composer_area, &view.composer, composer);
    } else {
        let [_, composer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(composer_height)])
                .areas(inner);
        composer::render_composer(frame, composer_area, &view.composer, composer);
    }
}

/// Renders one event on its own (file-grid shape).
pub fn render_event_tile(frame: &mut Frame, area: Rect, tile: &EventTileProps) {
    let width = usize::from(area.width);
    let event = &tile.event;
    let header = Line::from(vec![
        Span::styled(
            event.sender.clone(),
            Style::default()
                .fg(sender_color(&event.sender))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" · {}", event.short_time()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let body = Line::from(truncate_with_ellipsis(&single_line(&event.body), width));
    let separator = Line::from(Span::styled(
        "─".repeat(width),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(vec![header, body, separator]), area);
}

pub fn render_timeline(frame: &mut Frame, area: Rect, props: &TimelinePanelProps) {
    if area.height == 0 {
        return;
    }
    if props.events.is_empty() {
        let top = area.height / 2;
        let placeholder = Rect::new(area.x, area.y + top, area.width, 1);
        frame.render_widget(
            Paragraph::new(props.empty)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            placeholder,
        );
        return;
    }

    let lines = timeline_lines(props, area.width);
    let height = usize::from(area.height);
    let max_offset = lines.len().saturating_sub(height);
    let offset = props.scroll_offset.min(max_offset);
    let end = lines.len() - offset;
    let start = end.saturating_sub(height);
    frame.render_widget(Paragraph::new(lines[start..end].to_vec()), area);
}

/// Lays the message list out as terminal lines.
///
/// Notif tiles put the time in a left gutter. In the group layout a sender
/// header is only printed when the sender changes.
pub fn timeline_lines(props: &TimelinePanelProps, width: u16) -> Vec<Line<'static>> {
    let body_width = usize::from(width).saturating_sub(TIME_GUTTER).max(1);
    let gutter_blank = " ".repeat(TIME_GUTTER);
    let time_style = Style::default().fg(Color::DarkGray);

    let mut lines = Vec::new();
    let mut previous_sender: Option<&str> = None;
    for event in &props.events {
        let starts_group = previous_sender != Some(event.sender.as_str());
        previous_sender = Some(event.sender.as_str());

        let mut gutter_time = props
            .always_show_timestamps
            .then(|| format!("{:<TIME_GUTTER$}", event.short_time()));

        if starts_group {
            lines.push(Line::from(vec![
                Span::styled(
                    gutter_time.take().unwrap_or_else(|| gutter_blank.clone()),
                    time_style,
                ),
                Span::styled(
                    event.sender.clone(),
                    Style::default()
                        .fg(sender_color(&event.sender))
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }

        for row in wrap(&event.body, body_width) {
            lines.push(Line::from(vec![
                Span::styled(
                    gutter_time.take().unwrap_or_else(|| gutter_blank.clone()),
                    time_style,
                ),
                Span::raw(row),
            ]));
        }
    }
    lines
}

fn sender_color(sender: &str) -> Color {
    let hash = sender
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(usize::from(b)));
    SENDER_COLORS[hash % SENDER_COLORS.len()]
}

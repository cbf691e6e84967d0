//! Composer view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::state::ComposerState;
use crate::thread_view::view::ComposerProps;

const PROMPT: &str = "› ";
const PLACEHOLDER: &str = "Reply to thread…";

/// Rows the composer needs: label and input, a spacer unless compact, and
/// one more while a status message is shown.
pub fn composer_height(props: &ComposerProps, state: &ComposerState) -> u16 {
    let base = if props.compact { 2 } else { 3 };
    base + u16::from(state.status.is_some())
}

pub fn render_composer(frame: &mut Frame, area: Rect, props: &ComposerProps, state: &ComposerState) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let dim = Style::default().fg(Color::DarkGray);
    let label = match props.room_name.as_deref() {
        Some(name) => format!("── Reply in {name} "),
        None => "── Reply ".to_string(),
    };
    let fill = usize::from(area.width).saturating_sub(label.width());
    let mut lines = vec![Line::from(Span::styled(
        format!("{label}{}", "─".repeat(fill)),
        dim,
    ))];

    let input_width = usize::from(area.width).saturating_sub(PROMPT.width());
    let (visible, cursor_col) = visible_input(state, input_width);
    let input = if state.text().is_empty() {
        Span::styled(PLACEHOLDER, dim)
    } else {
        Span::raw(visible)
    };
    lines.push(Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(Color::Cyan)),
        input,
    ]));

    if !props.compact {
        lines.push(Line::default());
    }
    if let Some(status) = &state.status {
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);

    if area.height > 1 {
        let x = area.x + (PROMPT.width() + cursor_col).min(usize::from(area.width) - 1) as u16;
        frame.set_cursor_position((x, area.y + 1));
    }
}

/// Slice of the input that fits in `width` columns with the cursor visible,
/// and the cursor's column within that slice.
fn visible_input(state: &ComposerState, width: usize) -> (String, usize) {
    let chars: Vec<char> = state.text().chars().collect();
    let cursor = state.cursor().min(chars.len());
    if width == 0 {
        return (String::new(), 0);
    }

    // Drop leading characters until the cursor fits on screen.
    let mut start = 0;
    let col = |from: usize| -> usize {
        chars[from..cursor]
            .iter()
            .map(|c| c.width().unwrap_or(0))
            .sum()
    };
    while start < cursor && col(start) >= width {
        start += 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for ch in &chars[start..] {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        visible.push(*ch);
    }
    (visible, col(start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_input_fits_without_scroll() {
        let mut state = ComposerState::new();
        state.insert_str("hello");
        assert_eq!(visible_input(&state, 10), ("hello".to_string(), 5));
    }

    #[test]
    fn test_visible_input_scrolls_to_cursor() {
        let mut state = ComposerState::new();
        state.insert_str("abcdefghij");
        let (visible, col) = visible_input(&state, 4);
        assert_eq!(visible, "hij");
        assert_eq!(col, 3);
    }

    #[test]
    fn test_height_grows_with_status() {
        let props = ComposerProps {
            room_id: None,
            room_name: None,
            reply_to: None,
            show_reply_preview: false,
            compact: true,
            permalinks: None,
        };
        let mut state = ComposerState::new();
        assert_eq!(composer_height(&props, &state), 2);
        state.status = Some("oops".to_string());
        assert_eq!(composer_height(&props, &state), 3);
    }
}

//! Composer reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::ComposerState;
use crate::effects::UiEffect;
use crate::events::ComposerUiEvent;
use crate::thread_view::ThreadViewState;

/// Handles an editing key. Returns `None` if the composer does not use it.
pub fn handle_key(
    composer: &mut ComposerState,
    panel: &ThreadViewState,
    key: KeyEvent,
) -> Option<Vec<UiEffect>> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Enter => Some(submit(composer, panel)),
        KeyCode::Backspace => {
            composer.backspace();
            Some(vec![])
        }
        KeyCode::Delete => {
            composer.delete();
            Some(vec![])
        }
        KeyCode::Left => {
            composer.move_left();
            Some(vec![])
        }
        KeyCode::Right => {
            composer.move_right();
            Some(vec![])
        }
        KeyCode::Home => {
            composer.move_home();
            Some(vec![])
        }
        KeyCode::End => {
            composer.move_end();
            Some(vec![])
        }
        KeyCode::Char('u') if ctrl => {
            composer.clear();
            Some(vec![])
        }
        KeyCode::Char(ch) if !ctrl && !alt => {
            composer.insert_char(ch);
            Some(vec![])
        }
        _ => None,
    }
}

pub fn handle_paste(composer: &mut ComposerState, text: &str) {
    composer.insert_str(text);
}

pub fn handle_composer_event(composer: &mut ComposerState, event: ComposerUiEvent) {
    match event {
        ComposerUiEvent::ReplySent { event_id } => {
            tracing::debug!(event = %event_id, "reply delivered");
            composer.status = None;
        }
        ComposerUiEvent::ReplyFailed { error } => {
            tracing::warn!(%error, "reply failed");
            composer.status = Some(error);
        }
    }
}

/// Sends the composed text into the bound thread.
///
/// Without a bound thread there is nowhere to reply, so the text stays put.
fn submit(composer: &mut ComposerState, panel: &ThreadViewState) -> Vec<UiEffect> {
    let Some(thread) = panel.current_thread.as_ref() else {
        composer.status = Some("No thread to reply to".to_string());
        return vec![];
    };
    let Some(body) = composer.take_submission() else {
        return vec![];
    };
    vec![UiEffect::SendReply {
        room_id: thread.room_id().clone(),
        thread_id: thread.id().clone(),
        body,
    }]
}

#[cfg(test)]
mod tests {
    use skein_core::model::{ChatEvent, EventId, RoomId, Thread};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn bound_panel() -> ThreadViewState {
        let root = ChatEvent::new(EventId::new("$root"), RoomId::new("!r:x"), "@a:x", "root");
        let mut panel = ThreadViewState::default();
        panel.current_thread = Some(Thread::new(root));
        panel
    }

    #[test]
    fn test_enter_sends_reply_to_bound_thread() {
        let panel = bound_panel();
        let mut composer = ComposerState::new();
        composer.insert_str("hello");

        let effects = handle_key(&mut composer, &panel, key(KeyCode::Enter)).unwrap();

        assert!(matches!(
            effects.as_slice(),
            [UiEffect::SendReply { thread_id, body, .. }]
                if thread_id == &EventId::new("$root") && body == "hello"
        ));
        assert_eq!(composer.text(), "");
    }

    #[test]
    fn test_enter_without_thread_keeps_text() {
        let panel = ThreadViewState::default();
        let mut composer = ComposerState::new();
        composer.insert_str("hello");

        let effects = handle_key(&mut composer, &panel, key(KeyCode::Enter)).unwrap();

        assert!(effects.is_empty());
        assert_eq!(composer.text(), "hello");
        assert!(composer.status.is_some());
    }

    #[test]
    fn test_ctrl_chars_are_not_inserted() {
        let panel = ThreadViewState::default();
        let mut composer = ComposerState::new();
        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);

        assert!(handle_key(&mut composer, &panel, ctrl_n).is_none());
        assert_eq!(composer.text(), "");
    }

    #[test]
    fn test_reply_failed_sets_status() {
        let mut composer = ComposerState::new();
        handle_composer_event(
            &mut composer,
            ComposerUiEvent::ReplyFailed {
                error: "boom".to_string(),
            },
        );
        assert_eq!(composer.status.as_deref(), Some("boom"));
    }
}

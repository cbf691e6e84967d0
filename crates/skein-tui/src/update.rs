//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use skein_core::actions::{Action, NavigationCommand, RightPanelPhase};

use crate::effects::{Step, UiEffect};
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{composer, thread_view};

/// Rows moved per scroll key press.
const SCROLL_STEP: usize = 3;

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => vec![],
        UiEvent::Frame { width, height } => {
            app.thread_view.observe_resize(width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::Action(action) => thread_view::handle_action(&mut app.thread_view, &action),
        UiEvent::Thread(thread_event) => {
            thread_view::handle_thread_event(&mut app.thread_view, thread_event)
        }
        UiEvent::SourceChanged(source) => {
            thread_view::handle_source_changed(&mut app.thread_view, &source)
        }
        UiEvent::Composer(composer_event) => {
            composer::handle_composer_event(&mut app.composer, composer_event);
            app.thread_view.request_render();
            vec![]
        }
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    let effects = match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) => {
            composer::handle_paste(&mut app.composer, &text);
            vec![]
        }
        Event::Resize(width, height) => {
            app.thread_view.observe_resize(width, height);
            vec![]
        }
        _ => return vec![],
    };
    app.thread_view.request_render();
    effects
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => vec![UiEffect::Quit],
        KeyCode::Esc => vec![UiEffect::Close],
        KeyCode::Char('n') if ctrl => vec![UiEffect::NavigateThread { step: Step::Next }],
        KeyCode::Char('p') if ctrl => vec![UiEffect::NavigateThread {
            step: Step::Previous,
        }],
        KeyCode::Tab => vec![UiEffect::DispatchAction(Action::from(
            NavigationCommand::new(RightPanelPhase::RoomSummary, None),
        ))],
        KeyCode::Up => {
            app.thread_view.scroll_up(1);
            vec![]
        }
        KeyCode::Down => {
            app.thread_view.scroll_down(1);
            vec![]
        }
        KeyCode::PageUp => {
            app.thread_view.scroll_up(SCROLL_STEP);
            vec![]
        }
        KeyCode::PageDown => {
            app.thread_view.scroll_down(SCROLL_STEP);
            vec![]
        }
        _ => composer::handle_key(&mut app.composer, &app.thread_view, key).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use skein_core::config::Config;
    use skein_core::model::{ChatEvent, EventId, RoomId};

    use super::*;
    use crate::thread_view::ThreadViewState;

    fn app() -> AppState {
        AppState::new(Config::default(), ThreadViewState::default())
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, modifiers)))
    }

    #[test]
    fn test_esc_closes_panel() {
        let effects = update(&mut app(), press(KeyCode::Esc, KeyModifiers::NONE));
        assert!(matches!(effects.as_slice(), [UiEffect::Close]));
    }

    #[test]
    fn test_ctrl_n_and_ctrl_p_navigate() {
        let mut app = app();
        let next = update(&mut app, press(KeyCode::Char('n'), KeyModifiers::CONTROL));
        let prev = update(&mut app, press(KeyCode::Char('p'), KeyModifiers::CONTROL));
        assert!(matches!(
            next.as_slice(),
            [UiEffect::NavigateThread { step: Step::Next }]
        ));
        assert!(matches!(
            prev.as_slice(),
            [UiEffect::NavigateThread {
                step: Step::Previous
            }]
        ));
    }

    #[test]
    fn test_tab_dispatches_other_phase() {
        let effects = update(&mut app(), press(KeyCode::Tab, KeyModifiers::NONE));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::DispatchAction(Action::SetRightPanelPhase(cmd))]
                if cmd.phase == RightPanelPhase::RoomSummary
        ));
    }

    #[test]
    fn test_typing_goes_to_composer() {
        let mut app = app();
        update(&mut app, press(KeyCode::Char('h'), KeyModifiers::NONE));
        update(&mut app, press(KeyCode::Char('i'), KeyModifiers::NONE));
        update(&mut app, UiEvent::Terminal(Event::Paste("!\n".to_string())));
        assert_eq!(app.composer.text(), "hi!");
    }

    #[test]
    fn test_frame_requests_render_only_on_resize() {
        let mut app = app();
        update(&mut app, UiEvent::Frame { width: 80, height: 24 });
        assert!(app.thread_view.take_render_request());
        update(&mut app, UiEvent::Frame { width: 80, height: 24 });
        assert!(!app.thread_view.take_render_request());
    }

    #[test]
    fn test_resize_resets_scroll() {
        let mut app = app();
        update(&mut app, UiEvent::Frame { width: 80, height: 24 });
        update(&mut app, press(KeyCode::PageUp, KeyModifiers::NONE));

        update(&mut app, UiEvent::Frame { width: 80, height: 24 });
        assert_eq!(app.thread_view.scroll_offset, SCROLL_STEP);

        update(&mut app, UiEvent::Terminal(Event::Resize(60, 24)));
        assert_eq!(app.thread_view.scroll_offset, 0);
        assert_eq!(app.thread_view.resize.generation(), 2);
    }

    #[test]
    fn test_source_changed_routes_to_panel() {
        let mut app = app();
        let source = ChatEvent::new(EventId::new("$a"), RoomId::new("!r:x"), "@a:x", "a");
        let effects = update(&mut app, UiEvent::SourceChanged(source));
        assert!(matches!(effects.as_slice(), [UiEffect::RebindThread { .. }]));
    }

    #[test]
    fn test_scroll_keys_move_offset() {
        let mut app = app();
        update(&mut app, press(KeyCode::PageUp, KeyModifiers::NONE));
        update(&mut app, press(KeyCode::Down, KeyModifiers::NONE));
        assert_eq!(app.thread_view.scroll_offset, SCROLL_STEP - 1);
    }
}

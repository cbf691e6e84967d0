//! Application state.

use skein_core::config::Config;

use crate::composer::ComposerState;
use crate::thread_view::ThreadViewState;

/// Everything the reducer mutates and the renderer reads.
#[derive(Debug)]
pub struct AppState {
    pub thread_view: ThreadViewState,
    pub composer: ComposerState,
    pub config: Config,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(config: Config, thread_view: ThreadViewState) -> Self {
        Self {
            thread_view,
            composer: ComposerState::new(),
            config,
            should_quit: false,
        }
    }
}

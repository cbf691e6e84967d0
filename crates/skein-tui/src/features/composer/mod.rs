//! Reply composer feature.

pub mod render;
pub mod state;
pub mod update;

pub use render::{composer_height, render_composer};
pub use state::ComposerState;
pub use update::{handle_composer_event, handle_key, handle_paste};

//! Focused thread panel.
//!
//! - `binding`: subscription lifecycle for the thread being shown
//! - `commands`: dispatcher registration and navigation handling
//! - `update`: reducer for thread signals and source changes
//! - `view` / `render`: props projection and drawing

pub mod binding;
pub mod commands;
pub mod render;
pub mod state;
pub mod update;
pub mod view;

pub use binding::{BindingId, ThreadBindingController, ThreadSubscription};
pub use commands::{CommandRegistration, handle_action};
pub use render::render_panel;
pub use state::ThreadViewState;
pub use update::{apply, handle_source_changed, handle_thread_event};
pub use view::{PanelView, panel_view};

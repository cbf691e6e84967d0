//! Full-screen thread panel for skein.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};
use std::rc::Rc;

use anyhow::Result;
pub use features::{composer, thread_view};
pub use runtime::{PanelSession, TuiRuntime};
use skein_core::client::MemoryClient;
use skein_core::config::Config;
use skein_core::dispatcher::Dispatcher;
use skein_core::model::ChatEvent;

/// Opens the thread panel on `source` and runs until it is closed.
///
/// # Errors
/// Returns an error if not attached to a terminal, or if the runtime fails.
pub fn run_thread_view(config: &Config, client: Rc<MemoryClient>, source: ChatEvent) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The thread view requires a terminal.\n\
             Use `skein threads` for non-interactive output."
        );
    }

    let dispatcher = Rc::new(Dispatcher::new());
    let mut runtime = TuiRuntime::new(config.clone(), client, dispatcher, source)?;
    runtime.run()
}

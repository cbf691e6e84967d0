//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! The reducer stays pure and produces effects; [`PanelSession`] executes
//! them. This module adds the terminal: it polls input, feeds the session,
//! and draws when the panel asked for a render.
//!
//! Structure:
//! - `mod.rs`: `TuiRuntime` and the event loop
//! - `session.rs`: mount/unmount, inbox draining, effect execution
//! - `inbox.rs`: inbox channel types

pub mod inbox;
mod session;

use std::io::Stdout;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
pub use session::PanelSession;
use skein_core::actions::Action;
use skein_core::client::MemoryClient;
use skein_core::config::Config;
use skein_core::dispatcher::Dispatcher;
use skein_core::model::ChatEvent;

use crate::events::UiEvent;
use crate::{render, terminal};

/// Full-screen TUI runtime.
///
/// Terminal state is restored on drop and on panic.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub session: PanelSession,
    tick_interval: Duration,
    started: Instant,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates the runtime and takes over the terminal.
    ///
    /// # Errors
    /// Returns an error if the session cannot be built or the terminal
    /// cannot be configured.
    pub fn new(
        config: Config,
        client: Rc<MemoryClient>,
        dispatcher: Rc<Dispatcher<Action>>,
        source: ChatEvent,
    ) -> Result<Self> {
        let tick_interval = config.tick_interval();
        let session = PanelSession::new(config, client, dispatcher, source)?;

        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let now = Instant::now();
        Ok(Self {
            terminal,
            session,
            tick_interval,
            started: now,
            last_tick: now,
        })
    }

    /// Mounts the panel, runs until quit, then unmounts.
    ///
    /// # Errors
    /// Returns an error if polling or drawing the terminal fails.
    pub fn run(&mut self) -> Result<()> {
        self.session.mount();
        let result = self.event_loop();
        self.session.unmount();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.session.state.should_quit {
            let hydrated = self.session.advance_clock(self.started.elapsed());
            if hydrated > 0 {
                tracing::debug!(hydrated, "threads hydrated");
            }

            let mut events = self.collect_events()?;
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                self.session.dispatch_event(event);
            }

            if self.session.state.thread_view.take_render_request() {
                dirty = true;
            }

            if dirty && !self.session.state.should_quit {
                self.terminal.draw(|frame| {
                    render::render(&self.session.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Collects inbox and terminal events, then a Tick when one is due.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();
        self.session.collect_inbox_events(&mut events);

        // Block until the next tick only when there is nothing to process.
        let poll_duration = if events.is_empty() {
            self.tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= self.tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}

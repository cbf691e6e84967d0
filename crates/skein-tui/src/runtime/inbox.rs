//! Inbox channel.
//!
//! Thread subscriptions and the dispatcher handler run inside SDK and
//! dispatcher callbacks, so they never touch state directly: they push a
//! `UiEvent` here and the runtime drains it between frames.

use tokio::sync::mpsc;

use crate::events::UiEvent;

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

pub fn channel() -> (UiEventSender, UiEventReceiver) {
    mpsc::unbounded_channel()
}

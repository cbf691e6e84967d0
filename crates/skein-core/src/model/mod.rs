//! Chat model: events, rooms, and thread handles.
//!
//! - `event`: timeline events and their identifiers
//! - `room`: room metadata consumed by the composer
//! - `thread`: SDK-owned thread handle with update/ready signals

mod event;
mod room;
mod thread;

pub use event::{ChatEvent, EventId, RoomId};
pub use room::Room;
pub use thread::{Thread, ThreadSignal, ThreadUpdate, TimelineSet};

//! Chat client seam.
//!
//! The thread panel only needs two lookups from the client: the thread handle
//! for an event, and the room an event lives in. [`MemoryClient`] implements
//! both over data loaded from a JSON fixture and plays the SDK's part of
//! hydrating threads in the background.

mod fixture;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};

pub use self::fixture::{DEMO_FIXTURE, Fixture, FixtureEvent, FixtureRoom, FixtureThread};
use crate::model::{ChatEvent, EventId, Room, RoomId, Thread, ThreadSignal};

/// Resolves the thread handle associated with an event.
pub trait ThreadLookup {
    /// Returns the thread rooted at `event`, or the thread `event` replies in.
    ///
    /// May return a handle whose replies have not been loaded yet.
    fn thread_for_event(&self, event: &ChatEvent) -> Option<Thread>;
}

/// Resolves room metadata by id.
pub trait RoomLookup {
    fn room(&self, room_id: &RoomId) -> Option<Room>;
}

struct PendingHydration {
    replies: Vec<ChatEvent>,
    due: Duration,
}

struct ThreadEntry {
    thread: Thread,
    pending: Option<PendingHydration>,
}

struct RoomData {
    room: Room,
    /// Main timeline, oldest first. Thread replies are not listed here.
    events: Vec<ChatEvent>,
    threads: BTreeMap<EventId, ThreadEntry>,
}

/// In-memory client backed by fixture data.
#[derive(Default)]
pub struct MemoryClient {
    rooms: RefCell<BTreeMap<RoomId, RoomData>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns an error if the fixture is unreadable or inconsistent.
    pub fn load(path: &Path) -> Result<Self> {
        let fixture = Fixture::load(path)?;
        Self::from_fixture(fixture).with_context(|| format!("Invalid fixture {}", path.display()))
    }

    /// # Errors
    /// Returns an error if a thread names a root that is not in its room.
    pub fn from_fixture(fixture: Fixture) -> Result<Self> {
        let client = Self::new();
        for room in fixture.rooms {
            let room_id = room.room_id.clone();
            client.add_room(Room::new(room_id.clone(), room.name));
            for event in room.events {
                client.add_event(event.into_event(&room_id));
            }
            for thread in room.threads {
                let Some(root) = client.event(&room_id, &thread.root) else {
                    bail!("Thread root {} not found in room {}", thread.root, room_id);
                };
                let replies = thread
                    .replies
                    .into_iter()
                    .map(|reply| reply.into_event(&room_id).in_thread(root.event_id.clone()))
                    .collect();
                client.add_thread(root, replies, thread.ready_after_ms.map(Duration::from_millis));
            }
        }
        Ok(client)
    }

    /// # Errors
    /// Never fails in practice; the bundled fixture is validated by tests.
    pub fn demo() -> Result<Self> {
        Self::from_fixture(Fixture::demo()?)
    }

    pub fn add_room(&self, room: Room) {
        self.rooms.borrow_mut().insert(
            room.room_id.clone(),
            RoomData {
                room,
                events: Vec::new(),
                threads: BTreeMap::new(),
            },
        );
    }

    /// Appends an event to its room's main timeline. Unknown rooms are
    /// created on the fly with no name.
    pub fn add_event(&self, event: ChatEvent) {
        let mut rooms = self.rooms.borrow_mut();
        let data = rooms
            .entry(event.room_id.clone())
            .or_insert_with(|| RoomData {
                room: Room::new(event.room_id.clone(), ""),
                events: Vec::new(),
                threads: BTreeMap::new(),
            });
        if !data.events.iter().any(|e| e.event_id == event.event_id) {
            data.events.push(event);
            data.events.sort_by_key(|e| e.origin_server_ts);
        }
    }

    /// Creates the thread rooted at `root` and returns its handle.
    ///
    /// With `ready_after` unset the replies are loaded immediately and the
    /// thread starts out ready. Otherwise the handle is returned empty and
    /// [`MemoryClient::hydrate_due`] fills it once the delay has passed.
    pub fn add_thread(
        &self,
        root: ChatEvent,
        replies: Vec<ChatEvent>,
        ready_after: Option<Duration>,
    ) -> Thread {
        let thread = Thread::new(root.clone());
        let pending = match ready_after {
            None => {
                for reply in replies {
                    thread.push_reply(reply);
                }
                thread.mark_ready();
                None
            }
            Some(due) => Some(PendingHydration { replies, due }),
        };

        self.add_event(root.clone());
        let mut rooms = self.rooms.borrow_mut();
        if let Some(data) = rooms.get_mut(&root.room_id) {
            data.threads.insert(
                root.event_id.clone(),
                ThreadEntry {
                    thread: thread.clone(),
                    pending,
                },
            );
        }
        thread
    }

    /// Loads every thread whose delay has elapsed.
    ///
    /// Each hydrated thread emits `Update` with its populated handle, then
    /// `Ready`. Returns the number of threads hydrated.
    pub fn hydrate_due(&self, elapsed: Duration) -> usize {
        // Collect first; emitting while the rooms map is borrowed would let a
        // listener re-enter the client.
        let mut due = Vec::new();
        {
            let mut rooms = self.rooms.borrow_mut();
            for data in rooms.values_mut() {
                for entry in data.threads.values_mut() {
                    if entry.pending.as_ref().is_some_and(|p| p.due <= elapsed)
                        && let Some(pending) = entry.pending.take()
                    {
                        due.push((entry.thread.clone(), pending.replies));
                    }
                }
            }
        }

        for (thread, replies) in &due {
            for reply in replies {
                thread.push_reply(reply.clone());
            }
            tracing::debug!(thread = %thread.id(), replies = replies.len(), "thread hydrated");
            thread.emit(ThreadSignal::Update, Some(thread.clone()));
            thread.mark_ready();
        }
        due.len()
    }

    /// Number of threads still waiting to be hydrated.
    pub fn pending_count(&self) -> usize {
        self.rooms
            .borrow()
            .values()
            .flat_map(|data| data.threads.values())
            .filter(|entry| entry.pending.is_some())
            .count()
    }

    /// Posts a reply into a thread and returns the stored event.
    ///
    /// # Errors
    /// Returns an error if the room or thread is unknown, or the thread handle
    /// has been disposed.
    pub fn send_reply(
        &self,
        room_id: &RoomId,
        thread_id: &EventId,
        sender: &str,
        body: &str,
    ) -> Result<ChatEvent> {
        let thread = self
            .thread(room_id, thread_id)
            .with_context(|| format!("Unknown thread {thread_id} in room {room_id}"))?;
        if thread.is_disposed() {
            bail!("Thread {thread_id} is no longer available");
        }

        let event = ChatEvent::new(EventId::generate(), room_id.clone(), sender, body)
            .in_thread(thread_id.clone());
        thread.add_reply(event.clone());
        tracing::info!(thread = %thread_id, event = %event.event_id, "reply sent");
        Ok(event)
    }

    pub fn thread(&self, room_id: &RoomId, thread_id: &EventId) -> Option<Thread> {
        self.rooms
            .borrow()
            .get(room_id)?
            .threads
            .get(thread_id)
            .map(|entry| entry.thread.clone())
    }

    /// Looks up an event on the main timeline or inside any thread.
    pub fn event(&self, room_id: &RoomId, event_id: &EventId) -> Option<ChatEvent> {
        let rooms = self.rooms.borrow();
        let data = rooms.get(room_id)?;
        if let Some(event) = data.events.iter().find(|e| &e.event_id == event_id) {
            return Some(event.clone());
        }
        data.threads.values().find_map(|entry| {
            entry
                .thread
                .timeline()
                .events()
                .iter()
                .find(|e| &e.event_id == event_id)
                .cloned()
        })
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.borrow().keys().cloned().collect()
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.rooms
            .borrow()
            .values()
            .map(|data| data.room.clone())
            .collect()
    }

    /// Main timeline events that root a thread, oldest first.
    pub fn thread_roots(&self, room_id: &RoomId) -> Vec<ChatEvent> {
        let rooms = self.rooms.borrow();
        let Some(data) = rooms.get(room_id) else {
            return Vec::new();
        };
        data.events
            .iter()
            .filter(|e| data.threads.contains_key(&e.event_id))
            .cloned()
            .collect()
    }

    /// The main timeline of a room, oldest first.
    pub fn room_events(&self, room_id: &RoomId) -> Vec<ChatEvent> {
        self.rooms
            .borrow()
            .get(room_id)
            .map(|data| data.events.clone())
            .unwrap_or_default()
    }
}

impl ThreadLookup for MemoryClient {
    fn thread_for_event(&self, event: &ChatEvent) -> Option<Thread> {
        let thread_id = event.thread_root.as_ref().unwrap_or(&event.event_id);
        self.thread(&event.room_id, thread_id)
    }
}

impl RoomLookup for MemoryClient {
    fn room(&self, room_id: &RoomId) -> Option<Room> {
        self.rooms.borrow().get(room_id).map(|data| data.room.clone())
    }
}

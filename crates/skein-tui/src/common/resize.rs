//! Terminal size tracking.

/// Tracks the panel's size and counts changes.
///
/// The thread panel resets its message list scroll when the size changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeNotifier {
    width: u16,
    height: u16,
    generation: u64,
}

impl ResizeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current size. Returns `true` if it changed.
    pub fn observe(&mut self, width: u16, height: u16) -> bool {
        if (self.width, self.height) == (width, height) {
            return false;
        }
        self.width = width;
        self.height = height;
        self.generation += 1;
        true
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

//! Shared helpers used across features.

pub mod resize;
pub mod text;

pub use resize::ResizeNotifier;
pub use text::truncate_with_ellipsis;

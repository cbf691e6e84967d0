//! Feature slices.

pub mod composer;
pub mod thread_view;

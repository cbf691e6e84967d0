//! Core skein library (chat model, thread handles, dispatcher, config).

pub mod actions;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod emitter;
pub mod logging;
pub mod model;
pub mod permalinks;

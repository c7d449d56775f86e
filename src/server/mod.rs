//! Listener setup and the accept loop.

pub mod listener;

pub use listener::{Server, run};

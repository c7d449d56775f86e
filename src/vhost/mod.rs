//! Virtual hosting: mapping Host header values to per-host document roots
//! and serving files out of them.

pub mod handler;
pub mod resolver;

pub use handler::StaticHandler;
pub use resolver::{ServedFile, VirtualHostResolver};

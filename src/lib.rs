//! Hearth - Virtual-host static file server
//!
//! Core library for HTTP/1.1 parsing, connection handling, and serving
//! files out of per-host document roots.

pub mod config;
pub mod http;
pub mod server;
pub mod vhost;

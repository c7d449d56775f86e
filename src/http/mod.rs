//! HTTP/1.1 protocol handling: parsing requests, building and serializing
//! responses, and driving persistent connections.
//!
//! Each accepted connection runs a small state machine:
//!
//! ```text
//!                  +---------+
//!        +-------->| Reading |--------------------+
//!        |         +---------+                    |
//!        |           |     |                      | peer closed /
//!        |    parsed |     | malformed /          | idle timeout
//!        |           v     | mid-request timeout  |
//!        |  +------------+ |                      v
//!        |  | Processing | |                 +--------+
//!        |  +------------+ |                 | Closed |
//!        |           |     |                 +--------+
//!        |  response |     |                      ^
//!        |           v     v                      |
//!        |        +---------+   close after write |
//!        +--------| Writing |---------------------+
//!   keep-alive    +---------+
//! ```
//!
//! Responses to well-formed requests keep the connection open unless the
//! client asked for "Connection: close". A 400 always closes.

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

/// The only protocol version this server speaks.
pub const HTTP_VERSION: &str = "HTTP/1.1";

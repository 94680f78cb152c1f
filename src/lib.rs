//! In-memory realtime chat broker library.
//!
//! This library provides the backend of a WebSocket chat application:
//! full-history fan-out on every accepted message (`chatMessages`) and
//! live connection-count broadcast (`userCount`).

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;

//! Data Transfer Objects (DTOs) for the chat broker.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event frame DTOs (the wire contract fixed by the
//!   existing client)
//! - `http`: HTTP API response DTOs (polling fallback surface)

pub mod conversion;
pub mod http;
pub mod websocket;

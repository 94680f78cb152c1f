//! MessagePusher implementations.

pub mod websocket;

pub use websocket::WebSocketMessagePusher;

//! Transport adapter: the axum endpoint the clients talk to.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;

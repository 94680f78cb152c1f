//! Domain layer: value objects, entities, and the interfaces
//! (Repository / MessagePusher) that the infrastructure layer implements.

pub mod entity;
pub mod error;
pub mod pusher;
pub mod registry;
pub mod repository;
pub mod store;
pub mod value_object;

pub use entity::{ChatMessage, Connection};
pub use error::{RepositoryError, ValidationError};
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::ConnectionRegistry;
pub use repository::BrokerRepository;
pub use store::MessageStore;
pub use value_object::{ConnectionId, ConnectionIdFactory, MessageText, Timestamp};

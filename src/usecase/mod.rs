//! UseCase layer: the broker's connect / send / disconnect protocol.
//!
//! Each usecase sequences its state change and the enqueue of the resulting
//! broadcast into one critical section (see [`sequencer::Sequencer`]), which
//! gives the single observable global order every client sees.

pub mod connect_client;
pub mod disconnect_client;
pub mod error;
pub mod room_state;
pub mod send_message;
pub mod sequencer;

pub use connect_client::{ConnectClientUseCase, ConnectedClient};
pub use disconnect_client::DisconnectClientUseCase;
pub use error::SendMessageError;
pub use room_state::{GetRoomStateUseCase, RoomState};
pub use send_message::SendMessageUseCase;
pub use sequencer::Sequencer;

//! Command Handlers

mod message_handlers;
mod pending_writes;
mod reset_handlers;

pub use message_handlers::SendMessageHandler;
pub use pending_writes::PendingWrites;
pub use reset_handlers::ResetChatHandler;

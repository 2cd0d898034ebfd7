//! The `client` module holds the session object applications interact with
//! and the dispatch loop that routes every inbound message.
//!
//! A [`Client`] wraps a transport, the subscription registry, and the
//! pending-request store; `connect` spawns a task that consumes the
//! transport's inbound stream and classifies each message by topic prefix.

pub mod dispatch;
pub mod handlers;
pub mod session;

pub use handlers::{ConnectHandler, DisconnectHandler, ErrorHandler, PresenceHandler};
pub use session::Client;

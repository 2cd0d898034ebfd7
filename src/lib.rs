//! # pubwire
//!
//! `pubwire` is a client library for a channel-keyed publish/subscribe
//! messaging service. It publishes to named channels scoped by access keys,
//! routes inbound messages to per-channel callbacks (with `+`/`#` wildcard
//! patterns), and turns the service's asynchronous administrative replies
//! (key generation, link creation, presence, identity) into ordinary
//! request/response calls with timeouts.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `client`: The session object and the inbound dispatch loop.
//! - `routing`: The pattern trie that matches topics to subscription callbacks.
//! - `correlation`: The pending-request store correlating replies to callers.
//! - `protocol`: Topic formatting and the wire payload types.
//! - `transport`: The transport trait plus WebSocket and in-memory implementations.
//! - `config`: Loading and merging client configuration.
//! - `utils`: The error type and logging setup.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pubwire::{Client, Settings};
//!
//! #[tokio::main]
//! async fn main() -> pubwire::Result<()> {
//!     let client = Client::dial(&Settings::default()).await?;
//!     client.on_message(|msg| {
//!         println!("{}: {}", msg.topic, String::from_utf8_lossy(&msg.payload));
//!     });
//!
//!     client
//!         .subscribe(
//!             "my-channel-key",
//!             "chat",
//!             Some(Arc::new(|msg| {
//!                 println!("chat: {}", String::from_utf8_lossy(&msg.payload));
//!             })),
//!             &[],
//!         )
//!         .await?;
//!
//!     client.publish("my-channel-key", "chat", "hello", &[]).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod correlation;
pub mod protocol;
pub mod routing;
pub mod transport;
pub mod utils;

pub use client::Client;
pub use config::{Settings, load_config};
pub use correlation::PendingRequests;
pub use protocol::{
    ChannelOption, ErrorEnvelope, Link, Message, PresenceEvent, PresenceInfo, QoS, ServiceReply,
};
pub use routing::{MessageHandler, SubscriptionTrie};
pub use transport::{DeliveryToken, MemoryTransport, Transport, WebSocketTransport};
pub use utils::{Error, Result};

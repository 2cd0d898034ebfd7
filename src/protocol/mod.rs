//! The `protocol` module defines the wire-level vocabulary of the pubwire
//! service: topic string formatting, per-channel options, and the serde
//! payload types exchanged with the service on the reserved namespace.

pub mod message;
pub mod topic;

pub use message::{
    ErrorEnvelope, KeyGenRequest, KeyGenResponse, Link, LinkRequest, MeResponse, Message,
    PresenceEvent, PresenceInfo, PresenceRequest, ServiceReply,
};
pub use topic::{ChannelOption, QoS, format_topic};

/// Reserved top-level namespace used by the service for presence events,
/// error envelopes, and administrative replies. Application data topics
/// never start with this prefix.
pub const SERVICE_ROOT: &str = "pubwire/";

pub const PRESENCE_PREFIX: &str = "pubwire/presence/";
pub const ERROR_PREFIX: &str = "pubwire/error/";
pub const KEYGEN_PREFIX: &str = "pubwire/keygen/";
pub const LINK_PREFIX: &str = "pubwire/link/";
pub const ME_PREFIX: &str = "pubwire/me/";

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::utils::Error;

/// An inbound message as delivered to subscription callbacks.
///
/// The topic is always a concrete slash-delimited string; it never contains
/// wildcards. The payload is the raw bytes carried by the transport, usually
/// JSON-encoded text.
#[derive(Debug, Clone)]
pub struct Message {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Request body for a presence query.
#[derive(Debug, Clone, Serialize)]
pub struct PresenceRequest {
    pub key: String,
    pub channel: String,
    pub status: bool,
    pub changes: bool,
}

/// A single occupant reported in a presence event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PresenceInfo {
    pub id: String,
    pub username: String,
}

/// Presence event pushed by the service, either in response to a query or
/// when subscribers join and leave a watched channel.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PresenceEvent {
    pub time: i64,
    pub event: String,
    pub channel: String,
    pub who: Vec<PresenceInfo>,
}

/// Request body for a key generation request.
#[derive(Debug, Clone, Serialize)]
pub struct KeyGenRequest {
    pub key: String,
    pub channel: String,
    #[serde(rename = "type")]
    pub permissions: String,
    pub ttl: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeyGenResponse {
    pub req: u16,
    pub status: u16,
    pub key: String,
    pub channel: String,
}

/// Request body for a link creation request.
#[derive(Debug, Clone, Serialize)]
pub struct LinkRequest {
    pub name: String,
    pub key: String,
    pub channel: String,
    pub subscribe: bool,
    pub private: bool,
}

/// A channel link created by the service. The returned channel is the
/// concrete channel the link points at.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Link {
    pub req: u16,
    pub status: u16,
    pub name: String,
    pub channel: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MeResponse {
    pub req: u16,
    pub id: String,
    pub key: String,
}

/// Error envelope returned by the service, correlated to a pending request
/// through `req` when one exists (`req == 0` marks an out-of-band error).
///
/// Every field is defaulted so that decoding stays as lenient as the
/// service's own encoding: an envelope with an empty message is not an error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorEnvelope {
    pub req: u16,
    pub status: u16,
    pub message: String,
}

impl From<ErrorEnvelope> for Error {
    fn from(env: ErrorEnvelope) -> Self {
        Error::Service {
            status: env.status,
            message: env.message,
        }
    }
}

/// A typed administrative reply, resolved at the dispatch boundary so that
/// callers never downcast.
#[derive(Debug, Clone)]
pub enum ServiceReply {
    KeyGen(KeyGenResponse),
    Link(Link),
    Me(MeResponse),
}

impl ServiceReply {
    /// The correlation id the reply carries; zero means absent.
    pub fn request_id(&self) -> u16 {
        match self {
            ServiceReply::KeyGen(r) => r.req,
            ServiceReply::Link(r) => r.req,
            ServiceReply::Me(r) => r.req,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Frames sent to the service over the WebSocket transport.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Frame {
    #[serde(rename = "publish")]
    Publish {
        topic: String,
        payload: String,
        qos: u8,
        retain: bool,
        /// Transport-assigned operation id. The service echoes it as `req`
        /// in administrative replies, which is what correlation keys on.
        message_id: u16,
        /// Client-side publish time, milliseconds since the epoch.
        timestamp: i64,
    },

    #[serde(rename = "subscribe")]
    Subscribe { topic: String, qos: u8 },

    #[serde(rename = "unsubscribe")]
    Unsubscribe { topic: String },
}

/// Frame received from the service: a message published on a topic.
#[derive(Debug, Deserialize)]
pub struct InboundFrame {
    pub topic: String,
    pub payload: String,
}

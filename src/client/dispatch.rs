use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::client::handlers::Callbacks;
use crate::correlation::PendingRequests;
use crate::protocol::{
    ERROR_PREFIX, ErrorEnvelope, KEYGEN_PREFIX, KeyGenResponse, LINK_PREFIX, Link, ME_PREFIX,
    MeResponse, Message, PRESENCE_PREFIX, PresenceEvent, SERVICE_ROOT, ServiceReply,
};
use crate::routing::SubscriptionTrie;

enum ReplyKind {
    KeyGen,
    Link,
    Me,
}

/// Single entry point for every inbound message.
///
/// Classifies by topic prefix and routes to exactly one of: subscription
/// matching, administrative reply resolution, or a named event callback.
/// Runs on its own task, consuming messages strictly in delivery order.
pub(crate) struct Dispatcher {
    subscriptions: Arc<Mutex<SubscriptionTrie>>,
    pending: Arc<PendingRequests>,
    callbacks: Arc<Callbacks>,
    closing: Arc<AtomicBool>,
}

impl Dispatcher {
    pub(crate) fn new(
        subscriptions: Arc<Mutex<SubscriptionTrie>>,
        pending: Arc<PendingRequests>,
        callbacks: Arc<Callbacks>,
        closing: Arc<AtomicBool>,
    ) -> Self {
        Self {
            subscriptions,
            pending,
            callbacks,
            closing,
        }
    }

    /// Drains the inbound stream until the transport closes it. The
    /// disconnect callback fires only on unexpected loss, not when the
    /// session asked for the shutdown itself.
    pub(crate) async fn run(self, mut inbound: UnboundedReceiver<Message>) {
        while let Some(msg) = inbound.recv().await {
            self.dispatch(&msg);
        }

        if self.closing.load(Ordering::SeqCst) {
            debug!("connection closed");
            return;
        }

        let cause = crate::utils::Error::Transport("connection lost".to_string());
        match self.callbacks.disconnect() {
            Some(handler) => handler(&cause),
            None => warn!("connection lost"),
        }
    }

    fn dispatch(&self, msg: &Message) {
        // Ordinary data topics never use the reserved namespace. The whole
        // branch is gated on a default handler being registered; matched
        // handlers always run, the default only on a registry miss.
        if !msg.topic.starts_with(SERVICE_ROOT) {
            if let Some(default) = self.callbacks.message() {
                let handlers = self.subscriptions.lock().unwrap().lookup(&msg.topic);
                if handlers.is_empty() {
                    default(msg);
                }
                for handler in &handlers {
                    handler(msg);
                }
            }
            return;
        }

        if msg.topic.starts_with(PRESENCE_PREFIX) {
            if let Some(handler) = self.callbacks.presence() {
                if let Ok(event) = serde_json::from_slice::<PresenceEvent>(&msg.payload) {
                    handler(event);
                }
            }
        } else if msg.topic.starts_with(ERROR_PREFIX) {
            self.on_error(msg);
        } else if msg.topic.starts_with(KEYGEN_PREFIX) {
            self.on_reply(msg, ReplyKind::KeyGen);
        } else if msg.topic.starts_with(LINK_PREFIX) {
            self.on_reply(msg, ReplyKind::Link);
        } else if msg.topic.starts_with(ME_PREFIX) {
            self.on_reply(msg, ReplyKind::Me);
        } else {
            debug!(topic = %msg.topic, "dropping unclassified service message");
        }
    }

    /// Handles an inbound error envelope: resolve the correlated pending
    /// request when there is one, otherwise hand the error to the user's
    /// error callback (or log it when none is registered).
    fn on_error(&self, msg: &Message) {
        let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(&msg.payload) else {
            return;
        };

        match self.callbacks.error() {
            None => warn!(
                status = envelope.status,
                "service error: {}", envelope.message
            ),
            Some(handler) => {
                if !self.pending.notify(envelope.req, Err(envelope.clone().into())) {
                    handler(envelope);
                }
            }
        }
    }

    /// Handles an administrative reply. An error envelope with a non-empty
    /// message wins over the typed decode; a typed reply without a positive
    /// request id is dropped.
    fn on_reply(&self, msg: &Message, kind: ReplyKind) {
        if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(&msg.payload) {
            if !envelope.message.is_empty() {
                self.pending.notify(envelope.req, Err(envelope.into()));
                return;
            }
        }

        let reply = match kind {
            ReplyKind::KeyGen => serde_json::from_slice::<KeyGenResponse>(&msg.payload)
                .ok()
                .map(ServiceReply::KeyGen),
            ReplyKind::Link => serde_json::from_slice::<Link>(&msg.payload)
                .ok()
                .map(ServiceReply::Link),
            ReplyKind::Me => serde_json::from_slice::<MeResponse>(&msg.payload)
                .ok()
                .map(ServiceReply::Me),
        };

        if let Some(reply) = reply {
            let request_id = reply.request_id();
            if request_id > 0 {
                self.pending.notify(request_id, Ok(reply));
            }
        }
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uuid::Uuid;

use crate::client::dispatch::Dispatcher;
use crate::client::handlers::Callbacks;
use crate::config::Settings;
use crate::correlation::PendingRequests;
use crate::protocol::{
    ChannelOption, ErrorEnvelope, KeyGenRequest, Link, LinkRequest, Message, PRESENCE_PREFIX,
    PresenceEvent, PresenceRequest, QoS, SERVICE_ROOT, ServiceReply, format_topic,
};
use crate::routing::{MessageHandler, SubscriptionTrie};
use crate::transport::{DeliveryToken, Transport, WebSocketTransport};
use crate::utils::{Error, Result};

/// A client session against the pubwire service.
///
/// The session owns the topic registry and the pending-request store and
/// shares both with the dispatch task spawned on connect, so multiple
/// sessions can coexist in one process. All operations take `&self`; a
/// session is typically wrapped in an `Arc` and shared freely.
pub struct Client {
    id: String,
    transport: Arc<dyn Transport>,
    subscriptions: Arc<Mutex<SubscriptionTrie>>,
    pending: Arc<PendingRequests>,
    callbacks: Arc<Callbacks>,
    timeout: Duration,
    default_qos: QoS,
    identity: Mutex<Option<String>>,
    closing: Arc<AtomicBool>,
}

impl Client {
    /// Creates a session over the given transport. `connect` must be called
    /// before the session is used.
    pub fn new(transport: Arc<dyn Transport>, settings: &Settings) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            transport,
            subscriptions: Arc::new(Mutex::new(SubscriptionTrie::new())),
            pending: Arc::new(PendingRequests::new()),
            callbacks: Arc::new(Callbacks::default()),
            timeout: Duration::from_secs(settings.connection.timeout_secs),
            default_qos: QoS::from(settings.client.default_qos),
            identity: Mutex::new(None),
            closing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Convenience constructor: a WebSocket session to the configured URL,
    /// already connected.
    pub async fn dial(settings: &Settings) -> Result<Self> {
        let transport = Arc::new(WebSocketTransport::new(settings.connection.url.clone()));
        let client = Self::new(transport, settings);
        client.connect().await?;
        Ok(client)
    }

    /// The locally-generated id of this session (not the service-side
    /// identity; see [`Client::identity`]).
    pub fn client_id(&self) -> &str {
        &self.id
    }

    /// Sets the handler called for data messages that match no subscription.
    /// Data messages are dropped entirely while no default handler is set.
    pub fn on_message(&self, handler: impl Fn(&Message) + Send + Sync + 'static) {
        self.callbacks.set_message(Arc::new(handler));
    }

    pub fn on_connect(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.callbacks.set_connect(Arc::new(handler));
    }

    pub fn on_disconnect(&self, handler: impl Fn(&Error) + Send + Sync + 'static) {
        self.callbacks.set_disconnect(Arc::new(handler));
    }

    pub fn on_presence(&self, handler: impl Fn(PresenceEvent) + Send + Sync + 'static) {
        self.callbacks.set_presence(Arc::new(handler));
    }

    /// Sets the handler for service errors not correlated to a pending
    /// request; without one such errors are only logged.
    pub fn on_error(&self, handler: impl Fn(ErrorEnvelope) + Send + Sync + 'static) {
        self.callbacks.set_error(Arc::new(handler));
    }

    /// Initiates the connection and spawns the inbound dispatch loop.
    pub async fn connect(&self) -> Result<()> {
        let token = self.transport.connect();
        self.wait(token).await?;
        self.closing.store(false, Ordering::SeqCst);

        if let Some(inbound) = self.transport.inbound() {
            let dispatcher = Dispatcher::new(
                self.subscriptions.clone(),
                self.pending.clone(),
                self.callbacks.clone(),
                self.closing.clone(),
            );
            tokio::spawn(dispatcher.run(inbound));
        }

        if let Some(handler) = self.callbacks.connect() {
            handler();
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Ends the connection after giving in-flight work `grace` to complete.
    /// A shutdown requested here does not fire the disconnect callback.
    pub fn disconnect(&self, grace: Duration) {
        self.closing.store(true, Ordering::SeqCst);
        self.transport.disconnect(grace);
    }

    /// Publishes a message to the channel addressed by the key.
    pub async fn publish(
        &self,
        key: &str,
        channel: &str,
        payload: impl Into<Vec<u8>>,
        options: &[ChannelOption],
    ) -> Result<()> {
        let topic = format_topic(key, channel, options);
        let token = self
            .transport
            .publish(&topic, self.default_qos, false, payload.into());
        self.wait(token).await
    }

    /// Publishes a message with a time-to-live, in seconds.
    pub async fn publish_with_ttl(
        &self,
        key: &str,
        channel: &str,
        payload: impl Into<Vec<u8>>,
        ttl: u32,
    ) -> Result<()> {
        self.publish(key, channel, payload, &[ChannelOption::Ttl(ttl)])
            .await
    }

    /// Publishes through a previously created link name instead of a
    /// key/channel pair.
    pub async fn publish_with_link(&self, name: &str, payload: impl Into<Vec<u8>>) -> Result<()> {
        let token = self
            .transport
            .publish(name, self.default_qos, false, payload.into());
        self.wait(token).await
    }

    /// Starts a subscription. When a handler is provided it is bound to the
    /// channel pattern and receives every matching message; otherwise
    /// messages fall through to the default handler.
    pub async fn subscribe(
        &self,
        key: &str,
        channel: &str,
        handler: Option<MessageHandler>,
        options: &[ChannelOption],
    ) -> Result<()> {
        if let Some(handler) = handler {
            self.subscriptions
                .lock()
                .unwrap()
                .add_handler(channel, handler);
        }

        let token = self
            .transport
            .subscribe(&format_topic(key, channel, options), self.default_qos);
        self.wait(token).await
    }

    /// Subscribes and asks the service to replay the last `last` stored
    /// messages of the channel.
    pub async fn subscribe_with_history(
        &self,
        key: &str,
        channel: &str,
        last: u32,
        handler: Option<MessageHandler>,
    ) -> Result<()> {
        self.subscribe(key, channel, handler, &[ChannelOption::Last(last)])
            .await
    }

    /// Ends the subscription and removes every handler bound to the channel
    /// pattern.
    pub async fn unsubscribe(&self, key: &str, channel: &str) -> Result<()> {
        self.subscriptions.lock().unwrap().remove_handler(channel);

        let token = self
            .transport
            .unsubscribe(&format_topic(key, channel, &[]));
        self.wait(token).await
    }

    /// Sends a presence query. Responses and subsequent join/leave events
    /// arrive through the presence callback, not as a return value.
    pub async fn presence(
        &self,
        key: &str,
        channel: &str,
        status: bool,
        changes: bool,
    ) -> Result<()> {
        let body = serde_json::to_vec(&PresenceRequest {
            key: key.to_string(),
            channel: channel.to_string(),
            status,
            changes,
        })?;

        let token = self
            .transport
            .publish(PRESENCE_PREFIX, QoS::AtLeastOnce, false, body);
        self.wait(token).await
    }

    /// Asks the service to generate a scoped access key for the channel.
    pub async fn generate_key(
        &self,
        key: &str,
        channel: &str,
        permissions: &str,
        ttl: u32,
    ) -> Result<String> {
        let body = serde_json::to_vec(&KeyGenRequest {
            key: key.to_string(),
            channel: channel.to_string(),
            permissions: permissions.to_string(),
            ttl,
        })?;

        match self.request("keygen", body).await? {
            ServiceReply::KeyGen(resp) => Ok(resp.key),
            _ => Err(Error::UnexpectedReply),
        }
    }

    /// Creates a shared link to the channel under the given name.
    pub async fn create_link(
        &self,
        key: &str,
        channel: &str,
        name: &str,
        handler: Option<MessageHandler>,
        options: &[ChannelOption],
    ) -> Result<Link> {
        self.link(key, channel, name, handler, options, false).await
    }

    /// Creates a private link to the channel under the given name.
    pub async fn create_private_link(
        &self,
        key: &str,
        channel: &str,
        name: &str,
        handler: Option<MessageHandler>,
        options: &[ChannelOption],
    ) -> Result<Link> {
        self.link(key, channel, name, handler, options, true).await
    }

    async fn link(
        &self,
        key: &str,
        channel: &str,
        name: &str,
        handler: Option<MessageHandler>,
        options: &[ChannelOption],
        private: bool,
    ) -> Result<Link> {
        let subscribe = handler.is_some();
        let body = serde_json::to_vec(&LinkRequest {
            name: name.to_string(),
            key: key.to_string(),
            channel: format_topic("", channel, options),
            subscribe,
            private,
        })?;

        match self.request("link", body).await? {
            ServiceReply::Link(link) => {
                if let Some(handler) = handler {
                    self.subscriptions
                        .lock()
                        .unwrap()
                        .add_handler(&link.channel, handler);
                }
                Ok(link)
            }
            _ => Err(Error::UnexpectedReply),
        }
    }

    /// The service-side identity of this session, resolved lazily and cached
    /// after the first success.
    pub async fn identity(&self) -> Result<String> {
        if let Some(id) = self.identity.lock().unwrap().clone() {
            return Ok(id);
        }

        let body = serde_json::to_vec(&serde_json::Value::Null)?;
        match self.request("me", body).await? {
            ServiceReply::Me(me) => {
                *self.identity.lock().unwrap() = Some(me.id.clone());
                Ok(me.id)
            }
            _ => Err(Error::UnexpectedReply),
        }
    }

    /// Publishes an administrative request and blocks until the correlated
    /// reply arrives or the timeout elapses. The correlation slot is keyed
    /// by the publish operation's transport-assigned message id.
    async fn request(&self, operation: &str, body: Vec<u8>) -> Result<ServiceReply> {
        let topic = format!("{SERVICE_ROOT}{operation}/");
        let token = self
            .transport
            .publish(&topic, QoS::AtLeastOnce, false, body);

        let request_id = token.message_id();
        let slot = self.pending.put(request_id);

        if let Err(e) = self.wait(token).await {
            self.pending.discard(request_id);
            return Err(e);
        }

        match tokio::time::timeout(self.timeout, slot).await {
            Err(_) => {
                // Late replies for this id are dropped from here on.
                self.pending.discard(request_id);
                Err(Error::Timeout)
            }
            Ok(Err(_)) => Err(Error::Timeout),
            Ok(Ok(result)) => result,
        }
    }

    // Waits for the operation to complete, bounded by the session timeout.
    async fn wait(&self, token: DeliveryToken) -> Result<()> {
        token.wait(self.timeout).await
    }
}

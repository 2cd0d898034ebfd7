use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::protocol::{Message, QoS};
use crate::transport::{DeliveryToken, Transport};

/// Record of one publish operation issued through the transport.
#[derive(Debug, Clone)]
pub struct PublishedFrame {
    pub message_id: u16,
    pub topic: String,
    pub qos: QoS,
    pub retain: bool,
    pub payload: Vec<u8>,
}

/// In-process loopback transport.
///
/// Records every outbound operation and lets the other side be played by the
/// test (or demo) itself: `inject` pushes a message into the inbound stream
/// exactly as a connected service would. All operations acknowledge
/// immediately.
pub struct MemoryTransport {
    next_id: AtomicU16,
    connected: AtomicBool,
    published: Mutex<Vec<PublishedFrame>>,
    subscriptions: Mutex<Vec<String>>,
    inbound_tx: Mutex<Option<mpsc::UnboundedSender<Message>>>,
    inbound_rx: Mutex<Option<mpsc::UnboundedReceiver<Message>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            next_id: AtomicU16::new(1),
            connected: AtomicBool::new(false),
            published: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(Vec::new()),
            inbound_tx: Mutex::new(Some(tx)),
            inbound_rx: Mutex::new(Some(rx)),
        }
    }

    fn next_message_id(&self) -> u16 {
        loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            if id != 0 {
                return id;
            }
        }
    }

    /// Pushes a message into the inbound stream, as the service would.
    pub fn inject(&self, topic: &str, payload: impl Into<Vec<u8>>) {
        let sender = self.inbound_tx.lock().unwrap().clone();
        if let Some(sender) = sender {
            let _ = sender.send(Message::new(topic, payload));
        }
    }

    /// Closes the inbound stream, simulating a lost connection.
    pub fn drop_connection(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.inbound_tx.lock().unwrap().take();
    }

    /// Every publish issued so far, in order.
    pub fn published(&self) -> Vec<PublishedFrame> {
        self.published.lock().unwrap().clone()
    }

    /// Topics with an active subscription.
    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().unwrap().clone()
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemoryTransport {
    fn connect(&self) -> DeliveryToken {
        self.connected.store(true, Ordering::SeqCst);
        DeliveryToken::resolved(0)
    }

    fn disconnect(&self, _grace: Duration) {
        self.drop_connection();
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn publish(&self, topic: &str, qos: QoS, retain: bool, payload: Vec<u8>) -> DeliveryToken {
        let id = self.next_message_id();
        self.published.lock().unwrap().push(PublishedFrame {
            message_id: id,
            topic: topic.to_string(),
            qos,
            retain,
            payload,
        });
        DeliveryToken::resolved(id)
    }

    fn subscribe(&self, topic: &str, _qos: QoS) -> DeliveryToken {
        self.subscriptions.lock().unwrap().push(topic.to_string());
        DeliveryToken::resolved(self.next_message_id())
    }

    fn unsubscribe(&self, topic: &str) -> DeliveryToken {
        self.subscriptions.lock().unwrap().retain(|t| t != topic);
        DeliveryToken::resolved(self.next_message_id())
    }

    fn inbound(&self) -> Option<mpsc::UnboundedReceiver<Message>> {
        self.inbound_rx.lock().unwrap().take()
    }
}

use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tracing::{debug, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::protocol::{Message, QoS};
use crate::transport::message::{Frame, InboundFrame};
use crate::transport::{DeliveryToken, Transport};

struct Shared {
    url: String,
    next_id: AtomicU16,
    connected: AtomicBool,
    outbound: Mutex<Option<mpsc::UnboundedSender<WsMessage>>>,
    inbound_tx: Mutex<Option<mpsc::UnboundedSender<Message>>>,
    inbound_rx: Mutex<Option<mpsc::UnboundedReceiver<Message>>>,
}

/// WebSocket transport speaking JSON frames.
///
/// Outbound operations are serialized as [`Frame`] values and pushed through
/// an unbounded channel drained by a writer task; a reader task decodes
/// [`InboundFrame`] values and feeds the single inbound stream the dispatch
/// loop consumes. Message ids come from an atomic counter and skip zero.
pub struct WebSocketTransport {
    shared: Arc<Shared>,
}

impl WebSocketTransport {
    pub fn new(url: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            shared: Arc::new(Shared {
                url: url.into(),
                next_id: AtomicU16::new(1),
                connected: AtomicBool::new(false),
                outbound: Mutex::new(None),
                inbound_tx: Mutex::new(Some(tx)),
                inbound_rx: Mutex::new(Some(rx)),
            }),
        }
    }

    fn next_message_id(&self) -> u16 {
        loop {
            let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
            if id != 0 {
                return id;
            }
        }
    }

    fn send_frame(&self, id: u16, frame: Frame) -> DeliveryToken {
        let text = match serde_json::to_string(&frame) {
            Ok(text) => text,
            Err(e) => return DeliveryToken::failed(id, e.to_string()),
        };

        let sender = self.shared.outbound.lock().unwrap().clone();
        match sender {
            Some(tx) => match tx.send(WsMessage::Text(text.into())) {
                Ok(()) => DeliveryToken::resolved(id),
                Err(_) => DeliveryToken::failed(id, "connection closed"),
            },
            None => DeliveryToken::failed(id, "not connected"),
        }
    }
}

impl Transport for WebSocketTransport {
    fn connect(&self) -> DeliveryToken {
        let (ack, token) = DeliveryToken::pending(0);
        let shared = self.shared.clone();

        tokio::spawn(async move {
            let stream = match connect_async(shared.url.as_str()).await {
                Ok((stream, _response)) => stream,
                Err(e) => {
                    let _ = ack.send(Err(e.to_string()));
                    return;
                }
            };

            let (mut sink, mut source) = stream.split();
            let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
            *shared.outbound.lock().unwrap() = Some(tx);
            shared.connected.store(true, Ordering::SeqCst);
            let _ = ack.send(Ok(()));

            // Writer task: drain queued frames into the socket.
            tokio::spawn(async move {
                while let Some(frame) = rx.recv().await {
                    if let Err(e) = sink.send(frame).await {
                        warn!("failed to send frame: {e}");
                        break;
                    }
                }
            });

            // Reader task: decode inbound frames until the socket closes.
            tokio::spawn(async move {
                while let Some(Ok(msg)) = source.next().await {
                    if !msg.is_text() {
                        continue;
                    }
                    let Ok(text) = msg.to_text() else { continue };
                    match serde_json::from_str::<InboundFrame>(text) {
                        Ok(frame) => {
                            let sender = shared.inbound_tx.lock().unwrap().clone();
                            if let Some(sender) = sender {
                                let _ = sender.send(Message::new(frame.topic, frame.payload));
                            }
                        }
                        Err(e) => debug!("dropping malformed inbound frame: {e}"),
                    }
                }

                // Closing the inbound channel ends the dispatch loop.
                shared.connected.store(false, Ordering::SeqCst);
                shared.outbound.lock().unwrap().take();
                shared.inbound_tx.lock().unwrap().take();
            });
        });

        token
    }

    fn disconnect(&self, grace: Duration) {
        let shared = self.shared.clone();
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            shared.connected.store(false, Ordering::SeqCst);
            shared.outbound.lock().unwrap().take();
            shared.inbound_tx.lock().unwrap().take();
        });
    }

    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    fn publish(&self, topic: &str, qos: QoS, retain: bool, payload: Vec<u8>) -> DeliveryToken {
        let id = self.next_message_id();
        self.send_frame(
            id,
            Frame::Publish {
                topic: topic.to_string(),
                payload: String::from_utf8_lossy(&payload).into_owned(),
                qos: qos.as_u8(),
                retain,
                message_id: id,
                timestamp: chrono::Utc::now().timestamp_millis(),
            },
        )
    }

    fn subscribe(&self, topic: &str, qos: QoS) -> DeliveryToken {
        let id = self.next_message_id();
        self.send_frame(
            id,
            Frame::Subscribe {
                topic: topic.to_string(),
                qos: qos.as_u8(),
            },
        )
    }

    fn unsubscribe(&self, topic: &str) -> DeliveryToken {
        let id = self.next_message_id();
        self.send_frame(
            id,
            Frame::Unsubscribe {
                topic: topic.to_string(),
            },
        )
    }

    fn inbound(&self) -> Option<mpsc::UnboundedReceiver<Message>> {
        self.shared.inbound_rx.lock().unwrap().take()
    }
}

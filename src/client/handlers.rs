use std::sync::{Arc, RwLock};

use crate::protocol::{ErrorEnvelope, PresenceEvent};
use crate::routing::MessageHandler;
use crate::utils::Error;

/// Called once the connection is established.
pub type ConnectHandler = Arc<dyn Fn() + Send + Sync>;

/// Called when the connection is lost, with the cause.
pub type DisconnectHandler = Arc<dyn Fn(&Error) + Send + Sync>;

/// Called for every decoded presence event.
pub type PresenceHandler = Arc<dyn Fn(PresenceEvent) + Send + Sync>;

/// Called for service errors not correlated to any pending request.
pub type ErrorHandler = Arc<dyn Fn(ErrorEnvelope) + Send + Sync>;

/// The optional user-registered callback slots, each invoked synchronously
/// from the inbound dispatch context. Registration may happen from any
/// thread, before or after connecting.
#[derive(Default)]
pub struct Callbacks {
    message: RwLock<Option<MessageHandler>>,
    connect: RwLock<Option<ConnectHandler>>,
    disconnect: RwLock<Option<DisconnectHandler>>,
    presence: RwLock<Option<PresenceHandler>>,
    error: RwLock<Option<ErrorHandler>>,
}

impl Callbacks {
    pub fn set_message(&self, handler: MessageHandler) {
        *self.message.write().unwrap() = Some(handler);
    }

    pub fn set_connect(&self, handler: ConnectHandler) {
        *self.connect.write().unwrap() = Some(handler);
    }

    pub fn set_disconnect(&self, handler: DisconnectHandler) {
        *self.disconnect.write().unwrap() = Some(handler);
    }

    pub fn set_presence(&self, handler: PresenceHandler) {
        *self.presence.write().unwrap() = Some(handler);
    }

    pub fn set_error(&self, handler: ErrorHandler) {
        *self.error.write().unwrap() = Some(handler);
    }

    pub fn message(&self) -> Option<MessageHandler> {
        self.message.read().unwrap().clone()
    }

    pub fn connect(&self) -> Option<ConnectHandler> {
        self.connect.read().unwrap().clone()
    }

    pub fn disconnect(&self) -> Option<DisconnectHandler> {
        self.disconnect.read().unwrap().clone()
    }

    pub fn presence(&self) -> Option<PresenceHandler> {
        self.presence.read().unwrap().clone()
    }

    pub fn error(&self) -> Option<ErrorHandler> {
        self.error.read().unwrap().clone()
    }
}

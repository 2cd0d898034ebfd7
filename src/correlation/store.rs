use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::protocol::ServiceReply;
use crate::utils::Error;

/// What a pending request eventually resolves to: a typed reply, or the
/// service's correlated error envelope.
pub type ReplyResult = Result<ServiceReply, Error>;

/// In-flight request store.
///
/// `put` is called from the requesting context immediately around the publish
/// operation; `notify` from the inbound dispatch context. The map is guarded
/// so that lookup+mutate pairs are atomic; each slot is filled at most once
/// because `notify` removes the sender before using it.
#[derive(Default)]
pub struct PendingRequests {
    slots: Mutex<HashMap<u16, oneshot::Sender<ReplyResult>>>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a one-shot slot for `request_id` and returns the receiving
    /// half the caller waits on. Ids are allocated by the transport and are
    /// unique among outstanding requests; re-registering a still-open id
    /// overwrites the old slot.
    pub fn put(&self, request_id: u16) -> oneshot::Receiver<ReplyResult> {
        let (tx, rx) = oneshot::channel();
        self.slots.lock().unwrap().insert(request_id, tx);
        rx
    }

    /// Delivers `result` to the slot registered for `request_id`, removing it.
    ///
    /// Returns false when no waiter received the value: the slot was never
    /// registered, was already delivered, or the caller abandoned it after a
    /// timeout. Late deliveries are dropped, never a crash.
    pub fn notify(&self, request_id: u16, result: ReplyResult) -> bool {
        let slot = self.slots.lock().unwrap().remove(&request_id);
        match slot {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }

    /// Abandons the slot for `request_id` so a late reply can no longer reach
    /// a caller that has already returned. No-op when absent.
    pub fn discard(&self, request_id: u16) {
        self.slots.lock().unwrap().remove(&request_id);
    }

    pub fn len(&self) -> usize {
        self.slots.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

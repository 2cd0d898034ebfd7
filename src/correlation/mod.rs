//! The `correlation` module bridges the fire-and-forget transport into
//! synchronous-looking request/response calls.
//!
//! Every administrative request registers a one-shot slot keyed by the
//! transport-assigned message id of its publish operation; the inbound
//! dispatch context resolves the slot when the correlated reply arrives.

pub mod store;

pub use store::{PendingRequests, ReplyResult};

#[cfg(test)]
mod tests;

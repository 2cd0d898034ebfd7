//! The `routing` module maintains the mapping from channel patterns to
//! subscription callbacks and answers which callbacks match a concrete
//! inbound topic.
//!
//! Patterns are slash-delimited; a `+` segment matches exactly one topic
//! segment and a trailing `#` segment matches any number of remaining ones.
//! Lookup cost is proportional to the topic's depth, not to the number of
//! registered patterns.

pub mod trie;

pub use trie::SubscriptionTrie;

use std::sync::Arc;

use crate::protocol::Message;

/// Callback invoked for every inbound message matching a subscription.
pub type MessageHandler = Arc<dyn Fn(&Message) + Send + Sync>;

#[cfg(test)]
mod tests;

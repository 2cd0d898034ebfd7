use std::sync::{Arc, Mutex};

use super::{MessageHandler, SubscriptionTrie};
use crate::protocol::Message;

// Returns a handler that records its label on every invocation.
fn recording(label: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> MessageHandler {
    let log = log.clone();
    Arc::new(move |_: &Message| log.lock().unwrap().push(label))
}

fn run_all(handlers: &[MessageHandler], topic: &str) {
    let msg = Message::new(topic, "x");
    for h in handlers {
        h(&msg);
    }
}

#[test]
fn test_lookup_exact_match() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut trie = SubscriptionTrie::new();
    trie.add_handler("a/b/c", recording("abc", &log));

    assert_eq!(trie.lookup("a/b/c").len(), 1);
    assert!(trie.lookup("a/b").is_empty());
    assert!(trie.lookup("a/b/c/d").is_empty());
    assert!(trie.lookup("x/b/c").is_empty());
}

#[test]
fn test_lookup_single_level_wildcard() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut trie = SubscriptionTrie::new();
    trie.add_handler("a/+/c", recording("a+c", &log));

    assert_eq!(trie.lookup("a/b/c").len(), 1);
    assert_eq!(trie.lookup("a/x/c").len(), 1);
    assert!(trie.lookup("a/b/d/c").is_empty());
    assert!(trie.lookup("a/b").is_empty());
}

#[test]
fn test_lookup_multi_level_wildcard() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut trie = SubscriptionTrie::new();
    trie.add_handler("a/#", recording("a#", &log));

    assert_eq!(trie.lookup("a/b").len(), 1);
    assert_eq!(trie.lookup("a/b/c/d").len(), 1);
    assert_eq!(trie.lookup("a").len(), 1);
    assert!(trie.lookup("b/c").is_empty());
}

#[test]
fn test_lookup_precedence_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut trie = SubscriptionTrie::new();
    trie.add_handler("a/#", recording("multi", &log));
    trie.add_handler("a/+", recording("single", &log));
    trie.add_handler("a/b", recording("exact", &log));

    let handlers = trie.lookup("a/b");
    assert_eq!(handlers.len(), 3);
    run_all(&handlers, "a/b");
    assert_eq!(*log.lock().unwrap(), vec!["exact", "single", "multi"]);
}

#[test]
fn test_same_pattern_preserves_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut trie = SubscriptionTrie::new();
    trie.add_handler("sensors/temp", recording("first", &log));
    trie.add_handler("sensors/temp", recording("second", &log));

    let handlers = trie.lookup("sensors/temp");
    assert_eq!(handlers.len(), 2);
    run_all(&handlers, "sensors/temp");
    assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn test_remove_handler_drops_all_callbacks() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut trie = SubscriptionTrie::new();
    trie.add_handler("a/b", recording("one", &log));
    trie.add_handler("a/b", recording("two", &log));

    trie.remove_handler("a/b");
    assert!(trie.lookup("a/b").is_empty());
}

#[test]
fn test_remove_handler_keeps_sibling_patterns() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut trie = SubscriptionTrie::new();
    trie.add_handler("a/b", recording("ab", &log));
    trie.add_handler("a/c", recording("ac", &log));

    trie.remove_handler("a/b");
    assert!(trie.lookup("a/b").is_empty());
    assert_eq!(trie.lookup("a/c").len(), 1);
}

#[test]
fn test_remove_nonexistent_pattern_is_noop() {
    let mut trie = SubscriptionTrie::new();
    trie.remove_handler("never/registered");
    assert!(trie.lookup("never/registered").is_empty());
}

#[test]
fn test_remove_wildcard_pattern_is_literal() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut trie = SubscriptionTrie::new();
    trie.add_handler("a/+/c", recording("wild", &log));
    trie.add_handler("a/b/c", recording("lit", &log));

    // Removing the literal pattern must not touch the wildcard one.
    trie.remove_handler("a/b/c");
    assert_eq!(trie.lookup("a/b/c").len(), 1);
}

#[test]
fn test_empty_segments_are_literal() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut trie = SubscriptionTrie::new();
    trie.add_handler("a//b", recording("gap", &log));

    assert_eq!(trie.lookup("a//b").len(), 1);
    assert!(trie.lookup("a/b").is_empty());
}

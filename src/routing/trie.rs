use std::collections::HashMap;

use crate::routing::MessageHandler;

#[derive(Default)]
struct Node {
    children: HashMap<String, Node>,
    handlers: Vec<MessageHandler>,
}

impl Node {
    fn is_empty(&self) -> bool {
        self.children.is_empty() && self.handlers.is_empty()
    }
}

/// Segment trie from channel pattern to ordered handler list.
///
/// Registrations are long-lived relative to inbound volume, so the trie is
/// optimized for lookup: a walk visits at most three children per segment
/// (exact, `+`, `#`) regardless of how many patterns are registered.
#[derive(Default)]
pub struct SubscriptionTrie {
    root: Node,
}

impl SubscriptionTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a callback to the pattern's handler list, creating the path
    /// on demand. Empty segments are treated as literal empty strings.
    pub fn add_handler(&mut self, pattern: &str, handler: MessageHandler) {
        let mut node = &mut self.root;
        for segment in pattern.split('/') {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.handlers.push(handler);
    }

    /// Removes every callback bound to the exact literal pattern, pruning
    /// nodes left without handlers or children. Unknown patterns are a no-op.
    pub fn remove_handler(&mut self, pattern: &str) {
        let segments: Vec<&str> = pattern.split('/').collect();
        Self::remove(&mut self.root, &segments);
    }

    fn remove(node: &mut Node, segments: &[&str]) {
        let Some((head, rest)) = segments.split_first() else {
            node.handlers.clear();
            return;
        };
        if let Some(child) = node.children.get_mut(*head) {
            Self::remove(child, rest);
            if child.is_empty() {
                node.children.remove(*head);
            }
        }
    }

    /// Returns every callback whose pattern matches the concrete topic, in
    /// registration order along each matching path. At each level an exact
    /// literal child is tried first, then `+`, then `#`; the `#` child
    /// short-circuits the remaining segments.
    pub fn lookup(&self, topic: &str) -> Vec<MessageHandler> {
        let segments: Vec<&str> = topic.split('/').collect();
        let mut matched = Vec::new();
        Self::walk(&self.root, &segments, &mut matched);
        matched
    }

    fn walk(node: &Node, segments: &[&str], matched: &mut Vec<MessageHandler>) {
        let Some((head, rest)) = segments.split_first() else {
            matched.extend(node.handlers.iter().cloned());
            // "a/#" also matches "a" itself
            if let Some(child) = node.children.get("#") {
                matched.extend(child.handlers.iter().cloned());
            }
            return;
        };

        if let Some(child) = node.children.get(*head) {
            Self::walk(child, rest, matched);
        }
        if let Some(child) = node.children.get("+") {
            Self::walk(child, rest, matched);
        }
        if let Some(child) = node.children.get("#") {
            matched.extend(child.handlers.iter().cloned());
        }
    }
}

//! Host-facing surface: produced records, selector options, and the consumer
//! seam the receiver delivers inbound items into.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// One output record from the action node, paired with the input item that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeOutput {
    pub json: Value,
    /// Index of the originating input item (for downstream pairing).
    pub item: usize,
}

/// One entry in a dependent selector field (e.g. the inbox picker).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionItem {
    pub label: String,
    pub value: String,
    pub description: String,
}

/// Consumer of produced workflow items. The receiver acknowledges the remote
/// caller before the consumer runs; delivery must not assume the HTTP exchange
/// is still open.
#[async_trait]
pub trait ItemConsumer: Send + Sync {
    async fn deliver(&self, item: Value);
}

use std::collections::VecDeque;

use crate::dom::dom_model::NodeId;

/// Coalescing window for batches of inserted nodes.
pub const COALESCE_WINDOW_MS: u64 = 50;
/// Nodes matched against the selector set per frame pump.
pub const FRAME_CHUNK: usize = 64;

/// Batches DOM insertions so high-churn pages pay per-window, not
/// per-mutation, and large bursts are chunked across frames instead of
/// blocking the main thread.
#[derive(Debug)]
pub struct MutationBatcher {
    window_ms: u64,
    chunk: usize,
    pending: Vec<NodeId>,
    deadline: Option<u64>,
    queue: VecDeque<NodeId>,
}

impl Default for MutationBatcher {
    fn default() -> Self {
        MutationBatcher::new(COALESCE_WINDOW_MS, FRAME_CHUNK)
    }
}

impl MutationBatcher {
    pub fn new(window_ms: u64, chunk: usize) -> Self {
        MutationBatcher {
            window_ms,
            chunk: chunk.max(1),
            pending: Vec::new(),
            deadline: None,
            queue: VecDeque::new(),
        }
    }

    /// Record an inserted node. The first record of a batch opens the
    /// coalescing window; later ones ride along.
    pub fn record(&mut self, node: NodeId, now_ms: u64) {
        self.pending.push(node);
        if self.deadline.is_none() {
            self.deadline = Some(now_ms + self.window_ms);
        }
    }

    /// One frame's worth of work: when the window has elapsed the pending
    /// batch moves to the work queue, and at most `chunk` nodes come back
    /// for matching. Call once per frame until `is_idle`.
    pub fn pump(&mut self, now_ms: u64) -> Vec<NodeId> {
        if self.deadline.is_some_and(|d| now_ms >= d) {
            self.queue.extend(self.pending.drain(..));
            self.deadline = None;
        }
        let take = self.chunk.min(self.queue.len());
        self.queue.drain(..take).collect()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.queue.is_empty()
    }

    pub fn backlog(&self) -> usize {
        self.pending.len() + self.queue.len()
    }
}

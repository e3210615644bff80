//! Bookkeeping for in-flight avatar compressions.
//!
//! Every compression gets a ticket from a generation counter and a child
//! cancellation token. A completion only counts if its ticket is still
//! pending; tickets that timed out, were abandoned or outlived the session
//! are stale and their results are dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use log::debug;
use tokio_util::sync::CancellationToken;

/// Identifies one compression attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompressionTicket(u64);

impl fmt::Display for CompressionTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct PendingCompression {
    pub file_name: String,
    pub started_at: Instant,
    token: CancellationToken,
}

#[derive(Debug)]
pub struct CompressionTracker {
    generation: u64,
    pending: BTreeMap<CompressionTicket, PendingCompression>,
    root: CancellationToken,
}

impl Default for CompressionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionTracker {
    pub fn new() -> Self {
        Self {
            generation: 0,
            pending: BTreeMap::new(),
            root: CancellationToken::new(),
        }
    }

    /// Register a new attempt and hand back its ticket and token
    pub fn begin(
        &mut self,
        file_name: impl Into<String>,
    ) -> (CompressionTicket, CancellationToken) {
        self.generation = self.generation.wrapping_add(1);
        let ticket = CompressionTicket(self.generation);
        let token = self.root.child_token();

        self.pending.insert(
            ticket,
            PendingCompression {
                file_name: file_name.into(),
                started_at: Instant::now(),
                token: token.clone(),
            },
        );

        (ticket, token)
    }

    /// Settle `ticket`; `None` means the result is stale and must be dropped
    pub fn finish(
        &mut self,
        ticket: CompressionTicket,
    ) -> Option<PendingCompression> {
        self.pending.remove(&ticket)
    }

    pub fn is_pending(&self, ticket: CompressionTicket) -> bool {
        self.pending.contains_key(&ticket)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Cancel and forget every pending attempt
    ///
    /// Later attempts still work; only the ones pending now are affected.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        for (ticket, pending) in std::mem::take(&mut self.pending) {
            debug!(
                "Cancelling compression {} of {}",
                ticket, pending.file_name
            );
            pending.token.cancel();
        }
        cancelled
    }
}

impl Drop for CompressionTracker {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_increase_and_settle_once() {
        let mut tracker = CompressionTracker::new();
        let (first, _) = tracker.begin("a.png");
        let (second, _) = tracker.begin("b.png");

        assert!(second > first);
        assert_eq!(tracker.pending_count(), 2);

        let settled = tracker.finish(first).expect("pending");
        assert_eq!(settled.file_name, "a.png");
        assert!(tracker.finish(first).is_none());
        assert!(tracker.is_pending(second));
    }

    #[test]
    fn cancel_all_fires_tokens_and_makes_tickets_stale() {
        let mut tracker = CompressionTracker::new();
        let (ticket, token) = tracker.begin("a.png");

        assert_eq!(tracker.cancel_all(), 1);
        assert!(token.is_cancelled());
        assert!(tracker.finish(ticket).is_none());

        let (_, fresh) = tracker.begin("b.png");
        assert!(!fresh.is_cancelled());
    }

    #[test]
    fn dropping_tracker_cancels_outstanding_tokens() {
        let mut tracker = CompressionTracker::new();
        let (_, token) = tracker.begin("a.png");

        drop(tracker);

        assert!(token.is_cancelled());
    }
}

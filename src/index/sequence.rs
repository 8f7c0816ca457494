//! Last-write-wins ordering for overlapping loads

use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket handed out when a load starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Hands out increasing tickets; only the newest one may apply its result
#[derive(Debug, Default)]
pub struct LoadSequence {
    latest: AtomicU64,
}

impl LoadSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load, superseding every earlier ticket
    pub fn begin(&self) -> LoadTicket {
        LoadTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

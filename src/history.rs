//! history.rs: bounded in-memory log of recently processed leads for the dashboard.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::lead::{CompleteLead, LeadTier};

pub const DEFAULT_CAPACITY: usize = 200;
const MAX_CAPACITY: usize = 10_000;

#[derive(Debug)]
pub struct LeadHistory {
    inner: Mutex<VecDeque<CompleteLead>>,
    cap: usize,
}

impl Default for LeadHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl LeadHistory {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, MAX_CAPACITY);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(cap)),
            cap,
        }
    }

    pub fn push(&self, lead: CompleteLead) {
        let mut v = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        v.push_back(lead);
        while v.len() > self.cap {
            v.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Newest first, optionally restricted to one tier.
    pub fn recent(&self, tier: Option<LeadTier>, limit: usize) -> Vec<CompleteLead> {
        let v = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        v.iter()
            .rev()
            .filter(|l| tier.map_or(true, |t| l.tier == t))
            .take(limit)
            .cloned()
            .collect()
    }
}

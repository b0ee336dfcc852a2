//! Scoring-call budget and usage accounting.
//!
//! The whole point of adaptive routing is cost control, so the runtime
//! counts every scoring call and enforces a hard cap per evaluation.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// Hard cap on scoring calls for one evaluation.
pub struct CallBudget {
    max_calls: u32,
    used: AtomicU32,
}

impl CallBudget {
    pub fn new(max_calls: u32) -> Self {
        Self {
            max_calls,
            used: AtomicU32::new(0),
        }
    }

    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    /// Whether `calls` more scoring calls fit in the budget.
    pub fn can_afford(&self, calls: u32) -> bool {
        self.remaining() >= calls
    }

    pub fn record(&self, calls: u32) {
        self.used.fetch_add(calls, Ordering::SeqCst);
    }

    pub fn used(&self) -> u32 {
        self.used.load(Ordering::SeqCst)
    }

    pub fn remaining(&self) -> u32 {
        self.max_calls.saturating_sub(self.used())
    }

    pub fn reset(&self) {
        self.used.store(0, Ordering::SeqCst);
    }
}

/// Accumulated usage for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallUsage {
    /// Scoring calls issued.
    pub scoring_calls: u32,

    /// Retries performed by the resilient wrapper.
    pub retries: u32,

    /// Assessments served from cache instead of the provider.
    pub cache_hits: u32,
}

/// Budget plus usage, shared across concurrent role queries.
pub struct CallTracker {
    budget: CallBudget,
    usage: RwLock<CallUsage>,
}

impl CallTracker {
    pub fn new(max_calls: u32) -> Self {
        Self {
            budget: CallBudget::new(max_calls),
            usage: RwLock::new(CallUsage::default()),
        }
    }

    pub fn budget(&self) -> &CallBudget {
        &self.budget
    }

    /// Record one issued scoring call.
    pub fn record_call(&self) {
        self.budget.record(1);
        self.usage.write().scoring_calls += 1;
    }

    pub fn record_retry(&self) {
        self.usage.write().retries += 1;
    }

    pub fn record_cache_hit(&self) {
        self.usage.write().cache_hits += 1;
    }

    pub fn usage(&self) -> CallUsage {
        self.usage.read().clone()
    }

    pub fn reset(&self) {
        self.budget.reset();
        *self.usage.write() = CallUsage::default();
    }
}

//! Write-once result buffer indexed by catalog position
//!
//! Each source owns exactly one slot, so no two tasks ever write the same
//! slot and no global lock is needed. A slot accepts its first write only;
//! once the buffer is closed, late writes are rejected.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::attributes::AttributeSource;
use crate::models::AttributeResult;

#[derive(Debug)]
struct Slot {
    id: String,
    fallback: String,
    result: OnceLock<AttributeResult>,
}

/// In-flight results of one collection run
#[derive(Debug)]
pub struct ResultBuffer {
    slots: Vec<Slot>,
    closed: AtomicBool,
}

impl ResultBuffer {
    /// Creates one empty slot per catalog entry, in catalog order
    pub fn new(catalog: &[AttributeSource]) -> Self {
        let slots = catalog
            .iter()
            .map(|source| Slot {
                id: source.id().to_string(),
                fallback: source.formatter().fallback().to_string(),
                result: OnceLock::new(),
            })
            .collect();

        Self {
            slots,
            closed: AtomicBool::new(false),
        }
    }

    /// Stores the result for a slot
    ///
    /// Returns false when the slot already holds a result, the index is out
    /// of range, or the buffer has been closed.
    pub fn record(&self, index: usize, result: AttributeResult) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }

        match self.slots.get(index) {
            Some(slot) => slot.result.set(result).is_ok(),
            None => false,
        }
    }

    /// Stores a `Failed` result using the slot's own id and fallback text
    pub fn record_failure(
        &self,
        index: usize,
        reason: impl Into<String>,
        latency_ms: u64,
    ) -> bool {
        let Some(slot) = self.slots.get(index) else {
            return false;
        };
        let result =
            AttributeResult::failed(slot.id.clone(), reason, slot.fallback.clone(), latency_ms);
        self.record(index, result)
    }

    /// Number of slots still waiting for a result
    pub fn pending_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.result.get().is_none())
            .count()
    }

    /// Closes the buffer and returns one result per slot in catalog order
    ///
    /// Slots that never settled are filled with a `TimedOut` placeholder
    /// carrying their fallback text.
    pub fn finish(&self, latency_ms: u64) -> Vec<AttributeResult> {
        self.closed.store(true, Ordering::Release);

        self.slots
            .iter()
            .map(|slot| {
                slot.result
                    .get_or_init(|| {
                        AttributeResult::timed_out(
                            slot.id.clone(),
                            slot.fallback.clone(),
                            latency_ms,
                        )
                    })
                    .clone()
            })
            .collect()
    }
}

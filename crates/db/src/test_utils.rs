//! Test utilities for database operations.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tribune_common::{AppError, AppResult};

use crate::repositories::SequenceAllocator;

/// In-memory sequence allocator for service tests.
///
/// Satisfies the same contract as the database-backed allocator: per-name
/// monotonic values, first allocation yields 1.
#[derive(Debug, Default)]
pub struct MemorySequenceAllocator {
    counters: Mutex<HashMap<String, i64>>,
}

impl MemorySequenceAllocator {
    /// Create an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a counter, e.g. to make the next allocation predictable.
    pub fn seed(&self, name: &str, value: i64) {
        if let Ok(mut counters) = self.counters.lock() {
            counters.insert(name.to_string(), value);
        }
    }
}

#[async_trait]
impl SequenceAllocator for MemorySequenceAllocator {
    async fn next_value(&self, name: &str) -> AppResult<i64> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| AppError::Internal("allocator lock poisoned".to_string()))?;
        let value = counters.entry(name.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }
}

//! Sequence allocator.
//!
//! Issues monotonically increasing integer IDs per entity-type name. The
//! bump is a single atomic upsert; a read-then-write here would hand out
//! duplicate IDs under concurrent callers.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use tribune_common::{AppError, AppResult};

/// Issues per-name sequence values.
///
/// Injectable so services can run against an in-memory fake in tests
/// (see `test_utils::MemorySequenceAllocator`).
#[async_trait]
pub trait SequenceAllocator: Send + Sync {
    /// Atomically increment and return the counter for `name`, creating
    /// it at 0 on first use. Two concurrent calls for the same name never
    /// return the same value; gaps from aborted units of work are fine.
    async fn next_value(&self, name: &str) -> AppResult<i64>;
}

/// Sequence repository for database-backed allocation.
#[derive(Clone)]
pub struct SequenceRepository {
    db: Arc<DatabaseConnection>,
}

impl SequenceRepository {
    /// Create a new sequence repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SequenceAllocator for SequenceRepository {
    async fn next_value(&self, name: &str) -> AppResult<i64> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r"INSERT INTO sequence_counter (name, value)
              VALUES ($1, 1)
              ON CONFLICT (name)
              DO UPDATE SET value = sequence_counter.value + 1
              RETURNING value",
            [name.into()],
        );

        let row = self
            .db
            .query_one(stmt)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| {
                AppError::Database(format!("counter upsert returned no row for {name}"))
            })?;

        row.try_get("", "value")
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

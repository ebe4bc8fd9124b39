//! Database repositories.

mod comment;
mod comment_like;
mod reaction;
mod saved_item;
mod sequence;
mod subject;

pub use comment::CommentRepository;
pub use comment_like::CommentLikeRepository;
pub use reaction::ReactionRepository;
pub use saved_item::SavedItemRepository;
pub use sequence::{SequenceAllocator, SequenceRepository};
pub use subject::{SubjectFilter, SubjectRepository};

use sea_orm::{DbErr, SqlErr};
use tribune_common::AppError;

/// Map an insert failure, surfacing unique-key races as [`AppError::Conflict`]
/// so callers can replay them against the now-existing row.
///
/// Race-prone inserts run `ON CONFLICT .. DO NOTHING`, so a lost race comes
/// back as `RecordNotInserted` (no row returned) rather than a driver error.
pub(crate) fn map_insert_err(e: DbErr) -> AppError {
    if matches!(e, DbErr::RecordNotInserted) {
        return AppError::Conflict("row already exists".to_string());
    }
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => AppError::Conflict(msg),
        _ => AppError::Database(e.to_string()),
    }
}

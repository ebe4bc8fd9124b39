//! Comment entity (threaded, depth-capped discussion on a subject).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::subject::SubjectKind;

/// Maximum nesting depth: root (0), reply (1), reply-to-reply (2).
pub const MAX_COMMENT_DEPTH: i32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    /// Subject family.
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: SubjectKind,

    /// Allocator-issued comment ID, unique within the kind.
    #[sea_orm(primary_key, auto_increment = false)]
    pub comment_id: i64,

    /// The subject the comment belongs to.
    pub subject_id: i64,

    /// The comment author.
    pub user_id: i64,

    /// Comment text. Immutable after creation.
    #[sea_orm(column_type = "Text")]
    pub body: String,

    /// Parent comment for replies; null for roots.
    #[sea_orm(nullable)]
    pub parent_comment_id: Option<i64>,

    /// Nesting level: 0 iff `parent_comment_id` is null, else parent depth + 1.
    #[sea_orm(default_value = 0)]
    pub depth: i32,

    /// Like counter (denormalized from the comment_like table).
    #[sea_orm(default_value = 0)]
    pub like_count: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

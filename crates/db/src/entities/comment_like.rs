//! Comment like entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::subject::SubjectKind;

/// At most one like per (kind, comment, user) — composite primary key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment_like")]
pub struct Model {
    /// Subject family.
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: SubjectKind,

    /// The liked comment.
    #[sea_orm(primary_key, auto_increment = false)]
    pub comment_id: i64,

    /// The user who liked it.
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

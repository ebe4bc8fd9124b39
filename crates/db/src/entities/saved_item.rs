//! Saved item entity (per-user bookmarks over subjects).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::subject::SubjectKind;

/// At most one saved row per (kind, subject, user) — composite primary key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "saved_item")]
pub struct Model {
    /// Subject family.
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: SubjectKind,

    /// The saved subject.
    #[sea_orm(primary_key, auto_increment = false)]
    pub subject_id: i64,

    /// The user who saved it.
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

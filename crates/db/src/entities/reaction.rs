//! Reaction entity (like/dislike on a subject).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::subject::SubjectKind;

/// Reaction kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    #[sea_orm(string_value = "like")]
    Like,
    #[sea_orm(string_value = "dislike")]
    Dislike,
}

/// At most one reaction per (kind, subject, user) — enforced by the
/// composite primary key, not just application logic.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reaction")]
pub struct Model {
    /// Subject family.
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: SubjectKind,

    /// The subject being reacted to.
    #[sea_orm(primary_key, auto_increment = false)]
    pub subject_id: i64,

    /// The user who reacted.
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    /// Like or dislike.
    pub reaction: ReactionKind,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

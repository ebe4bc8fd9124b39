//! Sequence counter entity.
//!
//! One row per entity-type name (`ThreadId`, `ThreadCommentId`, ...).
//! The value is non-decreasing; rows are created implicitly on first
//! allocation and never deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sequence_counter")]
pub struct Model {
    /// Counter name.
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,

    /// Last issued value.
    pub value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

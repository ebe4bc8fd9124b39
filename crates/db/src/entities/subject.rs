//! Subject entity (the liked/commented/saved thing: thread, article, podcast, poll).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The family a subject belongs to.
///
/// One table serves all four families; every relation table carries the
/// kind so that per-family integer IDs never collide across families.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    #[sea_orm(string_value = "thread")]
    Thread,
    #[sea_orm(string_value = "article")]
    Article,
    #[sea_orm(string_value = "podcast")]
    Podcast,
    #[sea_orm(string_value = "poll")]
    Poll,
}

impl SubjectKind {
    /// Counter name used when allocating subject IDs of this kind.
    #[must_use]
    pub const fn counter_name(self) -> &'static str {
        match self {
            Self::Thread => "ThreadId",
            Self::Article => "ArticleId",
            Self::Podcast => "PodcastId",
            Self::Poll => "PollId",
        }
    }

    /// Counter name used when allocating comment IDs under this kind.
    #[must_use]
    pub const fn comment_counter_name(self) -> &'static str {
        match self {
            Self::Thread => "ThreadCommentId",
            Self::Article => "ArticleCommentId",
            Self::Podcast => "PodcastCommentId",
            Self::Poll => "PollCommentId",
        }
    }

}

impl std::str::FromStr for SubjectKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "threads" | "thread" => Ok(Self::Thread),
            "articles" | "article" => Ok(Self::Article),
            "podcasts" | "podcast" => Ok(Self::Podcast),
            "polls" | "poll" => Ok(Self::Poll),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subject")]
pub struct Model {
    /// Subject family.
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: SubjectKind,

    /// Allocator-issued ID, unique within the kind.
    #[sea_orm(primary_key, auto_increment = false)]
    pub subject_id: i64,

    /// Opaque foreign content-system identifier, unique within the kind.
    #[sea_orm(nullable)]
    pub external_ref: Option<String>,

    /// Display title. Lazily created subjects carry only this besides IDs.
    #[sea_orm(nullable)]
    pub title: Option<String>,

    /// Body text, where the family has one.
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,

    /// Owning user. Absent for subjects created lazily via a reaction.
    #[sea_orm(nullable)]
    pub owner_user_id: Option<i64>,

    /// Category the subject is filed under.
    #[sea_orm(nullable)]
    pub category_id: Option<i64>,

    /// Like counter (denormalized from the reaction table).
    #[sea_orm(default_value = 0)]
    pub like_count: i32,

    /// Dislike counter (denormalized from the reaction table).
    #[sea_orm(default_value = 0)]
    pub dislike_count: i32,

    /// Comment counter (denormalized from the comment table).
    #[sea_orm(default_value = 0)]
    pub comment_count: i32,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

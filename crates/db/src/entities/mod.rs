//! Database entities.

pub mod comment;
pub mod comment_like;
pub mod reaction;
pub mod saved_item;
pub mod sequence_counter;
pub mod subject;

pub use comment::Entity as Comment;
pub use comment_like::Entity as CommentLike;
pub use reaction::Entity as Reaction;
pub use saved_item::Entity as SavedItem;
pub use sequence_counter::Entity as SequenceCounter;
pub use subject::Entity as Subject;

pub use comment::MAX_COMMENT_DEPTH;
pub use reaction::ReactionKind;
pub use subject::SubjectKind;

//! Business logic services.

#![allow(missing_docs)]

pub mod bookmark;
pub mod comment;
pub mod reaction;
pub mod subject;

pub use bookmark::{BookmarkService, SaveOutcome, SavedSubjectView, SaverView};
pub use comment::{CommentLikeOutcome, CommentNode, CommentService};
pub use reaction::{ReactionOutcome, ReactionService, ReactionStatus};
pub use subject::{CreateSubjectInput, SubjectService, UpdateSubjectInput};

//! Moderator and admin workflows.
//!
//! The queue merges pending prompts, guides and proposals into one
//! collection view. Transitions are one-way out of `pending` and are
//! followed by a full refetch.

mod filter;
mod queue;
mod source;
mod users;

pub use filter::{ModerationFilter, StatusFilter, TypeFilter};
pub use queue::{check_transition, Decision, ModerationError, ModerationQueue};
pub use source::{
    moderation_endpoint, sort_newest_first, ModerationSource, PendingCounts, MERGE_LIMIT,
};
pub use users::UserAdmin;

//! Typed items served by the RIG API.

mod content;
mod moderation;
mod page;
mod status;
mod user;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use content::{Agent, Guide, Prompt, Proposal, ProposalDraft, Ruleset};
pub use moderation::{ModerationItem, ModerationKind, ModerationStatus};
pub use page::{page_count, Page};
pub use status::{AgentStatus, ContentStatus, ProposalStatus, UserRole};
pub use user::{LoginRequest, TokenResponse, User, UserDraft, UserUpdate};

/// An item type with its own REST collection under `/api/`.
pub trait Resource:
    Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Path segment, e.g. `"guides"` for `/api/guides`.
    const COLLECTION: &'static str;

    fn id(&self) -> i64;

    /// Primary display text.
    fn title(&self) -> &str;

    /// Short status or role tag shown next to the title.
    fn badge(&self) -> Option<&'static str> {
        None
    }
}

/// Local validation for request bodies built from user input.
pub trait Validate {
    /// Names of required fields that are blank.
    fn missing_fields(&self) -> Vec<&'static str>;
}

//! Statically bundled datasets.
//!
//! Every collection view renders its type's fallback list before the first
//! response arrives, and falls back to it again when a fetch fails.

mod bundled;

use crate::model::{Agent, Guide, ModerationItem, Prompt, Proposal, Ruleset, User};

/// Deterministic, always-available dataset for a content type.
pub trait Fallback: Sized {
    /// Same list on every call; no I/O.
    fn fallback() -> Vec<Self>;
}

impl Fallback for Prompt {
    fn fallback() -> Vec<Self> {
        bundled::prompts()
    }
}

impl Fallback for Guide {
    fn fallback() -> Vec<Self> {
        bundled::guides()
    }
}

impl Fallback for Ruleset {
    fn fallback() -> Vec<Self> {
        bundled::rulesets()
    }
}

impl Fallback for Agent {
    fn fallback() -> Vec<Self> {
        bundled::agents()
    }
}

impl Fallback for User {
    fn fallback() -> Vec<Self> {
        bundled::users()
    }
}

// Submitted content has no meaningful offline copy.
impl Fallback for Proposal {
    fn fallback() -> Vec<Self> {
        Vec::new()
    }
}

impl Fallback for ModerationItem {
    fn fallback() -> Vec<Self> {
        Vec::new()
    }
}

//! Unified moderation queue entry built from prompts, guides and proposals.

use serde::{Deserialize, Serialize};

use super::content::{Guide, Prompt, Proposal};
use super::status::{ContentStatus, ProposalStatus};

/// Which moderated source an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationKind {
    Prompt,
    Guide,
    Proposal,
}

impl ModerationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Guide => "guide",
            Self::Proposal => "proposal",
        }
    }

    /// API collection the item lives in.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Prompt => "prompts",
            Self::Guide => "guides",
            Self::Proposal => "proposals",
        }
    }

    /// Query key the status endpoint expects for this kind.
    pub fn status_param(&self) -> &'static str {
        match self {
            Self::Prompt | Self::Guide => "status",
            Self::Proposal => "new_status",
        }
    }
}

impl std::str::FromStr for ModerationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prompt" | "prompts" => Ok(Self::Prompt),
            "guide" | "guides" => Ok(Self::Guide),
            "proposal" | "proposals" => Ok(Self::Proposal),
            other => Err(format!("unknown moderation type '{}'", other)),
        }
    }
}

/// Status of a queue entry, covering both content and proposal lifecycles.
///
/// Serialized as the bare status string. Deserializing "pending" or
/// "rejected" always yields the content variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModerationStatus {
    Content(ContentStatus),
    Proposal(ProposalStatus),
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content(status) => status.as_str(),
            Self::Proposal(status) => status.as_str(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::Content(ContentStatus::Pending) | Self::Proposal(ProposalStatus::Pending)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ModerationKind,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub author_name: Option<String>,
    pub email: Option<String>,
    pub tags: Vec<String>,
    pub status: ModerationStatus,
    /// ISO 8601 timestamp from the API; empty when the API omitted it.
    pub created_at: String,
}

impl From<Prompt> for ModerationItem {
    fn from(p: Prompt) -> Self {
        Self {
            id: p.id,
            kind: ModerationKind::Prompt,
            title: p.title,
            description: p.desc,
            content: p.content,
            author_name: p.author_name,
            email: None,
            tags: p.tags,
            status: ModerationStatus::Content(p.status),
            created_at: p.created_at.unwrap_or_default(),
        }
    }
}

impl From<Guide> for ModerationItem {
    fn from(g: Guide) -> Self {
        Self {
            id: g.id,
            kind: ModerationKind::Guide,
            title: g.title,
            description: g.desc,
            content: g.content,
            author_name: g.author_name,
            email: None,
            tags: Vec::new(),
            status: ModerationStatus::Content(g.status),
            created_at: g.created_at.unwrap_or_default(),
        }
    }
}

impl From<Proposal> for ModerationItem {
    fn from(p: Proposal) -> Self {
        Self {
            id: p.id,
            kind: ModerationKind::Proposal,
            title: p.title,
            description: p.description,
            content: p.content,
            author_name: None,
            email: Some(p.email),
            tags: p.tags,
            status: ModerationStatus::Proposal(p.status),
            created_at: p.created_at.unwrap_or_default(),
        }
    }
}

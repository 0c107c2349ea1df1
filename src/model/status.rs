//! Status and role enumerations shared by the content types.

use serde::{Deserialize, Serialize};

/// Publication status of prompts and guides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    #[default]
    Pending,
    Published,
    Rejected,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Published => "published",
            Self::Rejected => "rejected",
        }
    }

    /// Moderation only moves pending items, and only forward.
    pub fn can_transition_to(&self, next: ContentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Published) | (Self::Pending, Self::Rejected)
        )
    }
}

/// Review status of anonymous content proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn can_transition_to(&self, next: ProposalStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

/// Lifecycle status of an agent descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Active,
    Beta,
    Inactive,
    Deprecated,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Beta => "beta",
            Self::Inactive => "inactive",
            Self::Deprecated => "deprecated",
        }
    }
}

/// Account role. Serialized uppercase, as the API does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    User,
    Moderator,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Moderator => "MODERATOR",
            Self::Admin => "ADMIN",
        }
    }

    /// Next role in the admin table's cycle: USER → MODERATOR → ADMIN → USER.
    pub fn next(&self) -> UserRole {
        match self {
            Self::User => Self::Moderator,
            Self::Moderator => Self::Admin,
            Self::Admin => Self::User,
        }
    }

    pub fn can_moderate(&self) -> bool {
        matches!(self, Self::Moderator | Self::Admin)
    }
}

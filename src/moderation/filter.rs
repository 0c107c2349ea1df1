//! Type and status filters of the moderation queue.

use std::fmt;
use std::str::FromStr;

use crate::model::ModerationKind;

/// Which sources the queue shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Prompts,
    Guides,
    Proposals,
}

impl TypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Prompts => "prompts",
            Self::Guides => "guides",
            Self::Proposals => "proposals",
        }
    }

    /// The one source this filter selects, `None` for `All`.
    pub fn kind(&self) -> Option<ModerationKind> {
        match self {
            Self::All => None,
            Self::Prompts => Some(ModerationKind::Prompt),
            Self::Guides => Some(ModerationKind::Guide),
            Self::Proposals => Some(ModerationKind::Proposal),
        }
    }
}

impl From<ModerationKind> for TypeFilter {
    fn from(kind: ModerationKind) -> Self {
        match kind {
            ModerationKind::Prompt => Self::Prompts,
            ModerationKind::Guide => Self::Guides,
            ModerationKind::Proposal => Self::Proposals,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<ModerationKind>().map(Self::from)
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review state the queue shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Pending,
    Approved,
    Rejected,
    All,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::All => "all",
        }
    }

    /// Value of the `status` query parameter for `kind`'s list endpoint.
    ///
    /// Prompts and guides call an approved item `published` and take `all`
    /// literally; the proposals endpoint wants no filter at all instead.
    pub fn query_value(&self, kind: ModerationKind) -> Option<&'static str> {
        match (self, kind) {
            (Self::Pending, _) => Some("pending"),
            (Self::Rejected, _) => Some("rejected"),
            (Self::Approved, ModerationKind::Proposal) => Some("approved"),
            (Self::Approved, _) => Some("published"),
            (Self::All, ModerationKind::Proposal) => None,
            (Self::All, _) => Some("all"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" | "published" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "all" => Ok(Self::All),
            other => Err(format!("unknown status filter '{}'", other)),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Both filters together; shared between the queue and its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModerationFilter {
    pub kind: TypeFilter,
    pub status: StatusFilter,
}

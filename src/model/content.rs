//! Library content: prompts, guides, rulesets, agents and proposals.

use serde::{Deserialize, Serialize};

use super::status::{AgentStatus, ContentStatus, ProposalStatus};
use super::{Resource, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub copies: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tech: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: ContentStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Reading time label, e.g. "15 МИН".
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub views: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: ContentStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_status: ContentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    /// Display ordinal, e.g. "01".
    #[serde(default)]
    pub number: Option<String>,
    pub title: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default)]
    pub content_status: ContentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: i64,
    /// Kind of content proposed ("prompt", "guide", "agent", ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    pub email: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: ProposalStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Resource for Prompt {
    const COLLECTION: &'static str = "prompts";

    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn badge(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }
}

impl Resource for Guide {
    const COLLECTION: &'static str = "guides";

    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn badge(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }
}

impl Resource for Ruleset {
    const COLLECTION: &'static str = "rulesets";

    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Resource for Agent {
    const COLLECTION: &'static str = "agents";

    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn badge(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }
}

impl Resource for Proposal {
    const COLLECTION: &'static str = "proposals";

    fn id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn badge(&self) -> Option<&'static str> {
        Some(self.status.as_str())
    }
}

/// Body of `POST /api/proposals`; anyone may submit one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProposalDraft {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub email: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Validate for ProposalDraft {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("type", &self.kind),
            ("title", &self.title),
            ("description", &self.description),
            ("content", &self.content),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        missing
    }
}

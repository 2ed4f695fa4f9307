use serde::{Deserialize, Serialize};

/// One activity record in the unified schema, whatever upstream shape it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub actor: Option<String>,
    pub repo: String,
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Commit {
        files: Vec<String>,
        lines_added: u64,
        lines_deleted: u64,
        message: Option<String>,
    },
    PullRequest {
        pr_id: String,
        title: Option<String>,
        files: Vec<String>,
    },
    Review {
        target: Option<String>,
        pr_id: String,
        state: Option<String>,
        comments: u64,
        body: Option<String>,
    },
    Issue {
        issue_id: String,
        title: Option<String>,
        body: Option<String>,
    },
    Comment {
        target: Option<String>,
        issue_id: String,
        comment_id: u64,
        body: Option<String>,
    },
    Assign {
        target: Option<String>,
        issue_id: String,
        body: Option<String>,
    },
}

// New
impl Event {
    pub fn new(
        id: impl ToString,
        actor: Option<String>,
        repo: impl ToString,
        timestamp: Option<String>,
        kind: EventKind,
    ) -> Self {
        Self {
            id: id.to_string(),
            actor,
            repo: repo.to_string(),
            timestamp,
            created_at: None,
            submitted_at: None,
            kind,
        }
    }

    pub fn with_created_at(mut self, created_at: Option<String>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_submitted_at(mut self, submitted_at: Option<String>) -> Self {
        self.submitted_at = submitted_at;
        self
    }
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Commit { .. } => "commit",
            EventKind::PullRequest { .. } => "pull_request",
            EventKind::Review { .. } => "review",
            EventKind::Issue { .. } => "issue",
            EventKind::Comment { .. } => "comment",
            EventKind::Assign { .. } => "assign",
        }
    }
}

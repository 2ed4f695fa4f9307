use crate::model::Issue;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Only the fields the pipeline reads are declared; optional upstream fields are `Option`.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Milestone {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubIssue {
    pub number: u64,
    pub state: String,
    pub title: String,
    pub body: Option<String>,
    pub user: Option<Account>,
    pub milestone: Option<Milestone>,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Present only when the item is a pull request listed through the issues endpoint.
    pub pull_request: Option<Value>,
}

impl GitHubIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn author_login(&self) -> Option<String> {
        self.user.as_ref().map(|user| user.login.clone())
    }
}

impl From<GitHubIssue> for Issue {
    fn from(issue: GitHubIssue) -> Self {
        Issue {
            number: issue.number,
            state: issue.state,
            created_at: issue.created_at,
            closed_at: issue.closed_at,
            creator_login: issue.user.map(|user| user.login),
            milestone_title: issue.milestone.and_then(|milestone| milestone.title),
            title: issue.title,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitSignature {
    pub name: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitData {
    pub author: Option<CommitSignature>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubCommit {
    pub sha: String,
    pub commit: CommitData,
    /// Linked account; `null` when the author email matches no account.
    pub author: Option<Account>,
    #[serde(default)]
    pub files: Vec<ChangedFile>,
}

impl GitHubCommit {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    pub fn actor(&self) -> Option<String> {
        self.author
            .as_ref()
            .map(|account| account.login.clone())
            .or_else(|| self.commit.author.as_ref().and_then(|author| author.name.clone()))
    }

    pub fn authored_at(&self) -> Option<String> {
        self.commit.author.as_ref().and_then(|author| author.date.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequest {
    pub number: u64,
    pub title: Option<String>,
    pub user: Option<Account>,
    pub created_at: Option<String>,
}

impl GitHubPullRequest {
    pub fn author_login(&self) -> Option<String> {
        self.user.as_ref().map(|user| user.login.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubReview {
    pub id: u64,
    pub user: Option<Account>,
    pub state: Option<String>,
    pub body: Option<String>,
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubComment {
    pub id: u64,
    pub user: Option<Account>,
    pub body: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubIssueEvent {
    pub id: u64,
    pub event: String,
    pub actor: Option<Account>,
    pub assignee: Option<Account>,
    pub commit_id: Option<String>,
    pub created_at: Option<String>,
}

impl GitHubIssueEvent {
    pub fn is_assignment(&self) -> bool {
        self.event == "assigned"
    }
}

use crate::github::api::{
    ChangedFile, GitHubComment, GitHubCommit, GitHubIssue, GitHubIssueEvent, GitHubPullRequest,
    GitHubReview,
};
use crate::github::{GitHubClient, ListQuery, Transport};
use crate::model::{Event, EventKind, Repository, Result};
use chrono::SecondsFormat;
use log::{info, warn};

const DETAIL_PER_PAGE: u8 = 100;

/// Turns the upstream listings of one repository into [`Event`]s.
///
/// Each procedure lists at most `limit` parent items and then issues its detail
/// requests one parent at a time. A failed detail request is logged and skipped;
/// only a failed parent listing is returned as an error.
pub trait EventNormalizer {
    async fn commit_events(&self, repo: &Repository, limit: usize) -> Result<Vec<Event>>;
    async fn pull_request_events(&self, repo: &Repository, limit: usize) -> Result<Vec<Event>>;
    async fn issue_events(&self, repo: &Repository, limit: usize) -> Result<Vec<Event>>;
}

impl<'a, T: Transport> EventNormalizer for GitHubClient<'a, T> {
    async fn commit_events(&self, repo: &Repository, limit: usize) -> Result<Vec<Event>> {
        if limit == 0 {
            return Ok(vec![]);
        }
        let url = self.endpoint(repo, "commits");
        let query = ListQuery::new().per_page(page_size(self, limit));
        let commits: Vec<GitHubCommit> = self.fetch_all(&url, &query, Some(limit)).await?;

        let mut events = vec![];
        for commit in &commits {
            let detail_url = self.endpoint(repo, &format!("commits/{}", commit.sha));
            let files = match self.fetch_one::<GitHubCommit>(&detail_url).await {
                Ok(detail) => detail.files,
                Err(err) => {
                    warn!("Skip file stats of commit {} in {}: {}", commit.short_sha(), repo, err);
                    vec![]
                }
            };
            events.push(commit_event(repo, commit, &files));
        }
        info!("Normalized {} commit events from {}", events.len(), repo);
        Ok(events)
    }

    async fn pull_request_events(&self, repo: &Repository, limit: usize) -> Result<Vec<Event>> {
        if limit == 0 {
            return Ok(vec![]);
        }
        let url = self.endpoint(repo, "pulls");
        let query = ListQuery::new().state_all().per_page(page_size(self, limit));
        let pulls: Vec<GitHubPullRequest> = self.fetch_all(&url, &query, Some(limit)).await?;

        let mut events = vec![];
        for pull in &pulls {
            let files_url = self.endpoint(repo, &format!("pulls/{}/files", pull.number));
            let files_query = ListQuery::new().per_page(DETAIL_PER_PAGE);
            let files = match self.fetch_first_page::<ChangedFile>(&files_url, &files_query).await {
                Ok(files) => files.into_iter().map(|file| file.filename).collect(),
                Err(err) => {
                    warn!("Skip files of pull request #{} in {}: {}", pull.number, repo, err);
                    vec![]
                }
            };
            events.push(pull_request_event(repo, pull, files));

            let reviews_url = self.endpoint(repo, &format!("pulls/{}/reviews", pull.number));
            match self.fetch_first_page::<GitHubReview>(&reviews_url, &ListQuery::new()).await {
                Ok(reviews) => events.extend(reviews.iter().map(|review| review_event(repo, pull, review))),
                Err(err) => warn!("Skip reviews of pull request #{} in {}: {}", pull.number, repo, err),
            }
        }
        info!("Normalized {} pull request and review events from {}", events.len(), repo);
        Ok(events)
    }

    async fn issue_events(&self, repo: &Repository, limit: usize) -> Result<Vec<Event>> {
        if limit == 0 {
            return Ok(vec![]);
        }
        // The limit caps the raw listing; pull requests listed there use up their slot.
        let url = self.endpoint(repo, "issues");
        let query = ListQuery::new().state_all().per_page(page_size(self, limit));
        let issues: Vec<GitHubIssue> = self.fetch_all(&url, &query, Some(limit)).await?;
        let detail_query = ListQuery::new().per_page(DETAIL_PER_PAGE);

        let mut events = vec![];
        for issue in issues.iter().filter(|issue| !issue.is_pull_request()) {
            events.push(issue_event(repo, issue));

            let comments_url = self.endpoint(repo, &format!("issues/{}/comments", issue.number));
            match self.fetch_first_page::<GitHubComment>(&comments_url, &detail_query).await {
                Ok(comments) => events.extend(comments.iter().map(|comment| comment_event(repo, issue, comment))),
                Err(err) => warn!("Skip comments of issue #{} in {}: {}", issue.number, repo, err),
            }

            let timeline_url = self.endpoint(repo, &format!("issues/{}/events", issue.number));
            match self.fetch_first_page::<GitHubIssueEvent>(&timeline_url, &detail_query).await {
                Ok(timeline) => events.extend(
                    timeline
                        .iter()
                        .filter(|entry| entry.is_assignment())
                        .map(|entry| assign_event(repo, issue, entry)),
                ),
                Err(err) => warn!("Skip timeline of issue #{} in {}: {}", issue.number, repo, err),
            }
        }
        info!("Normalized {} issue, comment and assign events from {}", events.len(), repo);
        Ok(events)
    }
}

fn page_size<T: Transport>(client: &GitHubClient<'_, T>, limit: usize) -> u8 {
    limit.min(client.config().per_page as usize) as u8
}

fn pr_id(number: u64) -> String {
    format!("PR-{}", number)
}

fn issue_id(number: u64) -> String {
    format!("ISSUE-{}", number)
}

fn commit_event(repo: &Repository, commit: &GitHubCommit, files: &[ChangedFile]) -> Event {
    let kind = EventKind::Commit {
        files: files.iter().map(|file| file.filename.clone()).collect(),
        lines_added: files.iter().map(|file| file.additions).sum(),
        lines_deleted: files.iter().map(|file| file.deletions).sum(),
        message: commit.commit.message.clone(),
    };
    Event::new(
        format!("c-{}", commit.short_sha()),
        commit.actor(),
        repo.slug(),
        commit.authored_at(),
        kind,
    )
}

fn pull_request_event(repo: &Repository, pull: &GitHubPullRequest, files: Vec<String>) -> Event {
    let kind = EventKind::PullRequest {
        pr_id: pr_id(pull.number),
        title: pull.title.clone(),
        files,
    };
    Event::new(
        format!("pr-{}", pull.number),
        pull.author_login(),
        repo.slug(),
        pull.created_at.clone(),
        kind,
    )
    .with_created_at(pull.created_at.clone())
}

fn review_event(repo: &Repository, pull: &GitHubPullRequest, review: &GitHubReview) -> Event {
    let kind = EventKind::Review {
        target: pull.author_login(),
        pr_id: pr_id(pull.number),
        state: review.state.clone(),
        comments: 0,
        body: review.body.clone(),
    };
    Event::new(
        format!("r-{}", review.id),
        review.user.as_ref().map(|user| user.login.clone()),
        repo.slug(),
        review.submitted_at.clone(),
        kind,
    )
    .with_submitted_at(review.submitted_at.clone())
}

fn issue_event(repo: &Repository, issue: &GitHubIssue) -> Event {
    let created_at = issue.created_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let kind = EventKind::Issue {
        issue_id: issue_id(issue.number),
        title: Some(issue.title.clone()),
        body: issue.body.clone(),
    };
    Event::new(
        format!("i-{}", issue.number),
        issue.author_login(),
        repo.slug(),
        Some(created_at.clone()),
        kind,
    )
    .with_created_at(Some(created_at))
}

fn comment_event(repo: &Repository, issue: &GitHubIssue, comment: &GitHubComment) -> Event {
    let kind = EventKind::Comment {
        target: issue.author_login(),
        issue_id: issue_id(issue.number),
        comment_id: comment.id,
        body: comment.body.clone(),
    };
    Event::new(
        format!("cmt-{}", comment.id),
        comment.user.as_ref().map(|user| user.login.clone()),
        repo.slug(),
        comment.created_at.clone(),
        kind,
    )
    .with_created_at(comment.created_at.clone())
}

fn assign_event(repo: &Repository, issue: &GitHubIssue, entry: &GitHubIssueEvent) -> Event {
    let kind = EventKind::Assign {
        target: entry.assignee.as_ref().map(|user| user.login.clone()),
        issue_id: issue_id(issue.number),
        body: entry.commit_id.clone(),
    };
    Event::new(
        format!("ie-{}", entry.id),
        entry.actor.as_ref().map(|user| user.login.clone()),
        repo.slug(),
        entry.created_at.clone(),
        kind,
    )
    .with_created_at(entry.created_at.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::testing::{test_config, ScriptedTransport};
    use serde_json::json;

    const BASE: &str = "https://api.test/repos/o/r";

    fn url(path: &str) -> String {
        format!("{BASE}/{path}")
    }

    fn repo() -> Repository {
        Repository::new("o", "r")
    }

    #[tokio::test]
    async fn commits_aggregate_file_stats_and_fall_back_to_author_name() {
        let config = test_config();
        let transport = ScriptedTransport::default()
            .json(
                &url("commits"),
                json!([
                    {
                        "sha": "aaaaaaa1111",
                        "author": {"login": "alice"},
                        "commit": {"author": {"name": "Alice", "date": "2025-01-02T00:00:00Z"}, "message": "feat"}
                    },
                    {
                        "sha": "bbbbbbb2222",
                        "author": null,
                        "commit": {"author": {"name": "Bob Builder", "date": "2025-01-01T00:00:00Z"}, "message": "fix"}
                    },
                    {
                        "sha": "ccccccc3333",
                        "author": null,
                        "commit": {"author": {"name": "Carol"}, "message": "ignored by limit"}
                    }
                ]),
            )
            .json(
                &url("commits/aaaaaaa1111"),
                json!({
                    "sha": "aaaaaaa1111",
                    "author": {"login": "alice"},
                    "commit": {"message": "feat"},
                    "files": [
                        {"filename": "src/a.rs", "additions": 10, "deletions": 2},
                        {"filename": "src/b.rs", "additions": 5, "deletions": 1}
                    ]
                }),
            )
            .fail(&url("commits/bbbbbbb2222"));
        let client = GitHubClient::new(transport, &config);

        let events = client.commit_events(&repo(), 2).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, "c-aaaaaaa");
        assert_eq!(events[0].actor.as_deref(), Some("alice"));
        assert_eq!(events[0].timestamp.as_deref(), Some("2025-01-02T00:00:00Z"));
        assert_eq!(
            events[0].kind,
            EventKind::Commit {
                files: vec!["src/a.rs".to_string(), "src/b.rs".to_string()],
                lines_added: 15,
                lines_deleted: 3,
                message: Some("feat".to_string()),
            }
        );
        // failed detail request keeps the commit with empty stats
        assert_eq!(events[1].id, "c-bbbbbbb");
        assert_eq!(events[1].actor.as_deref(), Some("Bob Builder"));
        assert!(matches!(
            events[1].kind,
            EventKind::Commit { ref files, lines_added: 0, lines_deleted: 0, .. } if files.is_empty()
        ));
        assert!(!client.transport().requested_urls().contains(&url("commits/ccccccc3333")));
        assert_eq!(client.transport().last_query(&url("commits")).unwrap(), vec![("per_page", "2".to_string()), ("page", "1".to_string())]);
    }

    #[tokio::test]
    async fn pull_request_is_followed_by_its_reviews() {
        let config = test_config();
        let transport = ScriptedTransport::default()
            .json(
                &url("pulls"),
                json!([
                    {"number": 7, "title": "Add cache", "user": {"login": "alice"}, "created_at": "2025-01-03T00:00:00Z"},
                    {"number": 8, "title": "Docs", "user": {"login": "bob"}, "created_at": "2025-01-04T00:00:00Z"}
                ]),
            )
            .json(&url("pulls/7/files"), json!([{"filename": "src/cache.rs", "additions": 3, "deletions": 0}]))
            .json(
                &url("pulls/7/reviews"),
                json!([
                    {"id": 70, "user": {"login": "bob"}, "state": "COMMENTED", "body": "nit", "submitted_at": "2025-01-03T05:00:00Z"},
                    {"id": 71, "user": {"login": "carol"}, "state": "APPROVED", "body": "", "submitted_at": "2025-01-03T06:00:00Z"}
                ]),
            )
            .json(&url("pulls/8/files"), json!([]))
            .status(&url("pulls/8/reviews"), 1, 500, "boom");
        let client = GitHubClient::new(transport, &config);

        let events = client.pull_request_events(&repo(), 30).await.unwrap();

        let ids = events.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["pr-7", "r-70", "r-71", "pr-8"]);
        assert_eq!(
            events[0].kind,
            EventKind::PullRequest {
                pr_id: "PR-7".to_string(),
                title: Some("Add cache".to_string()),
                files: vec!["src/cache.rs".to_string()],
            }
        );
        assert_eq!(events[2].actor.as_deref(), Some("carol"));
        assert_eq!(events[2].submitted_at.as_deref(), Some("2025-01-03T06:00:00Z"));
        assert!(matches!(
            events[2].kind,
            EventKind::Review { ref target, ref state, .. }
                if target.as_deref() == Some("alice") && state.as_deref() == Some("APPROVED")
        ));
        assert_eq!(
            client.transport().last_query(&url("pulls")).unwrap(),
            vec![("state", "all".to_string()), ("per_page", "30".to_string()), ("page", "1".to_string())]
        );
    }

    #[tokio::test]
    async fn issues_emit_comments_and_assignments_only() {
        let config = test_config();
        let transport = ScriptedTransport::default()
            .json(
                &url("issues"),
                json!([
                    {"number": 3, "state": "open", "title": "Bug", "body": "steps", "user": {"login": "alice"}, "created_at": "2025-01-05T00:00:00Z"},
                    {"number": 4, "state": "open", "title": "PR in disguise", "user": {"login": "bob"}, "created_at": "2025-01-06T00:00:00Z", "pull_request": {}},
                    {"number": 5, "state": "closed", "title": "Typo", "user": {"login": "carol"}, "created_at": "2025-01-07T00:00:00Z", "closed_at": "2025-01-08T00:00:00Z"}
                ]),
            )
            .fail(&url("issues/3/comments"))
            .json(
                &url("issues/3/events"),
                json!([
                    {"id": 301, "event": "labeled", "actor": {"login": "alice"}, "created_at": "2025-01-05T01:00:00Z"},
                    {"id": 302, "event": "assigned", "actor": {"login": "alice"}, "assignee": {"login": "dave"}, "created_at": "2025-01-05T02:00:00Z"},
                    {"id": 303, "event": "unassigned", "actor": {"login": "alice"}, "assignee": {"login": "dave"}, "created_at": "2025-01-05T03:00:00Z"}
                ]),
            )
            .json(
                &url("issues/5/comments"),
                json!([{"id": 501, "user": {"login": "erin"}, "body": "fixed", "created_at": "2025-01-07T10:00:00Z"}]),
            )
            .json(&url("issues/5/events"), json!([]));
        let client = GitHubClient::new(transport, &config);

        let events = client.issue_events(&repo(), 50).await.unwrap();

        let ids = events.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["i-3", "ie-302", "i-5", "cmt-501"]);
        assert_eq!(events[0].timestamp.as_deref(), Some("2025-01-05T00:00:00Z"));
        assert_eq!(
            events[1].kind,
            EventKind::Assign {
                target: Some("dave".to_string()),
                issue_id: "ISSUE-3".to_string(),
                body: None,
            }
        );
        assert_eq!(
            events[3].kind,
            EventKind::Comment {
                target: Some("carol".to_string()),
                issue_id: "ISSUE-5".to_string(),
                comment_id: 501,
                body: Some("fixed".to_string()),
            }
        );
        assert!(!client.transport().requested_urls().iter().any(|u| u.contains("issues/4/")));
    }

    #[tokio::test]
    async fn issue_limit_counts_pull_requests_in_the_listing() {
        let config = test_config();
        let transport = ScriptedTransport::default()
            .json(
                &url("issues"),
                json!([
                    {"number": 1, "state": "open", "title": "PR one", "created_at": "2025-01-04T00:00:00Z", "pull_request": {}},
                    {"number": 2, "state": "open", "title": "Bug", "created_at": "2025-01-03T00:00:00Z"},
                    {"number": 3, "state": "open", "title": "PR two", "created_at": "2025-01-02T00:00:00Z", "pull_request": {}},
                    {"number": 4, "state": "open", "title": "Docs", "created_at": "2025-01-01T00:00:00Z"}
                ]),
            )
            .json(&url("issues/2/comments"), json!([]))
            .json(&url("issues/2/events"), json!([]));
        let client = GitHubClient::new(transport, &config);

        let events = client.issue_events(&repo(), 2).await.unwrap();

        let ids = events.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["i-2"]);
        assert_eq!(
            client.transport().last_query(&url("issues")).unwrap(),
            vec![("state", "all".to_string()), ("per_page", "2".to_string()), ("page", "1".to_string())]
        );
        assert!(!client.transport().requested_urls().iter().any(|u| u.contains("issues/4/")));
    }

    #[tokio::test]
    async fn failed_listing_is_returned_as_error() {
        let config = test_config();
        let transport = ScriptedTransport::default().status(&url("commits"), 1, 404, r#"{"message":"Not Found"}"#);
        let client = GitHubClient::new(transport, &config);

        assert!(client.commit_events(&repo(), 5).await.is_err());
    }

    #[tokio::test]
    async fn zero_limit_issues_no_requests() {
        let config = test_config();
        let client = GitHubClient::new(ScriptedTransport::default(), &config);

        assert!(client.commit_events(&repo(), 0).await.unwrap().is_empty());
        assert!(client.pull_request_events(&repo(), 0).await.unwrap().is_empty());
        assert!(client.issue_events(&repo(), 0).await.unwrap().is_empty());
        assert!(client.transport().requested_urls().is_empty());
    }
}

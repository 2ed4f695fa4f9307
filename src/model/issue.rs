use crate::model::timestamp;
use crate::model::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// An issue flattened to the fields the burndown needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "issue_number")]
    pub number: u64,
    #[serde(rename = "issue_state")]
    pub state: String,
    #[serde(deserialize_with = "timestamp::deserialize_lenient")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::deserialize_lenient_option")]
    pub closed_at: Option<DateTime<Utc>>,
    pub creator_login: Option<String>,
    pub milestone_title: Option<String>,
    pub title: String,
}

// Create
impl Issue {
    pub fn from_file(path: &Path) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    fn parse(json_str: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json_str)?)
    }
}

// Dates
impl Issue {
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    pub fn closed_on(&self) -> Option<NaiveDate> {
        self.closed_at.map(|closed_at| closed_at.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exported_issue_file() {
        let issues = Issue::parse(
            r#"[
                {
                    "issue_number": 12,
                    "issue_state": "closed",
                    "created_at": "2025-01-01T10:00:00Z",
                    "closed_at": "2025-01-05T23:59:59Z",
                    "creator_login": "octocat",
                    "milestone_title": null,
                    "title": "Crash on start"
                },
                {
                    "issue_number": 13,
                    "issue_state": "open",
                    "created_at": "2025-01-02T00:00:00Z",
                    "closed_at": null,
                    "creator_login": "hubot",
                    "milestone_title": "v1",
                    "title": "Docs"
                }
            ]"#,
        )
        .unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].created_on(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(issues[0].closed_on(), NaiveDate::from_ymd_opt(2025, 1, 5));
        assert_eq!(issues[1].closed_on(), None);
        assert_eq!(issues[1].milestone_title.as_deref(), Some("v1"));
    }

    #[test]
    fn accepts_loose_dates_in_exported_file() {
        let issues = Issue::parse(
            r#"[
                {"issue_number": 1, "issue_state": "closed", "created_at": "2025-01-01", "closed_at": "2025-01-03 12:00:00", "title": "a"},
                {"issue_number": 2, "issue_state": "open", "created_at": "2025-01-02T08:00:00", "closed_at": "", "title": "b"},
                {"issue_number": 3, "issue_state": "open", "created_at": "2025-01-04T08:00:00.5+0100", "title": "c"}
            ]"#,
        )
        .unwrap();

        let days = issues.iter().map(|issue| issue.created_on().to_string()).collect::<Vec<_>>();
        assert_eq!(days, vec!["2025-01-01", "2025-01-02", "2025-01-04"]);
        assert_eq!(issues[0].closed_on(), NaiveDate::from_ymd_opt(2025, 1, 3));
        assert_eq!(issues[1].closed_on(), None);
        assert_eq!(issues[2].closed_on(), None);
    }

    #[test]
    fn rejects_issue_without_created_at() {
        let result = Issue::parse(r#"[{"issue_number": 1, "issue_state": "open", "title": "x"}]"#);
        assert!(result.is_err());
    }
}

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Query parameters of a paged collection request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    per_page: Option<u8>,
    state_all: bool,
    sort_created_desc: bool,
    since: Option<DateTime<Utc>>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn per_page(mut self, per_page: u8) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn state_all(mut self) -> Self {
        self.state_all = true;
        self
    }

    pub fn sort_created_desc(mut self) -> Self {
        self.sort_created_desc = true;
        self
    }

    pub fn since(mut self, since: Option<DateTime<Utc>>) -> Self {
        self.since = since;
        self
    }

    pub fn to_pairs(&self, page: Option<usize>) -> Vec<(&'static str, String)> {
        let mut pairs = vec![];
        if self.state_all {
            pairs.push(("state", "all".to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        if let Some(page) = page {
            pairs.push(("page", page.to_string()));
        }
        if self.sort_created_desc {
            pairs.push(("sort", "created".to_string()));
            pairs.push(("direction", "desc".to_string()));
        }
        if let Some(since) = self.since {
            pairs.push(("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        pairs
    }
}

/// `now - days`, the lower bound used to restrict a fetch to recent history.
pub fn since_days_ago(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now - Duration::days(days as i64)
}

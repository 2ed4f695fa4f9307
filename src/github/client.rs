use crate::github::api::GitHubIssue;
use crate::github::query::ListQuery;
use crate::github::transport::{RawResponse, Transport};
use crate::model::{Config, Error, ErrorBody, Repository, Result};
use chrono::{DateTime, Utc};
use log::debug;
use serde::de::DeserializeOwned;

pub type PageProgress<'a> = Box<dyn FnMut(usize) + 'a>;

/// Fetcher for the upstream REST API. Every request is awaited before the next one is sent.
pub struct GitHubClient<'a, T: Transport> {
    transport: T,
    config: &'a Config,
}

// New
impl<'a, T: Transport> GitHubClient<'a, T> {
    pub fn new(transport: T, config: &'a Config) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn endpoint(&self, repo: &Repository, path: &str) -> String {
        repo.endpoint(self.config, path)
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

// Single requests
impl<'a, T: Transport> GitHubClient<'a, T> {
    async fn request(&self, url: &str, query: &[(&'static str, String)]) -> Result<RawResponse> {
        let response = self.transport.get(url, query).await?;
        if !response.is_success() {
            return Err(Error::Upstream {
                url: url.to_string(),
                status: response.status,
                body: ErrorBody::parse(&response.body),
            });
        }
        Ok(response)
    }

    /// Fetches one object, e.g. the detail view of a single commit.
    pub async fn fetch_one<I: DeserializeOwned>(&self, url: &str) -> Result<I> {
        let response = self.request(url, &[]).await?;
        decode(url, &response.body)
    }

    /// Fetches only the first page of a collection.
    pub async fn fetch_first_page<I: DeserializeOwned>(&self, url: &str, query: &ListQuery) -> Result<Vec<I>> {
        let response = self.request(url, &query.to_pairs(None)).await?;
        decode(url, &response.body)
    }
}

// Pagination
impl<'a, T: Transport> GitHubClient<'a, T> {
    pub async fn fetch_all<I: DeserializeOwned>(
        &self,
        url: &str,
        query: &ListQuery,
        limit: Option<usize>,
    ) -> Result<Vec<I>> {
        self.fetch_all_filtered(url, query, limit, |_| true, Box::new(|_| {}))
            .await
    }

    /// Walks `page=1,2,..` until a page is empty, the `rel="next"` relation disappears
    /// or `limit` kept items have been collected. Items rejected by `keep` are dropped
    /// per page and do not count toward `limit`.
    pub async fn fetch_all_filtered<'b, I, F>(
        &self,
        url: &str,
        query: &ListQuery,
        limit: Option<usize>,
        keep: F,
        mut cb: PageProgress<'b>,
    ) -> Result<Vec<I>>
    where
        I: DeserializeOwned,
        F: Fn(&I) -> bool,
    {
        let mut page = 1;
        let mut items: Vec<I> = vec![];
        loop {
            cb(page);
            let response = self.request(url, &query.to_pairs(Some(page))).await?;
            let batch: Vec<I> = decode(url, &response.body)?;
            debug!("{} page {} returned {} items", url, page, batch.len());
            if batch.is_empty() {
                break;
            }
            items.extend(batch.into_iter().filter(|item| keep(item)));

            if let Some(limit) = limit {
                if items.len() >= limit {
                    items.truncate(limit);
                    break;
                }
            }
            if !response.has_next_page() {
                break;
            }
            page += 1;
        }
        Ok(items)
    }

    /// All issues of a repository, newest first, without the pull requests the
    /// issues endpoint also lists.
    pub async fn fetch_issues<'b>(
        &self,
        repo: &Repository,
        since: Option<DateTime<Utc>>,
        limit: Option<usize>,
        cb: PageProgress<'b>,
    ) -> Result<Vec<GitHubIssue>> {
        let url = self.endpoint(repo, "issues");
        let query = ListQuery::new()
            .state_all()
            .per_page(self.config.per_page)
            .sort_created_desc()
            .since(since);
        self.fetch_all_filtered(&url, &query, limit, |issue: &GitHubIssue| !issue.is_pull_request(), cb)
            .await
    }
}

fn decode<I: DeserializeOwned>(url: &str, body: &str) -> Result<I> {
    serde_json::from_str(body).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })
}

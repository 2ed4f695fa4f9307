use crate::github::transport::{RawResponse, Transport};
use crate::model::{Config, Error, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

pub fn test_config() -> Config {
    Config::new(Some("test-token".to_string()), "https://api.test", 100).unwrap()
}

enum Reply {
    Respond(RawResponse),
    Fail,
}

/// In-memory transport answering from a script keyed by url and `page` parameter.
/// Requests without a `page` parameter are keyed as page 1; unscripted requests get a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: HashMap<(String, usize), Reply>,
    calls: RefCell<Vec<(String, Vec<(&'static str, String)>)>>,
}

impl ScriptedTransport {
    pub fn page(mut self, url: &str, page: usize, items: Value, next: bool) -> Self {
        let link = next.then(|| format!("<{url}?page={}>; rel=\"next\"", page + 1));
        let response = RawResponse {
            status: 200,
            link,
            body: items.to_string(),
        };
        self.replies.insert((url.to_string(), page), Reply::Respond(response));
        self
    }

    pub fn json(self, url: &str, value: Value) -> Self {
        self.page(url, 1, value, false)
    }

    pub fn status(mut self, url: &str, page: usize, status: u16, body: &str) -> Self {
        let response = RawResponse {
            status,
            link: None,
            body: body.to_string(),
        };
        self.replies.insert((url.to_string(), page), Reply::Respond(response));
        self
    }

    pub fn fail(mut self, url: &str) -> Self {
        self.replies.insert((url.to_string(), 1), Reply::Fail);
        self
    }

    pub fn requested_pages(&self, url: &str) -> Vec<usize> {
        self.calls
            .borrow()
            .iter()
            .filter(|(called, _)| called == url)
            .map(|(_, query)| page_of(query))
            .collect()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn last_query(&self, url: &str) -> Option<Vec<(&'static str, String)>> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find(|(called, _)| called == url)
            .map(|(_, query)| query.clone())
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<RawResponse> {
        self.calls.borrow_mut().push((url.to_string(), query.to_vec()));
        match self.replies.get(&(url.to_string(), page_of(query))) {
            Some(Reply::Respond(response)) => Ok(response.clone()),
            Some(Reply::Fail) => Err(Error::Transport {
                url: url.to_string(),
                message: "connection reset".to_string(),
            }),
            None => Ok(RawResponse {
                status: 404,
                link: None,
                body: r#"{"message":"Not Found"}"#.to_string(),
            }),
        }
    }
}

fn page_of(query: &[(&'static str, String)]) -> usize {
    query
        .iter()
        .find(|(key, _)| *key == "page")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(1)
}

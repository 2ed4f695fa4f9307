use crate::model::{Config, Error, Result};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};

const ACCEPT_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// A response as the fetcher sees it: status, pagination cursor header and raw body.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub link: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn has_next_page(&self) -> bool {
        self.link
            .as_deref()
            .is_some_and(|link| link.contains("rel=\"next\""))
    }
}

pub trait Transport {
    async fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<RawResponse>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

// New
impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(&format!("token {}", config.token))
            .map_err(|_| Error::InvalidToken)?;
        token.set_sensitive(true);
        headers.insert(AUTHORIZATION, token);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_MEDIA_TYPE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| Error::Transport {
                url: config.api_url.clone(),
                message: err.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<RawResponse> {
        debug!("GET {} {:?}", url, query);
        let transport_error = |err: reqwest::Error| Error::Transport {
            url: url.to_string(),
            message: err.to_string(),
        };
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let link = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = response.text().await.map_err(transport_error)?;
        Ok(RawResponse { status, link, body })
    }
}

use crate::model::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const MAX_PER_PAGE: u8 = 100;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings shared by every upstream request, built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub token: String,
    pub api_url: String,
    pub per_page: u8,
    pub user_agent: String,
}

// New
impl Config {
    pub fn new(token: Option<String>, api_url: impl ToString, per_page: u8) -> Result<Self> {
        let token = token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(Error::MissingToken)?;
        Ok(Self {
            token,
            api_url: api_url.to_string().trim_end_matches('/').to_string(),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            user_agent: USER_AGENT.to_string(),
        })
    }
}

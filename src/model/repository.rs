use crate::model::{Config, Error, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

// New
impl Repository {
    pub fn new(owner: impl ToString, name: impl ToString) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }
}

// Endpoints
impl Repository {
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn endpoint(&self, config: &Config, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{}/repos/{}/{}", config.api_url, self.owner, self.name)
        } else {
            format!("{}/repos/{}/{}/{}", config.api_url, self.owner, self.name, path)
        }
    }
}

// Parser
impl FromStr for Repository {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let Some((owner, name)) = value.split_once('/') else {
            return Err(Error::InvalidRepository(value.to_string()));
        };
        let (owner, name) = (owner.trim(), name.trim());
        if owner.is_empty() || name.is_empty() {
            return Err(Error::InvalidRepository(value.to_string()));
        }
        Ok(Self::new(owner, name))
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

pub mod api;
pub mod client;
pub mod query;
pub mod transport;

#[cfg(test)]
pub mod testing;

pub use client::GitHubClient;
pub use query::{since_days_ago, ListQuery};
pub use transport::{HttpTransport, Transport};

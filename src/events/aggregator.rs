use crate::events::normalizer::EventNormalizer;
use crate::github::{GitHubClient, Transport};
use crate::model::{parse_timestamp, Event, Repository, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::{error, info};
use std::cmp::Reverse;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum EventSource {
    Commits,
    PullRequests,
    Issues,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventSource::Commits => "commits",
            EventSource::PullRequests => "pull requests",
            EventSource::Issues => "issues",
        };
        write!(f, "{}", name)
    }
}

/// Per-source caps on the number of parent items listed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventLimits {
    pub commits: usize,
    pub pull_requests: usize,
    pub issues: usize,
}

impl Default for EventLimits {
    fn default() -> Self {
        Self {
            commits: 30,
            pull_requests: 30,
            issues: 50,
        }
    }
}

/// Events gathered from every source of one run, kept in source insertion order until sorted.
#[derive(Debug, Clone, Default)]
pub struct EventAggregation {
    pub streams: IndexMap<EventSource, Vec<Event>>,
    pub failed_sources: Vec<EventSource>,
}

impl EventAggregation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: EventSource, events: Result<Vec<Event>>) {
        match events {
            Ok(events) => {
                self.streams.insert(source, events);
            }
            Err(err) => {
                error!("Error fetching {}: {}", source, err);
                self.failed_sources.push(source);
            }
        }
    }

    pub fn all_failed(&self) -> bool {
        self.streams.is_empty() && !self.failed_sources.is_empty()
    }
}

pub trait Aggregator {
    /// Concatenates every stream and orders the result most recent first.
    fn aggregate(&self) -> Vec<Event>;
}

impl Aggregator for EventAggregation {
    fn aggregate(&self) -> Vec<Event> {
        let mut events = self
            .streams
            .values()
            .flat_map(|events| events.iter().cloned())
            .collect::<Vec<_>>();
        sort_most_recent_first(&mut events);
        events
    }
}

/// Runs the commit, pull request and issue procedures one after another.
/// A failing source is logged and recorded; the others still contribute.
pub async fn collect_events<T: Transport>(
    client: &GitHubClient<'_, T>,
    repo: &Repository,
    limits: &EventLimits,
) -> EventAggregation {
    let mut aggregation = EventAggregation::new();
    aggregation.insert(
        EventSource::Commits,
        client.commit_events(repo, limits.commits).await,
    );
    aggregation.insert(
        EventSource::PullRequests,
        client.pull_request_events(repo, limits.pull_requests).await,
    );
    aggregation.insert(
        EventSource::Issues,
        client.issue_events(repo, limits.issues).await,
    );
    aggregation
}

/// Stable sort; events with equal keys keep their insertion order.
pub fn sort_most_recent_first(events: &mut [Event]) {
    events.sort_by_key(|event| Reverse(sort_key(event)));
}

/// First parseable of `timestamp`, `created_at`, `submitted_at`; epoch zero otherwise.
pub fn sort_key(event: &Event) -> DateTime<Utc> {
    [&event.timestamp, &event.created_at, &event.submitted_at]
        .into_iter()
        .flatten()
        .filter(|value| !value.is_empty())
        .find_map(|value| parse_timestamp(value))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Event count per kind, in order of first appearance.
pub fn summarize(events: &[Event]) -> IndexMap<&'static str, usize> {
    let mut counts = IndexMap::new();
    for event in events {
        *counts.entry(event.kind.name()).or_insert(0) += 1;
    }
    counts
}

pub fn log_summary(repo: &Repository, events: &[Event]) {
    let counts = summarize(events)
        .iter()
        .map(|(kind, count)| format!("{kind}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    info!("Aggregated {} events from {} ({})", events.len(), repo, counts);
}

pub mod aggregator;
pub mod normalizer;

pub use aggregator::{collect_events, log_summary, Aggregator, EventLimits};

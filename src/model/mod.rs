pub mod config;
mod event;
mod issue;
mod repository;
mod result;
mod snapshot;
mod timestamp;

pub use config::Config;
pub use event::{Event, EventKind};
pub use issue::Issue;
pub use repository::Repository;
pub use result::{Error, ErrorBody, Result};
pub use snapshot::Snapshot;
pub use timestamp::parse_timestamp;

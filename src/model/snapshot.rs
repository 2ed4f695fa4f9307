use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outstanding work as of one calendar date. `remaining` may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub ds: NaiveDate,
    pub remaining: i64,
}

impl Snapshot {
    pub fn new(ds: NaiveDate, remaining: i64) -> Self {
        Self { ds, remaining }
    }

    /// `{ ds: 'YYYY-MM-DD', remaining: N }`, the literal form used by generated modules.
    pub fn to_literal(&self) -> String {
        format!("{{ ds: '{}', remaining: {} }}", self.ds.format("%Y-%m-%d"), self.remaining)
    }
}

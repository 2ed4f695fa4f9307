use crate::model::Result;
use crate::utils::write_atomic;
use log::info;
use serde::Serialize;
use std::path::Path;

/// Writes `records` as a pretty-printed JSON array.
pub fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json = serde_json::to_vec_pretty(records)?;
    write_atomic(path, &json)?;
    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

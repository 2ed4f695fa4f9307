use crate::model::{Error, Result, Snapshot};
use crate::utils::write_atomic;
use itertools::Itertools;
use log::info;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

const DATA_BLOCK: &str = r"(?s)(const\s+data\s*=\s*\[)(.*?)(\];)";

/// Replaces the body of every `const data = [...];` block with the snapshot literals.
/// Returns the rewritten text and the number of blocks replaced.
pub fn replace_data_blocks(content: &str, snapshots: &[Snapshot]) -> Result<(String, usize)> {
    let pattern = Regex::new(DATA_BLOCK).map_err(|err| Error::Render(err.to_string()))?;
    let count = pattern.find_iter(content).count();
    let lines = snapshots
        .iter()
        .map(|snapshot| format!("  {},", snapshot.to_literal()))
        .join("\n");
    let replaced = pattern.replace_all(content, |caps: &Captures| {
        format!("{}\n{}\n{}", &caps[1], lines, &caps[3])
    });
    Ok((replaced.into_owned(), count))
}

/// Rewrites the data blocks of a presentation file in place. A file without any block is an error.
pub fn update_stories(path: &Path, snapshots: &[Snapshot]) -> Result<usize> {
    let content = fs::read_to_string(path)?;
    let (updated, count) = replace_data_blocks(&content, snapshots)?;
    if count == 0 {
        return Err(Error::MarkerNotFound(path.to_path_buf()));
    }
    write_atomic(path, updated.as_bytes())?;
    info!("{} updated, replaced {} data block(s)", path.display(), count);
    Ok(count)
}

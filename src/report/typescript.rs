use crate::model::{Result, Snapshot};
use crate::utils::write_atomic;
use chrono::{Local, NaiveDateTime};
use log::info;
use std::path::Path;

pub fn render_module(snapshots: &[Snapshot], generated_at: NaiveDateTime) -> String {
    let mut module = format!("// Generated at {}\n", generated_at.format("%Y-%m-%d %H:%M:%S"));
    module.push_str("export const burndownData = [\n");
    for snapshot in snapshots {
        module.push_str(&format!("  {},\n", snapshot.to_literal()));
    }
    module.push_str("];\n");
    module
}

pub fn write_module(path: &Path, snapshots: &[Snapshot]) -> Result<()> {
    let module = render_module(snapshots, Local::now().naive_local());
    write_atomic(path, module.as_bytes())?;
    info!("Burndown data saved to {}", path.display());
    Ok(())
}

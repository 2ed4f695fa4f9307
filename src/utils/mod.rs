mod atomic_write;
mod multi_progress;
mod progress_style;

pub use atomic_write::write_atomic;
pub use multi_progress::{MultiProgressNew, StageFinish};
pub use progress_style::ProgressStyleTemplate;

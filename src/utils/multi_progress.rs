use crate::utils::ProgressStyleTemplate;
use indicatif::{MultiProgress, ProgressBar};
use std::time::Duration;

pub trait MultiProgressNew {
    /// Adds a ticking spinner labelled with `prefix`, one per pipeline stage.
    fn add_stage(&self, prefix: &str, message: impl Into<String>) -> ProgressBar;
}

impl MultiProgressNew for MultiProgress {
    fn add_stage(&self, prefix: &str, message: impl Into<String>) -> ProgressBar {
        let pb = self.add(ProgressBar::new_spinner());
        pb.set_style(ProgressStyleTemplate::stage());
        pb.set_prefix(prefix.to_string());
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

pub trait StageFinish {
    fn finish_ok(&self, message: impl Into<String>);
    fn finish_failed(&self, message: impl Into<String>);
}

impl StageFinish for ProgressBar {
    fn finish_ok(&self, message: impl Into<String>) {
        self.set_style(ProgressStyleTemplate::done());
        self.finish_with_message(format!("✅ {}", message.into()));
    }

    fn finish_failed(&self, message: impl Into<String>) {
        self.set_style(ProgressStyleTemplate::done());
        self.abandon_with_message(format!("❌ {}", message.into()));
    }
}

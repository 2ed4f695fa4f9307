use indicatif::ProgressStyle;

const STAGE_TEMPLATE: &str = "{spinner} {prefix:12.bold} {wide_msg}";
const DONE_TEMPLATE: &str = "  {prefix:12.bold} {wide_msg} ({elapsed})";

pub struct ProgressStyleTemplate;

impl ProgressStyleTemplate {
    pub fn stage() -> ProgressStyle {
        ProgressStyle::with_template(STAGE_TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn done() -> ProgressStyle {
        ProgressStyle::with_template(DONE_TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

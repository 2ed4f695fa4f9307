pub mod json;
pub mod markdown;
pub mod stories;
pub mod typescript;

pub use json::write_json;
pub use markdown::MarkdownReport;
pub use stories::update_stories;
pub use typescript::write_module;

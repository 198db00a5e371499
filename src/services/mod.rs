pub mod answer_extractor;
pub mod content_builder;

pub use answer_extractor::AnswerExtractor;
pub use content_builder::{rebuild_content, PageContext};

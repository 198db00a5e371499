pub mod document;
pub mod source;

pub use document::Document;
pub use source::DocumentSource;

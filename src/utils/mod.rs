pub mod logging;
pub mod text;

pub use text::{make_zhihu_link, parse_vote_count, question_token};

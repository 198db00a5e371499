pub mod answer;
pub mod question;
pub mod user;

pub use answer::Answer;
pub use question::Question;
pub use user::{Author, User};

pub mod zhihu_client;

pub use zhihu_client::ZhihuClient;

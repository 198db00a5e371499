mod app;

use anyhow::Result;
use app::App;
use zhihu_answers::utils::logging;
use zhihu_answers::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置：ZHIHU_CONFIG 指定 TOML 文件时以文件为准，否则读取环境变量
    let mut config = match std::env::var("ZHIHU_CONFIG") {
        Ok(path) => Config::from_toml_file(&path)?,
        Err(_) => Config::from_env(),
    };

    // 命令行参数：<问题链接> [回答数量]
    let mut args = std::env::args().skip(1);
    if let Some(url) = args.next() {
        config.question_url = url;
    }
    if let Some(top_n) = args.next().and_then(|v| v.parse().ok()) {
        config.top_n = top_n;
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}

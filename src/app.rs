use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use zhihu_answers::utils::logging::{log_startup, print_final_stats, truncate_text};
use zhihu_answers::{Answer, AnswerPager, Config, DocumentSource, Question, ZhihuClient};

/// 应用主结构
pub struct App {
    config: Config,
    client: Arc<dyn DocumentSource>,
}

/// 输出到文件的抓取报告
#[derive(Debug, Serialize)]
struct Report<'a> {
    link: &'a str,
    title: &'a str,
    detail: &'a str,
    answers_num: u32,
    followers_num: u32,
    visit_times: u32,
    topics: &'a [String],
    fetched_at: String,
    failed_pages: Vec<usize>,
    answers: &'a [Answer],
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        if config.question_url.is_empty() {
            bail!("未指定问题链接，请通过命令行参数或 ZHIHU_QUESTION_URL 提供");
        }

        log_startup(
            &config.question_url,
            config.top_n,
            config.max_concurrent_pages,
        );

        let client = ZhihuClient::new(&config).context("创建知乎客户端失败")?;

        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let question = Question::new(
            self.config.question_url.clone(),
            None,
            self.client.clone(),
        )?
        .with_settings(self.config.fetch_settings());

        info!("\n🔍 正在获取问题页面...");
        let title = question.title().await.context("获取问题页面失败")?;
        info!("✓ {}", question);

        let detail = question.detail().await?;
        let answers_num = question.answers_num().await?;
        let followers_num = question.followers_num().await?;
        let visit_times = question.visit_times().await?;
        let topics = question.topics().await?;

        info!("📄 描述: {}", truncate_text(detail, 80));
        info!(
            "📊 回答 {} | 关注 {} | 浏览 {}",
            answers_num, followers_num, visit_times
        );
        info!("🏷️ 话题: {}", topics.join(", "));

        let pager = AnswerPager::new(self.config.fetch_settings());
        let result = pager
            .top_x_with_report(&question, self.config.top_n)
            .await?;

        if !result.failures.is_empty() {
            warn!(
                "⚠️ 有 {} 页回答加载失败，结果不完整",
                result.failures.len()
            );
        }

        for (i, answer) in result.answers.iter().take(5).enumerate() {
            info!("  {}. {} {}", i + 1, answer.author(), answer);
        }

        let report = Report {
            link: question.link(),
            title,
            detail,
            answers_num,
            followers_num,
            visit_times,
            topics,
            fetched_at: chrono::Local::now().to_rfc3339(),
            failed_pages: result.failures.iter().map(|f| f.page).collect(),
            answers: &result.answers,
        };
        let json = serde_json::to_string_pretty(&report)?;
        tokio::fs::write(&self.config.output_file, json)
            .await
            .with_context(|| format!("写入结果文件失败: {}", self.config.output_file))?;

        print_final_stats(
            result.answers.len(),
            self.config.top_n,
            answers_num,
            &self.config.output_file,
        );

        Ok(())
    }
}

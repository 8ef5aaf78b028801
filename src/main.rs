use anyhow::{anyhow, Context};
use application::consumer::run_consumer;
use application::report::ReportService;
use infra::{AppConfig, FileReportOutputs, JsonLinesQueue, SqliteSalesSource, SummaryRepositoryImpl};
use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

fn init_logging(log_file: &str) -> anyhow::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {m}{n}",
        )))
        .build(log_file)?;

    // 同时输出到控制台和文件
    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .appender(Appender::builder().build("stdout", Box::new(ConsoleAppender::builder().build())))
        .build(
            Root::builder()
                .appender("file")
                .appender("stdout")
                .build(log_level.parse().unwrap_or(log::LevelFilter::Info)),
        )?;

    log4rs::init_config(config)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::load().map_err(|e| anyhow!("failed to load config: {}", e))?;
    init_logging(&cfg.log_file)?;

    cfg.output
        .ensure_dirs()
        .with_context(|| format!("failed to create {}", cfg.output.root().display()))?;
    let summary = SummaryRepositoryImpl::connect(&cfg.summary_database_url).await?;

    let service = ReportService::new(
        SqliteSalesSource::new(cfg.genre.clone()),
        FileReportOutputs::new(cfg.output.clone()),
        summary,
    );

    // 请求从标准输入逐行读取，EOF 时退出；统计由 run_consumer 记录
    let mut queue = JsonLinesQueue::stdin();
    run_consumer(&mut queue, &service).await?;
    Ok(())
}

use anyhow::{Context, Result};
use clap::{Arg, Command};
use redditminer::{app::Application, common::init_logging, shutdown::ShutdownSignal};
use redditminer_core::config::{AppConfig, LogFormat};
use redditminer_infrastructure::init_metrics;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let matches = Command::new("redditminer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Subreddit 定时监控与统计采集服务")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径，未指定时按默认路径查找"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别，覆盖配置文件")
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式，覆盖配置文件")
                .value_parser(["json", "pretty"]),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config");

    // 加载配置
    let config = AppConfig::load(config_path.map(String::as_str))
        .with_context(|| match config_path {
            Some(path) => format!("加载配置文件失败: {path}"),
            None => "加载配置失败".to_string(),
        })?;

    let log_level = matches
        .get_one::<String>("log-level")
        .cloned()
        .unwrap_or_else(|| config.observability.log_level.clone());
    let log_format = match matches.get_one::<String>("log-format") {
        Some(format) => format.parse::<LogFormat>()?,
        None => config.observability.log_format,
    };

    // 初始化日志系统
    init_logging(&log_level, log_format)?;

    info!("启动 redditminer");
    if let Some(path) = config_path {
        info!("配置文件: {path}");
    }
    info!(
        interval_seconds = config.scheduler.tick_interval_seconds,
        granularity = %config.scheduler.granularity,
        max_in_flight = ?config.scheduler.max_in_flight,
        "调度配置"
    );

    init_metrics(&config.observability)?;

    // 在任何组件启动前注册信号
    let shutdown = ShutdownSignal::register().context("注册终止信号处理器失败")?;

    let app = Application::new(&config).await?;
    let report = app.run(shutdown).await?;

    if report.drained {
        info!("redditminer 已优雅退出");
    } else {
        warn!(
            in_flight = report.in_flight_remaining,
            "redditminer 退出时仍有未完成的采集"
        );
    }
    Ok(())
}

//! CryptBench - 加解密 worker 调度与对比服务
//!
//! - Domain: engine/, job/ (引擎选择、任务、结果)
//! - Application: commands, ports, settings
//! - Infrastructure: http, worker, adapters

use std::sync::Arc;

use cryptbench::application::DispatchSettings;
use cryptbench::config::{load_config, print_config, LogConfig};
use cryptbench::infrastructure::http::{AppState, HttpServer, ServerConfig};
use cryptbench::infrastructure::{BoundedTaskScheduler, FileJobStorage, ProcessWorkerInvoker};

fn init_tracing(log: &LogConfig) {
    let log_filter = format!(
        "{},cryptbench={},tower_http=debug",
        log.level, log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("CryptBench v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    let cwd = std::env::current_dir()?;
    let binaries = config.engines.binaries(&cwd);

    let missing = binaries.missing(cryptbench::domain::engine::EngineId::ALL);
    if !missing.is_empty() {
        // 不阻止启动，请求时会返回配置错误
        tracing::warn!(
            install_dir = %binaries.install_dir.display(),
            missing = ?missing,
            "Some worker executables are missing"
        );
    }

    // 存储目录
    let storage = Arc::new(
        FileJobStorage::new(
            &config.storage.upload_dir,
            &config.storage.output_dir,
            &config.storage.results_dir,
        )
        .await?,
    );

    // worker 进程在安装目录下运行
    let invoker = Arc::new(ProcessWorkerInvoker::new(
        &binaries.install_dir,
        config.scheduler.task_timeout(),
    ));
    let scheduler = Arc::new(BoundedTaskScheduler::new(invoker));

    let detected_cpus = num_cpus::get() as u32;
    tracing::info!(detected_cpus, "Detected host CPUs");

    let settings = Arc::new(DispatchSettings {
        binaries,
        max_parallel: config.scheduler.max_parallel,
        public_base_url: config.server.public_base_url(),
        detected_cpus,
    });

    let state = AppState::new(
        settings,
        storage,
        scheduler,
        config.server.max_upload_bytes,
    );

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

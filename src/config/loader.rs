//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "CRYPTBENCH";

/// 加载应用配置
///
/// # 环境变量示例
/// - `CRYPTBENCH_SERVER__PORT=8080`
/// - `CRYPTBENCH_ENGINES__INSTALL_DIR=/opt/cryptbench/bin`
/// - `CRYPTBENCH_SCHEDULER__MAX_PARALLEL=8`
/// - `CRYPTBENCH_SCHEDULER__TASK_TIMEOUT_SECS=0`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 其余字段的默认值由 serde default 提供
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("scheduler.max_parallel", 4)?
        .set_default("scheduler.task_timeout_secs", 600)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 层级分隔符: __ (双下划线)，变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.server.max_upload_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "Upload size limit cannot be 0".to_string(),
        ));
    }

    if config.scheduler.max_parallel == 0 {
        return Err(ConfigError::ValidationError(
            "Scheduler max_parallel cannot be 0".to_string(),
        ));
    }

    let engines = &config.engines;
    for (key, value) in [
        ("serial_bin", &engines.serial_bin),
        ("openmp_bin", &engines.openmp_bin),
        ("mpi_bin", &engines.mpi_bin),
        ("launcher", &engines.launcher),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "Engine {} cannot be empty",
                key
            )));
        }
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("Max Upload: {} bytes", config.server.max_upload_bytes);
    tracing::info!("Install Directory: {:?}", config.engines.install_dir);
    tracing::info!(
        "Workers: serial={}, openmp={}, mpi={} (launcher={})",
        config.engines.serial_bin,
        config.engines.openmp_bin,
        config.engines.mpi_bin,
        config.engines.launcher
    );
    tracing::info!("Upload Directory: {:?}", config.storage.upload_dir);
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Results Directory: {:?}", config.storage.results_dir);
    tracing::info!("Max Parallel Tasks: {}", config.scheduler.max_parallel);
    match config.scheduler.task_timeout() {
        Some(timeout) => tracing::info!("Task Timeout: {}s", timeout.as_secs()),
        None => tracing::info!("Task Timeout: disabled"),
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_passes_for_default_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_parallelism() {
        let mut config = AppConfig::default();
        config.scheduler.max_parallel = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_binary() {
        let mut config = AppConfig::default();
        config.engines.openmp_bin = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("openmp_bin"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 6000
base_url = "http://bench.local"

[engines]
install_dir = "/opt/cryptbench"
mpi_bin = "encrypt_mpi_v2"

[scheduler]
max_parallel = 2
task_timeout_secs = 0
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.server.public_base_url(), "http://bench.local");
        assert_eq!(config.engines.mpi_bin, "encrypt_mpi_v2");
        assert_eq!(config.engines.serial_bin, "encrypt_serial");
        assert_eq!(config.scheduler.max_parallel, 2);
        assert_eq!(config.scheduler.task_timeout(), None);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.toml");
        std::fs::write(&path, "[scheduler]\nmax_parallel = 0\n").unwrap();

        let err = load_config_from_path(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}

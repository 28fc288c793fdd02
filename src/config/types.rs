//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::job::EngineBinaries;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// worker 可执行文件配置
    #[serde(default)]
    pub engines: EnginesConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 调度配置
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 下载链接使用的公开 Base URL
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,

    /// 单个请求的上传大小上限（字节）
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    300 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// worker 可执行文件配置
#[derive(Debug, Clone, Deserialize)]
pub struct EnginesConfig {
    /// 安装目录，也是 worker 的工作目录
    #[serde(default = "default_install_dir")]
    pub install_dir: PathBuf,

    #[serde(default = "default_serial_bin")]
    pub serial_bin: String,

    #[serde(default = "default_openmp_bin")]
    pub openmp_bin: String,

    #[serde(default = "default_mpi_bin")]
    pub mpi_bin: String,

    /// 分布式引擎的进程启动器，按 PATH 查找
    #[serde(default = "default_launcher")]
    pub launcher: String,
}

fn default_install_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_serial_bin() -> String {
    "encrypt_serial".to_string()
}

fn default_openmp_bin() -> String {
    "encrypt_openmp".to_string()
}

fn default_mpi_bin() -> String {
    "encrypt_mpi".to_string()
}

fn default_launcher() -> String {
    "mpiexec".to_string()
}

impl Default for EnginesConfig {
    fn default() -> Self {
        Self {
            install_dir: default_install_dir(),
            serial_bin: default_serial_bin(),
            openmp_bin: default_openmp_bin(),
            mpi_bin: default_mpi_bin(),
            launcher: default_launcher(),
        }
    }
}

impl EnginesConfig {
    /// 解析 worker 路径，相对路径基于安装目录
    ///
    /// `base` 用于把相对的安装目录转换为绝对路径
    pub fn binaries(&self, base: &Path) -> EngineBinaries {
        let install_dir = if self.install_dir.is_absolute() {
            self.install_dir.clone()
        } else {
            base.join(&self.install_dir)
        };
        let resolve = |bin: &str| {
            let path = Path::new(bin);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                install_dir.join(path)
            }
        };

        EngineBinaries {
            serial: resolve(&self.serial_bin),
            shared_memory: resolve(&self.openmp_bin),
            distributed_memory: resolve(&self.mpi_bin),
            launcher: self.launcher.clone(),
            install_dir,
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 上传文件目录
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// worker 输出目录（下载来源）
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 任务日志目录
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("data/uploads")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/outputs")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("data/results")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            output_dir: default_output_dir(),
            results_dir: default_results_dir(),
        }
    }
}

/// 调度配置
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// 同时运行的 worker 进程数
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// 单个任务超时（秒），0 表示不限制
    #[serde(default = "default_task_timeout")]
    pub task_timeout_secs: u64,
}

fn default_max_parallel() -> usize {
    crate::application::DEFAULT_MAX_PARALLEL
}

fn default_task_timeout() -> u64 {
    600
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_parallel: default_max_parallel(),
            task_timeout_secs: default_task_timeout(),
        }
    }
}

impl SchedulerConfig {
    pub fn task_timeout(&self) -> Option<Duration> {
        (self.task_timeout_secs > 0).then(|| Duration::from_secs(self.task_timeout_secs))
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.max_upload_bytes, 300 * 1024 * 1024);
        assert_eq!(config.engines.launcher, "mpiexec");
        assert_eq!(config.scheduler.max_parallel, 4);
        assert_eq!(config.storage.output_dir, PathBuf::from("data/outputs"));
    }

    #[test]
    fn test_public_base_url() {
        let mut config = ServerConfig::default();
        assert_eq!(config.public_base_url(), "http://localhost:5000");

        config.base_url = Some("https://bench.example.com".to_string());
        assert_eq!(config.public_base_url(), "https://bench.example.com");
    }

    #[test]
    fn test_binaries_resolve_against_install_dir() {
        let engines = EnginesConfig {
            install_dir: PathBuf::from("bin"),
            mpi_bin: "/opt/mpi/encrypt_mpi".to_string(),
            ..EnginesConfig::default()
        };

        let binaries = engines.binaries(Path::new("/srv/app"));
        assert_eq!(binaries.install_dir, PathBuf::from("/srv/app/bin"));
        assert_eq!(
            binaries.serial,
            PathBuf::from("/srv/app/bin/encrypt_serial")
        );
        assert_eq!(
            binaries.distributed_memory,
            PathBuf::from("/opt/mpi/encrypt_mpi")
        );
    }

    #[test]
    fn test_task_timeout_zero_disables() {
        let mut scheduler = SchedulerConfig::default();
        assert_eq!(scheduler.task_timeout(), Some(Duration::from_secs(600)));

        scheduler.task_timeout_secs = 0;
        assert_eq!(scheduler.task_timeout(), None);
    }
}

//! Dispatch Settings - 启动时解析一次的进程级配置
//!
//! 由 main 从 AppConfig 构造，之后只读共享给各 Handler

use crate::domain::job::{EngineBinaries, Parallelism};

/// 编排器共享的只读配置
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub binaries: EngineBinaries,
    /// 调度并发宽度
    pub max_parallel: usize,
    /// 对外下载链接前缀
    pub public_base_url: String,
    /// 探测到的逻辑 CPU 数
    pub detected_cpus: u32,
}

impl DispatchSettings {
    /// 输出产物的下载链接
    pub fn download_url(&self, output_name: &str) -> String {
        format!(
            "{}/api/download/{}",
            self.public_base_url.trim_end_matches('/'),
            output_name
        )
    }

    /// 解析线程/进程数：未设置或为 0 时使用 CPU 数
    ///
    /// 发生自动调整时返回一条面向用户的日志
    pub fn resolve_parallelism(
        &self,
        threads: Option<u32>,
        procs: Option<u32>,
    ) -> (Parallelism, Option<String>) {
        let detected = self.detected_cpus.max(1);
        let resolve = |value: Option<u32>| match value {
            Some(v) if v > 0 => (v, false),
            _ => (detected, true),
        };

        let (threads, threads_adjusted) = resolve(threads);
        let (procs, procs_adjusted) = resolve(procs);

        let note = (threads_adjusted || procs_adjusted).then(|| {
            format!(
                "Auto-Configuration Applied: Adjusted to Threads={}, Procs={} (Host CPUs={})",
                threads, procs, detected
            )
        });

        (Parallelism { threads, procs }, note)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::settings;
    use std::path::PathBuf;

    #[test]
    fn test_resolve_parallelism_explicit() {
        let settings = settings(PathBuf::from("."));
        let (p, note) = settings.resolve_parallelism(Some(2), Some(3));
        assert_eq!(p.threads, 2);
        assert_eq!(p.procs, 3);
        assert!(note.is_none());
    }

    #[test]
    fn test_resolve_parallelism_auto() {
        let settings = settings(PathBuf::from("."));
        let (p, note) = settings.resolve_parallelism(None, Some(0));
        assert_eq!(p.threads, 8);
        assert_eq!(p.procs, 8);
        assert_eq!(
            note.as_deref(),
            Some("Auto-Configuration Applied: Adjusted to Threads=8, Procs=8 (Host CPUs=8)")
        );
    }

    #[test]
    fn test_download_url() {
        let mut settings = settings(PathBuf::from("."));
        settings.public_base_url = "http://example.com/".to_string();
        assert_eq!(
            settings.download_url("a_b.enc"),
            "http://example.com/api/download/a_b.enc"
        );
    }
}

//! Application State
//!
//! 包含所有 Command Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    BenchmarkHandler, DispatchSettings, JobStoragePort, RunJobHandler, TaskSchedulerPort,
};

/// 应用状态
///
/// 配置在启动时解析一次，之后只读
pub struct AppState {
    // ========== Ports ==========
    pub storage: Arc<dyn JobStoragePort>,
    pub scheduler: Arc<dyn TaskSchedulerPort>,
    pub settings: Arc<DispatchSettings>,

    /// 上传大小上限（字节）
    pub max_upload_bytes: usize,

    // ========== Command Handlers ==========
    pub run_job_handler: RunJobHandler,
    pub benchmark_handler: BenchmarkHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        settings: Arc<DispatchSettings>,
        storage: Arc<dyn JobStoragePort>,
        scheduler: Arc<dyn TaskSchedulerPort>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            storage: storage.clone(),
            scheduler: scheduler.clone(),
            settings: settings.clone(),
            max_upload_bytes,

            run_job_handler: RunJobHandler::new(
                settings.clone(),
                storage.clone(),
                scheduler.clone(),
            ),
            benchmark_handler: BenchmarkHandler::new(settings, storage, scheduler),
        }
    }
}

//! File Storage - 文件系统作业存储实现
//!
//! 实现 JobStoragePort trait

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::application::ports::{JobStoragePort, StorageError};

/// 文件系统作业存储
///
/// 三个目录分别存放上传文件、worker 输出与任务日志，
/// 多个请求并发共享，文件名由调用方保证唯一
pub struct FileJobStorage {
    upload_dir: PathBuf,
    output_dir: PathBuf,
    results_dir: PathBuf,
}

impl FileJobStorage {
    /// 创建新的文件存储，确保目录存在
    pub async fn new(
        upload_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        results_dir: impl AsRef<Path>,
    ) -> Result<Self, StorageError> {
        let storage = Self {
            upload_dir: absolute(upload_dir.as_ref())?,
            output_dir: absolute(output_dir.as_ref())?,
            results_dir: absolute(results_dir.as_ref())?,
        };

        for dir in [&storage.upload_dir, &storage.output_dir, &storage.results_dir] {
            fs::create_dir_all(dir).await?;
        }

        Ok(storage)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }
}

/// worker 的工作目录是安装目录，传给它的路径必须是绝对路径
fn absolute(path: &Path) -> Result<PathBuf, StorageError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// 只接受单个普通文件名
fn plain_name(name: &str) -> Result<&str, StorageError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(StorageError::InvalidName(name.to_string())),
    }
}

#[async_trait]
impl JobStoragePort for FileJobStorage {
    async fn save_upload(&self, stored_name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.upload_dir.join(plain_name(stored_name)?);
        fs::write(&path, data).await?;

        tracing::debug!(path = %path.display(), size = data.len(), "Saved upload");
        Ok(path)
    }

    fn output_path(&self, output_name: &str) -> PathBuf {
        self.output_dir.join(output_name)
    }

    async fn save_task_log(&self, task_id: &str, output: &str) -> Result<PathBuf, StorageError> {
        let path = self
            .results_dir
            .join(format!("{}.log", plain_name(task_id)?));
        fs::write(&path, output).await?;

        tracing::debug!(path = %path.display(), "Saved task log");
        Ok(path)
    }

    async fn resolve_output(&self, output_name: &str) -> Result<PathBuf, StorageError> {
        let path = self.output_dir.join(plain_name(output_name)?);

        match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(path),
            _ => Err(StorageError::FileNotFound(output_name.to_string())),
        }
    }
}

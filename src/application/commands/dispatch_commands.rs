//! Dispatch Commands - 作业与 Benchmark 命令

use bytes::Bytes;

use crate::domain::engine::{CipherMode, EngineChoice};

/// 上传的单个文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// 客户端提供的原始文件名
    pub filename: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// 批量处理命令：每个文件一个任务
#[derive(Debug, Clone)]
pub struct RunJob {
    pub files: Vec<UploadedFile>,
    pub mode: CipherMode,
    pub engine: EngineChoice,
    pub key: String,
    pub chunk: u64,
    /// None 或 0 表示使用探测到的 CPU 数
    pub threads: Option<u32>,
    /// None 或 0 表示使用探测到的 CPU 数
    pub procs: Option<u32>,
}

/// Benchmark 命令：一个文件跑全部四种引擎配置
#[derive(Debug, Clone)]
pub struct RunBenchmark {
    pub file: UploadedFile,
    pub mode: CipherMode,
    pub key: String,
    pub chunk: u64,
    pub threads: Option<u32>,
    pub procs: Option<u32>,
}

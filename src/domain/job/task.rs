//! Job Context - Task 与命令行构造

use std::path::{Path, PathBuf};

use crate::domain::engine::{CipherMode, EngineId};

/// 各引擎 worker 可执行文件位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineBinaries {
    /// worker 运行时的工作目录（共享库与 worker 同目录）
    pub install_dir: PathBuf,
    pub serial: PathBuf,
    pub shared_memory: PathBuf,
    pub distributed_memory: PathBuf,
    /// 分布式进程启动器（mpiexec）
    pub launcher: String,
}

impl EngineBinaries {
    pub fn path_for(&self, engine: EngineId) -> &Path {
        match engine {
            EngineId::Serial => &self.serial,
            EngineId::SharedMemory => &self.shared_memory,
            EngineId::DistributedMemory => &self.distributed_memory,
        }
    }

    /// 返回缺失的 worker 文件名
    pub fn missing(&self, engines: impl IntoIterator<Item = EngineId>) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for engine in engines {
            let path = self.path_for(engine);
            if !path.is_file() {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                if !missing.contains(&name) {
                    missing.push(name);
                }
            }
        }
        missing
    }
}

/// 所有引擎共用的 worker 参数
#[derive(Debug, Clone)]
pub struct WorkerArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub mode: CipherMode,
    pub key: String,
    pub chunk: u64,
}

impl WorkerArgs {
    fn push_common(&self, cmd: &mut Vec<String>) {
        cmd.extend([
            "--in".to_string(),
            self.input.display().to_string(),
            "--out".to_string(),
            self.output.display().to_string(),
            "--mode".to_string(),
            self.mode.to_string(),
            "--key".to_string(),
            self.key.clone(),
            "--chunk".to_string(),
            self.chunk.to_string(),
        ]);
    }
}

/// 并行度参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parallelism {
    pub threads: u32,
    pub procs: u32,
}

/// 构造命令行
///
/// - serial: `<serial> --in --out --mode --key --chunk`
/// - openmp: 追加 `--threads`
/// - mpi: `<launcher> -n <procs> <mpi> ...`，`threads` 为 Some 时为混合模式
pub fn build_command(
    binaries: &EngineBinaries,
    engine: EngineId,
    args: &WorkerArgs,
    procs: u32,
    threads: Option<u32>,
) -> Vec<String> {
    let mut cmd = Vec::with_capacity(16);

    if engine == EngineId::DistributedMemory {
        cmd.push(binaries.launcher.clone());
        cmd.push("-n".to_string());
        cmd.push(procs.to_string());
    }
    cmd.push(binaries.path_for(engine).display().to_string());
    args.push_common(&mut cmd);

    if engine != EngineId::Serial {
        if let Some(threads) = threads {
            cmd.push("--threads".to_string());
            cmd.push(threads.to_string());
        }
    }

    cmd
}

/// 一个待执行单元：一个文件经过一个引擎
///
/// 由编排器在调度前创建，之后不可变
#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub display_name: String,
    pub engine: EngineId,
    pub command: Vec<String>,
    pub output_name: String,
}

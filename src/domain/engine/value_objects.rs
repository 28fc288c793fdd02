//! Engine Context - Value Objects

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::EngineError;

/// 执行引擎标识
///
/// 线上名称沿用 worker 可执行文件的命名：serial / openmp / mpi
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineId {
    #[serde(rename = "serial")]
    Serial,
    #[serde(rename = "openmp")]
    SharedMemory,
    #[serde(rename = "mpi")]
    DistributedMemory,
}

impl EngineId {
    pub const ALL: [EngineId; 3] = [
        EngineId::Serial,
        EngineId::SharedMemory,
        EngineId::DistributedMemory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineId::Serial => "serial",
            EngineId::SharedMemory => "openmp",
            EngineId::DistributedMemory => "mpi",
        }
    }
}

impl FromStr for EngineId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "serial" => Ok(EngineId::Serial),
            "openmp" | "shared" | "shared-memory" => Ok(EngineId::SharedMemory),
            "mpi" | "distributed" | "distributed-memory" => Ok(EngineId::DistributedMemory),
            other => Err(EngineError::UnknownEngine(other.to_string())),
        }
    }
}

impl std::fmt::Display for EngineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 引擎选择：自动（按文件大小）或显式指定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineChoice {
    #[default]
    Auto,
    Concrete(EngineId),
}

impl FromStr for EngineChoice {
    type Err = EngineError;

    /// 空字符串与 "auto" 都视为自动选择
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            return Ok(EngineChoice::Auto);
        }
        s.parse().map(EngineChoice::Concrete)
    }
}

impl std::fmt::Display for EngineChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineChoice::Auto => write!(f, "auto"),
            EngineChoice::Concrete(engine) => write!(f, "{}", engine),
        }
    }
}

/// 加密/解密模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherMode {
    #[default]
    Enc,
    Dec,
}

impl CipherMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CipherMode::Enc => "enc",
            CipherMode::Dec => "dec",
        }
    }
}

impl FromStr for CipherMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "enc" => Ok(CipherMode::Enc),
            "dec" => Ok(CipherMode::Dec),
            other => Err(EngineError::UnknownMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for CipherMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Benchmark 对比项
///
/// 枚举声明顺序即规范展示顺序：Serial -> OpenMP -> MPI -> Hybrid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BenchmarkLabel {
    Serial,
    #[serde(rename = "OpenMP")]
    OpenMp,
    #[serde(rename = "MPI")]
    Mpi,
    Hybrid,
}

impl BenchmarkLabel {
    pub const CANONICAL: [BenchmarkLabel; 4] = [
        BenchmarkLabel::Serial,
        BenchmarkLabel::OpenMp,
        BenchmarkLabel::Mpi,
        BenchmarkLabel::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BenchmarkLabel::Serial => "Serial",
            BenchmarkLabel::OpenMp => "OpenMP",
            BenchmarkLabel::Mpi => "MPI",
            BenchmarkLabel::Hybrid => "Hybrid",
        }
    }

    /// 输出文件后缀
    pub fn output_suffix(&self) -> &'static str {
        match self {
            BenchmarkLabel::Serial => "ser",
            BenchmarkLabel::OpenMp => "omp",
            BenchmarkLabel::Mpi => "mpi",
            BenchmarkLabel::Hybrid => "hyb",
        }
    }

    /// 该对比项使用的引擎
    pub fn engine(&self) -> EngineId {
        match self {
            BenchmarkLabel::Serial => EngineId::Serial,
            BenchmarkLabel::OpenMp => EngineId::SharedMemory,
            BenchmarkLabel::Mpi | BenchmarkLabel::Hybrid => EngineId::DistributedMemory,
        }
    }
}

impl std::fmt::Display for BenchmarkLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Engine Selector - 按负载大小选择执行引擎

use super::value_objects::{EngineChoice, EngineId};

/// 小于该值使用串行引擎
pub const SHARED_MEMORY_THRESHOLD: u64 = 20 * 1024 * 1024;

/// 大于等于该值使用分布式引擎
pub const DISTRIBUTED_MEMORY_THRESHOLD: u64 = 200 * 1024 * 1024;

/// 根据显式选择或文件大小确定引擎
///
/// 显式指定的引擎原样返回；`Auto` 时按固定阈值划分，下界归入更高一档。
pub fn select_engine(choice: EngineChoice, size_bytes: u64) -> EngineId {
    match choice {
        EngineChoice::Concrete(engine) => engine,
        EngineChoice::Auto if size_bytes < SHARED_MEMORY_THRESHOLD => EngineId::Serial,
        EngineChoice::Auto if size_bytes < DISTRIBUTED_MEMORY_THRESHOLD => EngineId::SharedMemory,
        EngineChoice::Auto => EngineId::DistributedMemory,
    }
}

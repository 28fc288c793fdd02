//! Job Context - 产物命名
//!
//! 上传、输出、日志文件名都由作业 ID 加随机后缀构成，
//! 并发作业之间不会冲突，因此文件系统上不需要加锁。

use uuid::Uuid;

/// 生成 8 位十六进制作业 ID
pub fn new_job_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// 生成作业内唯一的文件 ID：`{job_id}_{4 位随机后缀}`
pub fn new_file_id(job_id: &str) -> String {
    format!("{}_{}", job_id, &Uuid::new_v4().simple().to_string()[..4])
}

/// 清理客户端提供的文件名，只保留可安全落盘的字符
///
/// 去掉目录部分，空白替换为 `_`，其余非 `[A-Za-z0-9._-]` 字符丢弃，
/// 并去掉开头的 `.` 与 `_`，结果为空时返回 `None`
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches(['.', '_']).to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

//! Multipart 表单解析
//!
//! run 与 benchmark 共用：收集上传文件与文本字段，并解析成命令参数

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use std::collections::HashMap;

use crate::application::UploadedFile;
use crate::domain::engine::{CipherMode, EngineChoice, EngineError};
use crate::infrastructure::http::error::ApiError;

const DEFAULT_KEY: &str = "3";
const DEFAULT_CHUNK: u64 = 1024 * 1024;

/// 超过上传上限时返回 413，其余按请求格式错误处理
fn multipart_error(context: &str, e: MultipartError) -> ApiError {
    let msg = format!("{}: {}", context, e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(msg)
    } else {
        ApiError::BadRequest(msg)
    }
}

/// 解析后的 multipart 表单
#[derive(Debug, Default)]
pub struct DispatchForm {
    /// `files` 字段（可重复）
    pub files: Vec<UploadedFile>,
    /// `file` 字段（单文件）
    pub file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

impl DispatchForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = DispatchForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error("Failed to read multipart field", e))?
        {
            let field_name = field.name().unwrap_or_default().to_string();

            match field_name.as_str() {
                "files" | "file" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error("Failed to read file", e))?;
                    let upload = UploadedFile::new(filename, data);

                    if field_name == "files" {
                        form.files.push(upload);
                    } else if form.file.is_none() {
                        form.file = Some(upload);
                    }
                }
                _ => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| multipart_error("Failed to read form field", e))?;
                    form.fields.insert(field_name, value.trim().to_string());
                }
            }
        }

        Ok(form)
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// 批量提交的文件；没有 `files` 时回退到单个 `file`
    pub fn take_batch(&mut self) -> Vec<UploadedFile> {
        let files: Vec<UploadedFile> = std::mem::take(&mut self.files)
            .into_iter()
            .filter(|f| !f.filename.is_empty())
            .collect();

        if files.is_empty() {
            self.file.take().into_iter().collect()
        } else {
            files
        }
    }

    pub fn mode(&self) -> Result<CipherMode, ApiError> {
        self.text("mode")
            .unwrap_or("enc")
            .parse()
            .map_err(|e: EngineError| ApiError::BadRequest(e.to_string()))
    }

    pub fn engine(&self) -> Result<EngineChoice, ApiError> {
        self.text("engine")
            .unwrap_or("auto")
            .parse()
            .map_err(|e: EngineError| ApiError::BadRequest(e.to_string()))
    }

    pub fn key(&self) -> String {
        self.text("key").unwrap_or(DEFAULT_KEY).to_string()
    }

    pub fn chunk(&self) -> Result<u64, ApiError> {
        match self.text("chunk") {
            None => Ok(DEFAULT_CHUNK),
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|c| *c > 0)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid chunk size: {}", v))),
        }
    }

    /// 空值返回 None，由编排器替换为 CPU 数
    pub fn count(&self, name: &str) -> Result<Option<u32>, ApiError> {
        self.text(name)
            .map(|v| {
                v.parse::<u32>()
                    .map_err(|_| ApiError::BadRequest(format!("Invalid {}: {}", name, v)))
            })
            .transpose()
    }
}

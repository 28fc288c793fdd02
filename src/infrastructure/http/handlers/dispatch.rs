//! Dispatch HTTP Handlers - 作业提交与 Benchmark

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;

use super::form::DispatchForm;
use crate::application::{RunBenchmark, RunJob};
use crate::domain::job::{BenchmarkReport, JobReport};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 批量处理：每个文件一个任务，结果按完成顺序返回
pub async fn run_job(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<JobReport>>, ApiError> {
    let mut form = DispatchForm::read(multipart).await?;

    let files = form.take_batch();
    if files.is_empty() {
        return Err(ApiError::BadRequest("No files uploaded".to_string()));
    }

    let command = RunJob {
        files,
        mode: form.mode()?,
        engine: form.engine()?,
        key: form.key(),
        chunk: form.chunk()?,
        threads: form.count("threads")?,
        procs: form.count("procs")?,
    };

    let report = state.run_job_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Benchmark：一个文件跑四种引擎配置，结果按规范顺序返回
pub async fn run_benchmark(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<BenchmarkReport>>, ApiError> {
    let mut form = DispatchForm::read(multipart).await?;

    let file = form
        .file
        .take()
        .filter(|f| !f.filename.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No file".to_string()))?;

    let command = RunBenchmark {
        file,
        mode: form.mode()?,
        key: form.key(),
        chunk: form.chunk()?,
        threads: form.count("threads")?,
        procs: form.count("procs")?,
    };

    let report = state.benchmark_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(report)))
}

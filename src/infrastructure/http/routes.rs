//! HTTP Routes
//!
//! API Endpoints:
//! - /api/run               POST  批量加解密（multipart，每个文件一个任务）
//! - /api/benchmark         POST  单文件四种引擎配置对比
//! - /api/download/:name    GET   下载输出文件
//! - /api/ping              GET   健康检查

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/run", post(handlers::run_job))
        .route("/benchmark", post(handlers::run_benchmark))
        .route("/download/:name", get(handlers::download_output))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    use crate::application::commands::handlers::test_support::{touch_binaries, FakeScheduler};
    use crate::application::settings::test_support::settings;
    use crate::application::ExecutionOutcome;
    use crate::infrastructure::adapters::FileJobStorage;
    use crate::infrastructure::http::server::build_router;
    use crate::infrastructure::http::state::AppState;

    const BOUNDARY: &str = "cryptbench-test-boundary";

    struct Harness {
        _root: tempfile::TempDir,
        storage: Arc<FileJobStorage>,
        router: Router,
    }

    async fn harness(with_binaries: bool) -> Harness {
        let root = tempfile::tempdir().unwrap();
        let bin_dir = root.path().join("bin");
        std::fs::create_dir_all(&bin_dir).unwrap();
        if with_binaries {
            touch_binaries(&bin_dir);
        }

        let storage = Arc::new(
            FileJobStorage::new(
                root.path().join("uploads"),
                root.path().join("outputs"),
                root.path().join("results"),
            )
            .await
            .unwrap(),
        );
        let scheduler = Arc::new(FakeScheduler::new(|_| {
            ExecutionOutcome::new(0, "Time(s)=0.5 Throughput(MB/s)=12.0")
        }));

        let state = AppState::new(
            Arc::new(settings(bin_dir)),
            storage.clone(),
            scheduler,
            1024 * 1024,
        );

        Harness {
            _root: root,
            storage,
            router: build_router(Arc::new(state)),
        }
    }

    /// (字段名, 文件名, 内容)
    fn multipart(parts: &[(&str, Option<&str>, &str)]) -> Body {
        let mut body = String::new();
        for (name, filename, value) in parts {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            match filename {
                Some(filename) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    name, filename
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    name
                )),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));
        Body::from(body)
    }

    fn post(uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(body)
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let h = harness(true).await;
        let response = h.router.oneshot(get("/api/ping")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["detectedCpus"], 8);
    }

    #[tokio::test]
    async fn test_run_returns_job_report() {
        let h = harness(true).await;
        let body = multipart(&[
            ("files", Some("small.txt"), "hello world"),
            ("mode", None, "enc"),
            ("engine", None, "auto"),
            ("threads", None, "2"),
            ("procs", None, "2"),
        ]);

        let response = h.router.oneshot(post("/api/run", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["errno"], 0);
        let results = body["data"]["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["filename"], "small.txt");
        assert_eq!(results[0]["status"], "success");
        assert_eq!(results[0]["engine"], "serial");
        assert_eq!(results[0]["time"], 0.5);
        assert_eq!(results[0]["throughput"], 12.0);
    }

    #[tokio::test]
    async fn test_run_without_files_is_bad_request() {
        let h = harness(true).await;
        let body = multipart(&[("mode", None, "enc")]);

        let response = h.router.oneshot(post("/api/run", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["errno"], 400);
    }

    #[tokio::test]
    async fn test_run_rejects_bad_fields() {
        for (field, value) in [("mode", "encrypt"), ("engine", "gpu"), ("threads", "many")] {
            let h = harness(true).await;
            let body = multipart(&[("files", Some("a.txt"), "data"), (field, None, value)]);

            let response = h.router.oneshot(post("/api/run", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {}", field);
        }
    }

    #[tokio::test]
    async fn test_run_missing_binaries_is_unavailable() {
        let h = harness(false).await;
        let body = multipart(&[("files", Some("a.txt"), "data")]);

        let response = h.router.oneshot(post("/api/run", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = json(response).await;
        assert_eq!(body["errno"], 503);
        assert!(body["error"].as_str().unwrap().contains("encrypt_serial"));
    }

    #[tokio::test]
    async fn test_benchmark_returns_canonical_order() {
        let h = harness(true).await;
        let body = multipart(&[("file", Some("bench.bin"), "0123456789")]);

        let response = h.router.oneshot(post("/api/benchmark", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        let labels: Vec<&str> = body["data"]["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["label"].as_str().unwrap())
            .collect();
        assert_eq!(labels, vec!["Serial", "OpenMP", "MPI", "Hybrid"]);
    }

    #[tokio::test]
    async fn test_download_existing_output() {
        let h = harness(true).await;
        std::fs::write(h.storage.output_dir().join("job_out.enc"), b"cipher").unwrap();

        let response = h
            .router
            .oneshot(get("/api/download/job_out.enc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"job_out.enc\""
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"cipher");
    }

    #[tokio::test]
    async fn test_download_missing_and_traversal() {
        let h = harness(true).await;
        let response = h
            .router
            .clone()
            .oneshot(get("/api/download/nope.enc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = h
            .router
            .oneshot(get("/api/download/..%2Fsecret"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

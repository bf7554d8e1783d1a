//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use bytes::Bytes;
use http::{Request, StatusCode, header};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use sitehost_api::state::AppState;
use sitehost_core::config::{
    AppConfig, DatabaseConfig, LoggingConfig, ServerConfig, StorageConfig,
};
use sitehost_database::repositories::deployment::DeploymentRepository;
use sitehost_service::DeploymentService;
use sitehost_storage::StaticResolver;

const MULTIPART_BOUNDARY: &str = "sitehost-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: SqlitePool,
    /// Application config
    pub config: AppConfig,
    /// Scratch directory holding the database and deployments root
    _dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a new test application backed by a scratch directory.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: format!("sqlite://{}", dir.path().join("test.db").display()),
                max_connections: 1,
                connect_timeout_seconds: 5,
            },
            storage: StorageConfig {
                deployments_root: dir.path().join("deployments").display().to_string(),
                max_upload_size_bytes: 10 * 1024 * 1024,
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
                format: "pretty".to_string(),
            },
        };

        let db_pool = sitehost_database::connection::create_pool(&config.database)
            .await
            .expect("Failed to open test database");
        sitehost_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        let deployment_repo = Arc::new(DeploymentRepository::new(db_pool.clone()));
        let deployment_service = Arc::new(DeploymentService::new(
            Arc::clone(&deployment_repo),
            &config.storage,
        ));
        let resolver = Arc::new(StaticResolver::new(&config.storage.deployments_root));

        let state = AppState {
            config: Arc::new(config.clone()),
            deployment_service,
            resolver,
        };
        let router = sitehost_api::build_router(state);

        Self {
            router,
            db_pool,
            config,
            _dir: dir,
        }
    }

    /// Directory holding one subdirectory per deployment.
    pub fn deployments_root(&self) -> PathBuf {
        PathBuf::from(&self.config.storage.deployments_root)
    }

    /// Make a bodyless HTTP request and parse the JSON response.
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Upload an archive through the multipart endpoint.
    ///
    /// `filename` is the declared filename of the `file` field; pass an
    /// empty string to omit it entirely.
    pub async fn upload(&self, filename: &str, archive: &[u8]) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        if filename.is_empty() {
            body.extend_from_slice(b"Content-Disposition: form-data; name=\"file\"\r\n");
        } else {
            body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(b"Content-Type: application/zip\r\n\r\n");
        body.extend_from_slice(archive);
        body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build upload request");
        self.send(req).await
    }

    /// Fetch a raw response (status, headers, body bytes) without JSON parsing.
    pub async fn get_raw(&self, path: &str) -> (StatusCode, http::HeaderMap, Bytes) {
        let req = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        (status, headers, body)
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// Extract a string field from the JSON body.
    pub fn str_field(&self, name: &str) -> &str {
        self.body
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_else(|| panic!("Missing string field '{name}' in {:?}", self.body))
    }
}

/// Build a ZIP archive with the given (name, content) entries.
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    let mut writer = ZipWriter::new(&mut cursor);
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer
            .write_all(content.as_bytes())
            .expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip");
    cursor.into_inner()
}

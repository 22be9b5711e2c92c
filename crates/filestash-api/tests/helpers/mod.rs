//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p filestash-api`.

#![allow(dead_code)]

use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use filestash_api::setup::{routes, services};
use filestash_api::state::AppState;
use filestash_core::{BaseConfig, Config, FileServiceConfig, RetentionConfig, StorageBackend};
use filestash_services::RetentionService;
use filestash_storage::{BlobStore, LocalBlobStore, ObjectStoreBlobStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Test application: server plus the pieces tests poke at directly.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub retention: Arc<RetentionService>,
    pub _temp_dir: Option<TempDir>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(backend: StorageBackend, local_path: Option<String>) -> Config {
    Config(Box::new(FileServiceConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            max_body_size_bytes: 10 * 1024 * 1024,
            environment: "test".to_string(),
        },
        storage_backend: Some(backend),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        azure_account: None,
        azure_access_key: None,
        azure_container: "files".to_string(),
        local_storage_path: local_path,
        cache_max_entries: 100,
        cache_ttl: Duration::from_secs(60),
        retention: RetentionConfig::default(),
    }))
}

async fn build(config: Config, store: Arc<dyn BlobStore>, temp_dir: Option<TempDir>) -> TestApp {
    let (state, retention) = services::initialize_services(&config, store);
    let app = routes::setup_routes(&config, state.clone())
        .await
        .expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        state,
        retention,
        _temp_dir: temp_dir,
    }
}

/// Setup test app backed by the in-memory object store.
pub async fn setup_test_app() -> TestApp {
    let config = test_config(StorageBackend::Memory, None);
    build(config, Arc::new(ObjectStoreBlobStore::in_memory()), None).await
}

/// Setup test app backed by a local directory, for tests that age files on disk.
pub async fn setup_local_test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().to_string_lossy().to_string();
    let config = test_config(StorageBackend::Local, Some(path.clone()));
    let store = LocalBlobStore::new(path)
        .await
        .expect("Failed to create local store");
    build(config, Arc::new(store), Some(temp_dir)).await
}

/// JSON body for `POST /files`.
pub fn file_body(name: &str, contents: &[u8]) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "sourceApplicationId": 7,
        "sourceApplicationInstanceId": "instance-42",
        "type": "text/plain",
        "encoding": "UTF-8",
        "contents": STANDARD.encode(contents),
    })
}

/// Upload a file and return its id.
pub async fn upload_file(client: &TestServer, name: &str, contents: &[u8]) -> String {
    let response = client.post("/files").json(&file_body(name, contents)).await;
    assert_eq!(response.status_code(), 201);
    response.json::<String>()
}

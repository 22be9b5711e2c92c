//! Instance-deleted event and retention sweep integration tests.
//!
//! Run with: `cargo test -p filestash-api --test lifecycle_test`

mod helpers;

use chrono::Utc;
use helpers::{setup_local_test_app, setup_test_app, upload_file};
use std::time::{Duration, SystemTime};
use uuid::Uuid;

#[tokio::test]
async fn test_instance_deleted_event_removes_files_and_acks() {
    let app = setup_test_app().await;
    let client = app.client();
    let first = upload_file(client, "a.txt", b"a").await;
    let second = upload_file(client, "b.txt", b"b").await;
    let kept = upload_file(client, "c.txt", b"c").await;

    let response = client
        .post("/events/instance-deleted")
        .json(&serde_json::json!({
            "headers": {
                "correlationId": Uuid::new_v4(),
                "sourceApplicationId": 7,
                "sourceApplicationInstanceId": "instance-42",
                "instanceId": 1001
            },
            "fileIds": [first, second]
        }))
        .await;

    assert_eq!(response.status_code(), 204);
    for id in [&first, &second] {
        assert_eq!(client.get(&format!("/files/{}", id)).await.status_code(), 404);
    }
    assert_eq!(client.get(&format!("/files/{}", kept)).await.status_code(), 200);
}

#[tokio::test]
async fn test_instance_deleted_event_without_file_ids_is_acked() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/events/instance-deleted")
        .json(&serde_json::json!({ "headers": {} }))
        .await;

    assert_eq!(response.status_code(), 204);
}

#[tokio::test]
async fn test_instance_deleted_event_for_unknown_files_is_acked() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/events/instance-deleted")
        .json(&serde_json::json!({ "fileIds": [Uuid::new_v4()] }))
        .await;

    assert_eq!(response.status_code(), 204);
}

#[tokio::test]
async fn test_instance_deleted_event_with_bad_file_id_is_400() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/events/instance-deleted")
        .json(&serde_json::json!({ "fileIds": ["nope"] }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_retention_sweep_removes_only_expired_files() {
    let app = setup_local_test_app().await;
    let client = app.client();
    let old = upload_file(client, "old.txt", b"old").await;
    let recent = upload_file(client, "recent.txt", b"recent").await;

    let dir = app._temp_dir.as_ref().unwrap().path();
    let aged = SystemTime::now() - Duration::from_secs(200 * 24 * 60 * 60);
    std::fs::File::options()
        .write(true)
        .open(dir.join(&old))
        .unwrap()
        .set_modified(aged)
        .unwrap();

    let deleted = app.retention.run_once().await.unwrap();

    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].name, old);
    assert!(deleted[0].deleted_at < Utc::now() - chrono::Duration::days(180));
    assert!(!dir.join(&old).exists());
    assert!(dir.join(&recent).exists());

    // The cache is left alone by the sweep; the durable copy is gone.
    let old_id = Uuid::parse_str(&old).unwrap();
    let durable = app.state.file_service.repository().find_file(old_id).await.unwrap();
    assert!(durable.is_none());
}

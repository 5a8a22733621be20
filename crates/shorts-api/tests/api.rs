//! Router integration tests over an in-memory store.
//!
//! The runner is constructed but never spawned; these tests exercise the
//! HTTP surface only, which by design touches nothing but the store.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use shorts_api::{create_router, ApiConfig, AppState};
use shorts_providers::ProviderSettings;
use shorts_store::Store;
use shorts_worker::{JobRunner, WorkerConfig};

async fn test_app() -> (Router, Store) {
    let store = Store::in_memory().await.unwrap();
    let runner = JobRunner::new(store.clone(), WorkerConfig::default());

    let state = AppState {
        config: ApiConfig::default(),
        store: store.clone(),
        runner: runner.handle(),
        settings: ProviderSettings::default(),
    };

    (create_router(state, None), store)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_store_connectivity() {
    let (app, _store) = test_app().await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    // The runner was never spawned in this harness.
    assert_eq!(body["worker_running"], false);
}

#[tokio::test]
async fn submission_creates_retrievable_pending_records() {
    let (app, _store) = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/videos/create",
        json!({ "script": "Honey never spoils." }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let video_id = body["video_id"].as_str().unwrap().to_string();
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let (status, video) = get(&app, &format!("/api/videos/{video_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(video["status"], "pending");
    assert_eq!(video["script"], "Honey never spoils.");

    let (status, job) = get(&app, &format!("/api/jobs/{job_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["status"], "pending");
    assert_eq!(job["progress"], 0);
    assert_eq!(job["video_id"], video_id.as_str());
}

#[tokio::test]
async fn blank_script_is_rejected_without_creating_records() {
    let (app, store) = test_app().await;

    let (status, body) = post_json(&app, "/api/videos/create", json!({ "script": "  \n " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Script"));

    assert!(store.list_videos(None, 10).await.unwrap().is_empty());
    assert!(store.list_jobs(None, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_script_field_is_a_client_error() {
    let (app, _store) = test_app().await;

    let (status, _) = post_json(&app, "/api/videos/create", json!({ "title": "no script" })).await;
    assert!(status.is_client_error(), "got {status}");
}

#[tokio::test]
async fn unknown_ids_return_404() {
    let (app, _store) = test_app().await;

    let (status, _) = get(&app, "/api/videos/no-such-id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/api/jobs/no-such-id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_filters_by_status_and_rejects_unknown_status() {
    let (app, _store) = test_app().await;

    post_json(&app, "/api/videos/create", json!({ "script": "one" })).await;
    post_json(&app, "/api/videos/create", json!({ "script": "two" })).await;

    let (status, body) = get(&app, "/api/videos?status=pending").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = get(&app, "/api/videos?status=completed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, _) = get(&app, "/api/videos?status=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn queue_status_is_stable_while_idle() {
    let (app, _store) = test_app().await;

    post_json(&app, "/api/videos/create", json!({ "script": "queued" })).await;

    let (status, first) = get(&app, "/api/jobs/queue/status").await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = get(&app, "/api/jobs/queue/status").await;

    assert_eq!(first["pending_jobs"], 1);
    assert_eq!(first["processing_jobs"], 0);
    assert_eq!(first["pending_jobs"], second["pending_jobs"]);
    assert_eq!(first["processing_jobs"], second["processing_jobs"]);
}

#[tokio::test]
async fn credentials_are_saved_but_never_echoed() {
    let (app, store) = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/config/save",
        json!({ "openai": "sk-secret-value", "luma": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saved"], json!(["openai"]));

    // Blank value was ignored, non-blank stored (encrypted).
    assert!(store.credential("luma").await.unwrap().is_none());
    assert_eq!(
        store.credential("openai").await.unwrap().as_deref(),
        Some("sk-secret-value")
    );

    let (status, body) = get(&app, "/api/config/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["required_configured"], false);

    let serialized = body.to_string();
    assert!(serialized.contains("openai"));
    assert!(!serialized.contains("sk-secret-value"));
}

#[tokio::test]
async fn required_set_is_satisfied_once_all_keys_exist() {
    let (app, _store) = test_app().await;

    post_json(
        &app,
        "/api/config/save",
        json!({ "gemini": "g", "openai": "o", "luma": "l" }),
    )
    .await;

    let (_, body) = get(&app, "/api/config/status").await;
    assert_eq!(body["required_configured"], true);
}

#[tokio::test]
async fn download_requires_an_output_file_on_disk() {
    let (app, store) = test_app().await;

    let (_, body) = post_json(&app, "/api/videos/create", json!({ "script": "s" })).await;
    let video_id = body["video_id"].as_str().unwrap().to_string();

    // Pending video: no output path yet.
    let (status, _) = get(&app, &format!("/api/videos/{video_id}/download")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Completed but the file is gone from disk.
    store
        .set_video_completed(
            &shorts_models::VideoId::from(video_id.as_str()),
            "/nonexistent/final_video.mp4",
            None,
            None,
        )
        .await
        .unwrap();
    let (status, _) = get(&app, &format!("/api/videos/{video_id}/download")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_streams_the_final_file() {
    let (app, store) = test_app().await;

    let (_, body) = post_json(&app, "/api/videos/create", json!({ "script": "s" })).await;
    let video_id = body["video_id"].as_str().unwrap().to_string();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("final_video.mp4");
    std::fs::write(&path, b"mp4-bytes").unwrap();

    store
        .set_video_completed(
            &shorts_models::VideoId::from(video_id.as_str()),
            &path.to_string_lossy(),
            None,
            Some(12),
        )
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/videos/{video_id}/download"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"mp4-bytes");
}

#[tokio::test]
async fn publish_requires_a_completed_video() {
    let (app, _store) = test_app().await;

    let (_, body) = post_json(&app, "/api/videos/create", json!({ "script": "s" })).await;
    let video_id = body["video_id"].as_str().unwrap().to_string();

    let (status, _) = post_json(
        &app,
        &format!("/api/videos/{video_id}/publish"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn schedules_round_trip_and_validate() {
    let (app, _store) = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/schedules/create",
        json!({
            "name": "morning facts",
            "frequency": "daily",
            "time": "09:00",
            "days": ["mon", "wed"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["schedule_id"].as_str().is_some());

    // Missing required fields are a client error.
    let (status, _) = post_json(&app, "/api/schedules/create", json!({ "name": "x" })).await;
    assert!(status.is_client_error());

    let (status, body) = get(&app, "/api/schedules?active=true").await;
    assert_eq!(status, StatusCode::OK);
    let schedules = body.as_array().unwrap();
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0]["name"], "morning facts");
}

#[tokio::test]
async fn stats_counts_by_status() {
    let (app, store) = test_app().await;

    let (_, body) = post_json(&app, "/api/videos/create", json!({ "script": "a" })).await;
    post_json(&app, "/api/videos/create", json!({ "script": "b" })).await;

    let video_id = body["video_id"].as_str().unwrap();
    store
        .set_video_completed(
            &shorts_models::VideoId::from(video_id),
            "out.mp4",
            None,
            None,
        )
        .await
        .unwrap();

    let (status, stats) = get(&app, "/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_videos"], 2);
    assert_eq!(stats["pending_videos"], 1);
    assert_eq!(stats["completed_videos"], 1);
    assert_eq!(stats["total_jobs"], 2);
    assert_eq!(stats["pending_jobs"], 2);
}

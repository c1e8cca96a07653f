//! HttpBackend against a local axum server standing in for the record service.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use gateway::{request, Backend, Endpoint, GatewayConfig, HttpBackend, RequestOptions};
use serde_json::json;
use types::{RecordId, TaskId, TaskStatus, TriState};
use url::Url;

async fn record_detail(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "r1" => Json(json!({
            "game_id": 42,
            "players": ["Alice", "Bob"],
            "winner": "Alice",
            "rounds": [{
                "round_id": 1,
                "target_card": "A",
                "starting_player": "Bob",
                "round_result": {"shooter_name": "Bob", "bullet_hit": true},
                "history": [{"player": "Bob", "played_cards": ["A"], "was_challenged": null}]
            }]
        }))
        .into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "record not found"}))).into_response(),
    }
}

async fn task_status(Path(task_id): Path<String>) -> Response {
    match task_id.as_str() {
        "t-running" => Json(json!({"status": "running"})).into_response(),
        "t-done" => Json(json!({"status": "finished", "record_id": "r1"})).into_response(),
        "t-silent" => StatusCode::OK.into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn spawn_backend(start_game_ok: bool) -> String {
    let start_route = if start_game_ok {
        post(|| async { Json(json!({"task_id": "t-running"})).into_response() })
    } else {
        post(|| async {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"error": "simulator busy"})),
            )
                .into_response()
        })
    };

    let app = Router::new()
        .route(
            "/api/records",
            get(|| async {
                Json(json!({
                    "summary": {
                        "total_records": 1,
                        "unique_players": ["Alice", "Bob"],
                        "winner_breakdown": [{"name": "Alice", "count": 1}]
                    },
                    "records": [{
                        "id": "r1",
                        "name": "game_42.json",
                        "players": ["Alice", "Bob"],
                        "winner": "Alice",
                        "round_count": 1,
                        "updated_at": "2024-05-31T18:08:37",
                        "source": "game_records"
                    }]
                }))
            }),
        )
        .route("/api/records/{id}", get(record_detail))
        .route("/api/games", start_route)
        .route("/api/games/{task_id}", get(task_status));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server crashed");
    });
    format!("http://{}", addr)
}

fn backend_for(base_url: &str) -> HttpBackend {
    HttpBackend::new(&GatewayConfig::with_base_url(base_url)).expect("Failed to build backend")
}

#[tokio::test]
async fn test_list_and_detail_decode() {
    let backend = backend_for(&spawn_backend(true).await);

    let page = backend.list_records().await.expect("Listing should succeed");
    assert_eq!(page.summary.total_records, 1);
    assert_eq!(page.records[0].id, RecordId::new("r1"));

    let detail = backend
        .record_detail(&RecordId::new("r1"))
        .await
        .expect("Detail should load");
    assert_eq!(detail.game_id.as_deref(), Some("42"));
    let round = &detail.rounds[0];
    assert_eq!(
        round.round_result.as_ref().map(|r| r.bullet_hit),
        Some(TriState::Yes)
    );
    assert_eq!(round.history[0].was_challenged, TriState::Unrecorded);
}

#[tokio::test]
async fn test_missing_record_carries_server_message() {
    let backend = backend_for(&spawn_backend(true).await);

    let err = backend
        .record_detail(&RecordId::new("gone"))
        .await
        .expect_err("Unknown record should fail");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "record not found");
    assert_eq!(err.body(), Some(&json!({"error": "record not found"})));
}

#[tokio::test]
async fn test_start_game_success_and_failure() {
    let ok = backend_for(&spawn_backend(true).await);
    assert_eq!(ok.start_game().await.unwrap(), TaskId::new("t-running"));

    let busy = backend_for(&spawn_backend(false).await);
    let err = busy.start_game().await.expect_err("Busy simulator should fail");
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "simulator busy");
}

#[tokio::test]
async fn test_task_status_normalization() {
    let backend = backend_for(&spawn_backend(true).await);

    assert_eq!(
        backend.task_status(&TaskId::new("t-running")).await.unwrap(),
        TaskStatus::Running
    );
    assert_eq!(
        backend.task_status(&TaskId::new("t-done")).await.unwrap(),
        TaskStatus::Finished {
            record_id: Some(RecordId::new("r1"))
        }
    );
    // An empty 200 is read as `{}`, which carries no status at all.
    assert_eq!(
        backend.task_status(&TaskId::new("t-silent")).await.unwrap(),
        TaskStatus::Unknown
    );

    let err = backend
        .task_status(&TaskId::new("t-crash"))
        .await
        .expect_err("500 should fail");
    assert_eq!(err.to_string(), "request failed: 500");
    assert_eq!(err.body(), None);
}

#[tokio::test]
async fn test_raw_request_returns_json() {
    let base = Url::parse(&spawn_backend(true).await).unwrap();
    let client = reqwest::Client::new();

    let value = request(&client, &base, &Endpoint::Records, RequestOptions::get())
        .await
        .expect("Request should succeed");
    assert_eq!(value["records"][0]["id"], json!("r1"));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut config = GatewayConfig::with_base_url(format!("http://{}", addr));
    config.read_retries = 0;
    let backend = HttpBackend::new(&config).unwrap();

    let err = backend.list_records().await.expect_err("Nothing is listening");
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
}

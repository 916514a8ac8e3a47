use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use lightfeedback::api::{FeedbackApi, HttpClient, ListQuery};
use lightfeedback::commands::{
    AppContext, OutputOptions, UpdateOptions, cmd_comment, cmd_comments, cmd_update,
};
use lightfeedback::config::{AuthConfig, Config};
use lightfeedback::detail::PatchDraft;
use lightfeedback::error::FeedbackError;
use lightfeedback::session::Session;
use lightfeedback::types::{
    FeedbackStatus, FeedbackType, NewComment, NewFeedback, Severity, SortOrder,
};

type Reply = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Everything the stub server has seen
#[derive(Clone, Default)]
struct Recorded {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
}

impl Recorded {
    fn last_query(&self) -> HashMap<String, String> {
        self.queries.lock().unwrap().last().cloned().unwrap()
    }

    fn last_body(&self) -> Value {
        self.bodies.lock().unwrap().last().cloned().unwrap()
    }
}

fn item_json(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "project_key": "nfrfscenario",
        "type": "bug",
        "title": "Crash on save",
        "description": "Saving twice crashes",
        "severity": "high",
        "status": status,
        "assignee": "alice",
        "resolution": null,
        "created_by": "carol",
        "created_at": "2024-03-01T10:00:00",
    })
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn projects() -> Json<Value> {
    Json(json!([
        { "key": "nfrfscenario", "name": "NFRF Scenario" },
        { "key": "legacy", "name": "Legacy", "active": false },
    ]))
}

async fn list_feedback(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    rec.auth.lock().unwrap().push(
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );
    rec.queries.lock().unwrap().push(params);
    Json(json!({
        "items": [item_json(7, "open")],
        "page": 1,
        "total": 1,
    }))
}

async fn create_feedback(State(rec): State<Recorded>, Json(body): Json<Value>) -> Reply {
    rec.bodies.lock().unwrap().push(body.clone());
    let mut item = item_json(8, "open");
    item["title"] = body["title"].clone();
    Ok(Json(item))
}

async fn get_feedback(Path(id): Path<u64>) -> Reply {
    if id == 404 {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Feedback not found" })),
        ));
    }
    Ok(Json(item_json(id, "open")))
}

async fn patch_feedback(
    State(rec): State<Recorded>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Reply {
    rec.bodies.lock().unwrap().push(body.clone());
    let fields = body.as_object().map(|o| o.len()).unwrap_or(0);
    if fields <= 1 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Nothing to update" })),
        ));
    }
    let status = body["status"].as_str().unwrap_or("open").to_string();
    Ok(Json(item_json(id, &status)))
}

/// Item 500 has a thread the server cannot read
async fn list_comments(Path(id): Path<u64>) -> Reply {
    if id == 500 {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "database is locked" })),
        ));
    }
    Ok(Json(json!([
        { "id": 1, "feedback_id": id, "body": "Seen it too", "created_by": "bob", "created_at": "2024-03-02T09:00:00" },
    ])))
}

async fn add_comment(
    State(rec): State<Recorded>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    rec.bodies.lock().unwrap().push(body.clone());
    Json(json!({
        "id": 2,
        "feedback_id": id,
        "body": body["body"],
        "created_by": body["created_by"],
        "created_at": "2024-03-02T10:00:00",
    }))
}

/// Serve the stub API on an ephemeral port and return its base URL
async fn spawn_server() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/projects", get(projects))
        .route("/api/feedback", get(list_feedback).post(create_feedback))
        .route("/api/feedback/{id}", get(get_feedback).patch(patch_feedback))
        .route(
            "/api/feedback/{id}/comments",
            get(list_comments).post(add_comment),
        )
        .with_state(recorded.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), recorded)
}

#[tokio::test]
async fn test_health_and_projects() {
    let (base, _) = spawn_server().await;
    let client = HttpClient::new(&base).unwrap();

    assert!(client.health().await.unwrap());

    let projects = client.list_projects().await.unwrap();
    assert_eq!(projects.len(), 2);
    assert!(projects[0].active);
    assert!(!projects[1].active);
}

#[tokio::test]
async fn test_list_sends_only_non_empty_filters() {
    let (base, rec) = spawn_server().await;
    let client = HttpClient::new(&base).unwrap();

    let query = ListQuery {
        project_key: Some("nfrfscenario".to_string()),
        status: Some(String::new()),
        feedback_type: None,
        search: Some("  crash ".to_string()),
        page: 2,
        page_size: 20,
        sort: SortOrder::NewestFirst,
    };
    let page = client.list_feedback(&query).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, 7);
    assert_eq!(page.items[0].feedback_type, FeedbackType::Bug);

    let params = rec.last_query();
    assert_eq!(params.get("project_key").map(String::as_str), Some("nfrfscenario"));
    assert_eq!(params.get("search").map(String::as_str), Some("crash"));
    assert_eq!(params.get("page").map(String::as_str), Some("2"));
    assert_eq!(params.get("page_size").map(String::as_str), Some("20"));
    assert!(!params.contains_key("status"));
    assert!(!params.contains_key("type"));
    assert!(!params.contains_key("sort"));
}

#[tokio::test]
async fn test_list_sends_sort_when_oldest_first() {
    let (base, rec) = spawn_server().await;
    let client = HttpClient::new(&base).unwrap();

    let query = ListQuery {
        sort: SortOrder::OldestFirst,
        ..Default::default()
    };
    client.list_feedback(&query).await.unwrap();

    let params = rec.last_query();
    assert_eq!(params.get("sort").map(String::as_str), Some("created_at"));
    assert_eq!(params.len(), 3);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let (base, rec) = spawn_server().await;
    let config = Config {
        base_url: base,
        auth: AuthConfig {
            token: Some("tok_abcdef".to_string()),
        },
        ..Default::default()
    };
    let client = HttpClient::from_config(&config).unwrap();
    client.list_feedback(&ListQuery::default()).await.unwrap();

    let auth = rec.auth.lock().unwrap().last().cloned().flatten();
    assert_eq!(auth.as_deref(), Some("Bearer tok_abcdef"));
}

#[tokio::test]
async fn test_create_body_uses_type_key_and_omits_empty_assignee() {
    let (base, rec) = spawn_server().await;
    let client = HttpClient::new(&base).unwrap();

    let record = NewFeedback {
        project_key: "nfrfscenario".to_string(),
        feedback_type: FeedbackType::Feature,
        title: "Dark mode".to_string(),
        description: "Please".to_string(),
        severity: Some(Severity::Low),
        assignee: None,
        created_by: "carol".to_string(),
    };
    let created = client.create_feedback(&record).await.unwrap();
    assert_eq!(created.id, 8);
    assert_eq!(created.title, "Dark mode");

    let body = rec.last_body();
    assert_eq!(body["type"], "feature");
    assert_eq!(body["severity"], "low");
    assert_eq!(body["created_by"], "carol");
    assert!(body.get("assignee").is_none());
    assert!(body.get("feedback_type").is_none());
}

#[tokio::test]
async fn test_patch_body_contains_only_filled_fields() {
    let (base, rec) = spawn_server().await;
    let client = HttpClient::new(&base).unwrap();

    let draft = PatchDraft {
        status: "resolved".to_string(),
        resolution: "Fixed in 1.2".to_string(),
        assignee: "   ".to_string(),
        ..Default::default()
    };
    let patch = draft.clean(&Session::new("alice")).unwrap();
    let updated = client.patch_feedback(7, &patch).await.unwrap();
    assert_eq!(updated.status, FeedbackStatus::Resolved);

    assert_eq!(
        rec.last_body(),
        json!({
            "status": "resolved",
            "resolution": "Fixed in 1.2",
            "updated_by": "alice",
        })
    );
}

#[tokio::test]
async fn test_rejected_patch_keeps_server_detail() {
    let (base, _) = spawn_server().await;
    let client = HttpClient::new(&base).unwrap();

    let patch = PatchDraft::default().clean(&Session::new("alice")).unwrap();
    let err = client.patch_feedback(7, &patch).await.unwrap_err();
    match err {
        FeedbackError::Api { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("Nothing to update"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_item_is_not_found() {
    let (base, _) = spawn_server().await;
    let client = HttpClient::new(&base).unwrap();

    let err = client.get_feedback(404).await.unwrap_err();
    assert!(matches!(err, FeedbackError::NotFound(_)));
    assert!(err.is_remote());

    let item = client.get_feedback(3).await.unwrap();
    assert_eq!(item.id, 3);
}

#[tokio::test]
async fn test_comments_round_trip() {
    let (base, rec) = spawn_server().await;
    let client = HttpClient::new(&base).unwrap();

    let comments = client.list_comments(7).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].feedback_id, Some(7));

    let comment = client
        .add_comment(
            7,
            &NewComment {
                body: "Still happening".to_string(),
                created_by: "bob".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(comment.id, 2);
    assert_eq!(comment.body, "Still happening");
    assert_eq!(
        rec.last_body(),
        json!({ "body": "Still happening", "created_by": "bob" })
    );
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Bind and drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new(&format!("http://{addr}/api")).unwrap();
    let err = client.list_projects().await.unwrap_err();
    assert!(matches!(err, FeedbackError::Transport(_)));
    assert!(err.is_remote());
}

fn context(base_url: String, user: &str) -> AppContext {
    AppContext {
        config: Config {
            base_url,
            ..Default::default()
        },
        session: Session::new(user),
    }
}

#[tokio::test]
async fn test_update_goes_through_when_thread_fails_to_load() {
    let (base, rec) = spawn_server().await;
    let ctx = context(base, "bob");

    let options = UpdateOptions {
        status: None,
        assignee: Some("bob".to_string()),
        resolution: None,
        title: None,
        description: None,
        severity: None,
    };
    cmd_update(&ctx, 500, options, OutputOptions::default())
        .await
        .unwrap();

    assert_eq!(
        rec.last_body(),
        json!({ "assignee": "bob", "updated_by": "bob" })
    );
}

#[tokio::test]
async fn test_comment_goes_through_when_thread_fails_to_load() {
    let (base, rec) = spawn_server().await;
    let ctx = context(base, "bob");

    cmd_comment(&ctx, 500, "Still broken", OutputOptions::default())
        .await
        .unwrap();
    assert_eq!(
        rec.last_body(),
        json!({ "body": "Still broken", "created_by": "bob" })
    );

    let err = cmd_comments(&ctx, 500, OutputOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to load comments. Please try again.");
}

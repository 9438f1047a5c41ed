use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use atrium_provision::{handle, run, run_from, Invocation};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

type Hits = Arc<Mutex<Vec<String>>>;

async fn account(State(hits): State<Hits>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    hits.lock().unwrap().push("GET /account".into());
    let session = headers.get("x-appwrite-session").and_then(|v| v.to_str().ok());
    if session == Some("valid-session") {
        return (
            StatusCode::OK,
            Json(json!({"$id": "user_1", "name": "Ada", "email": "ada@example.com"})),
        );
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Invalid session", "code": 401, "type": "user_session_not_found"})),
    )
}

async fn create_team(
    State(hits): State<Hits>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    hits.lock().unwrap().push("POST /teams".into());
    (
        StatusCode::CREATED,
        Json(json!({
            "$id": "team_42",
            "$createdAt": "2024-05-01T09:30:00.000+00:00",
            "name": body["name"],
            "total": 0
        })),
    )
}

async fn delete_team(State(hits): State<Hits>, Path(id): Path<String>) -> StatusCode {
    hits.lock().unwrap().push(format!("DELETE /teams/{id}"));
    StatusCode::NO_CONTENT
}

async fn membership(State(hits): State<Hits>, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    hits.lock().unwrap().push(format!("POST /teams/{id}/memberships"));
    (
        StatusCode::CREATED,
        Json(json!({"$id": "m1", "teamId": id, "userId": "user_1", "roles": ["owner"]})),
    )
}

async fn collection(State(hits): State<Hits>) -> (StatusCode, Json<Value>) {
    hits.lock().unwrap().push("POST /collections".into());
    (StatusCode::CREATED, Json(json!({"$id": "coll_1", "name": "Acme Corp Data"})))
}

async fn document(
    State(hits): State<Hits>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    hits.lock().unwrap().push("POST /documents".into());
    if body["data"]["slug"] == "taken" {
        return (
            StatusCode::CONFLICT,
            Json(json!({
                "message": "Document already exists",
                "code": 409,
                "type": "document_already_exists"
            })),
        );
    }
    (StatusCode::CREATED, Json(json!({"$id": "doc_7", "$permissions": body["permissions"]})))
}

async fn hook(State(hits): State<Hits>, Json(body): Json<Value>) -> StatusCode {
    let event = body["event"].as_str().unwrap_or_default();
    hits.lock().unwrap().push(format!("POST /hook {event}"));
    StatusCode::OK
}

async fn fake_backend() -> (String, Hits) {
    let hits: Hits = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1/account", get(account))
        .route("/v1/teams", post(create_team))
        .route("/v1/teams/{id}", delete(delete_team))
        .route("/v1/teams/{id}/memberships", post(membership))
        .route("/v1/databases/{db}/collections", post(collection))
        .route("/v1/databases/{db}/collections/{coll}/documents", post(document))
        .route("/hook", post(hook))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), hits)
}

fn env(base: &str) -> HashMap<String, String> {
    [
        ("APPWRITE_ENDPOINT", format!("{base}/v1")),
        ("APPWRITE_PROJECT_ID", "project_1".into()),
        ("APPWRITE_API_KEY", "admin-secret".into()),
        ("APPWRITE_DATABASE_ID", "db_main".into()),
        ("APPWRITE_WORKSPACES_COLLECTION_ID", "workspaces".into()),
        ("WEBHOOK_URL", format!("{base}/hook")),
        ("WEBHOOK_API_KEY", "hook-key".into()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn invocation(env: HashMap<String, String>, session: &str, body: &str) -> Invocation {
    Invocation {
        headers: HashMap::from([
            ("x-appwrite-trigger".to_string(), "http".to_string()),
            ("x-appwrite-session".to_string(), session.to_string()),
        ]),
        body: body.to_string(),
        env,
    }
}

fn body_of(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

#[tokio::test]
async fn unparseable_invocation_is_invalid_request() {
    let resp = run(b"not json at all").await;
    assert_eq!(resp.status_code, 500);
    let body = body_of(&resp.body);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    assert_eq!(body["error"]["message"], "Failed to parse request");
}

#[tokio::test]
async fn non_utf8_stdin_still_gets_a_response() {
    let raw: &[u8] = b"{\"headers\":{},\"body\":\"\xff\xfe\",\"env\":{}}";
    let resp = run_from(raw).await;
    assert_eq!(resp.status_code, 500);
    assert_eq!(body_of(&resp.body)["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn missing_trigger_wins_over_missing_configuration() {
    let resp = run(br#"{"headers":{},"body":"{}","env":{}}"#).await;
    assert_eq!(resp.status_code, 401);
    assert_eq!(body_of(&resp.body)["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn missing_configuration_is_a_generic_server_error() {
    let inv = invocation(HashMap::new(), "valid-session", r#"{"name":"Acme Corp"}"#);
    let resp = handle(inv).await;
    assert_eq!(resp.status_code, 500);
    let body = body_of(&resp.body);
    assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    assert!(!resp.body.contains("APPWRITE_"));
}

#[tokio::test]
async fn end_to_end_creates_workspace_and_notifies() {
    let (base, hits) = fake_backend().await;
    let raw = serde_json::to_string(&json!({
        "headers": {"X-Appwrite-Trigger": "http", "X-Appwrite-Session": "valid-session"},
        "body": r#"{"name":"Acme Corp","plan":"pro"}"#,
        "env": env(&base),
    }))
    .unwrap();

    let resp = run(raw.as_bytes()).await;
    assert_eq!(resp.status_code, 200, "body: {}", resp.body);

    let body = body_of(&resp.body);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Workspace created successfully");
    let ws = &body["workspace"];
    assert_eq!(ws["id"], "doc_7");
    assert_eq!(ws["slug"], "acme-corp");
    assert_eq!(ws["teamId"], "team_42");
    assert_eq!(ws["tenantId"], "team_42");
    assert_eq!(ws["ownerId"], "user_1");
    assert_eq!(ws["plan"], "pro");
    assert_eq!(ws["status"], "active");

    let hits = hits.lock().unwrap().clone();
    assert_eq!(
        hits,
        vec![
            "GET /account",
            "POST /teams",
            "POST /documents",
            "POST /teams/team_42/memberships",
            "POST /collections",
            "POST /hook workspace.created",
        ]
    );
}

#[tokio::test]
async fn unusable_webhook_settings_do_not_block_provisioning() {
    let (base, hits) = fake_backend().await;
    let mut env = env(&base);
    env.insert("WEBHOOK_URL".into(), "hooks.example.com/welcome".into());
    env.insert("WEBHOOK_TIMEOUT_SECS".into(), "ten".into());

    let resp = handle(invocation(env, "valid-session", r#"{"name":"Acme Corp"}"#)).await;
    assert_eq!(resp.status_code, 200, "body: {}", resp.body);
    assert_eq!(body_of(&resp.body)["workspace"]["teamId"], "team_42");

    let hits = hits.lock().unwrap().clone();
    assert!(hits.contains(&"POST /documents".to_string()));
    assert!(!hits.iter().any(|h| h.starts_with("POST /hook")));
}

#[tokio::test]
async fn rejected_session_never_touches_admin_endpoints() {
    let (base, hits) = fake_backend().await;
    let resp = handle(invocation(env(&base), "stale", r#"{"name":"Acme Corp"}"#)).await;

    assert_eq!(resp.status_code, 401);
    assert_eq!(body_of(&resp.body)["error"]["code"], "AUTHENTICATION_FAILED");
    assert!(!resp.body.contains("user_session_not_found"));
    assert_eq!(hits.lock().unwrap().clone(), vec!["GET /account"]);
}

#[tokio::test]
async fn duplicate_slug_rolls_back_the_team() {
    let (base, hits) = fake_backend().await;
    let resp = handle(invocation(env(&base), "valid-session", r#"{"name":"Taken"}"#)).await;

    assert_eq!(resp.status_code, 500);
    assert_eq!(body_of(&resp.body)["error"]["code"], "WORKSPACE_CREATION_FAILED");
    assert!(!resp.body.contains("document_already_exists"));
    assert!(hits.lock().unwrap().contains(&"DELETE /teams/team_42".to_string()));
}

#[tokio::test]
async fn validation_error_carries_field() {
    let (base, hits) = fake_backend().await;
    let resp = handle(invocation(env(&base), "valid-session", r#"{"name":"ab"}"#)).await;

    assert_eq!(resp.status_code, 400);
    let body = body_of(&resp.body);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "name");
    assert_eq!(hits.lock().unwrap().clone(), vec!["GET /account"]);
}

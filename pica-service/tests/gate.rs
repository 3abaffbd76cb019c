use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use pica_core::{ClientId, ErrorKind};
use pica_service::{AccessGate, HttpAccessGate, OpenAccessGate};
use serde_json::json;
use tokio::net::TcpListener;

/// Fake token endpoint:
/// `t-c1` -> "c1", `t-obj` -> {"client_id": "c2"}, `t-camel` -> {"clientId": "c3"},
/// `t-empty` -> {}, `t-path` -> "../c1", anything else -> 401.
async fn whoami(headers: HeaderMap) -> Response {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    match token {
        "t-c1" => Json(json!("c1")).into_response(),
        "t-obj" => Json(json!({ "client_id": "c2" })).into_response(),
        "t-camel" => Json(json!({ "clientId": "c3" })).into_response(),
        "t-empty" => Json(json!({})).into_response(),
        "t-path" => Json(json!("../c1")).into_response(),
        _ => (StatusCode::UNAUTHORIZED, "nope").into_response(),
    }
}

async fn spawn_gate() -> HttpAccessGate {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Router::new().route("/whoami", get(whoami));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    HttpAccessGate::new(format!("http://{addr}/whoami"))
}

fn client(id: &str) -> ClientId {
    ClientId::parse(id).unwrap()
}

#[tokio::test]
async fn resolves_plain_and_object_replies() {
    let gate = spawn_gate().await;

    assert_eq!(gate.resolve("t-c1").await.unwrap(), client("c1"));
    assert_eq!(gate.resolve("t-obj").await.unwrap(), client("c2"));
    assert_eq!(gate.resolve("t-camel").await.unwrap(), client("c3"));
}

#[tokio::test]
async fn rejected_token_is_not_authenticated() {
    let gate = spawn_gate().await;

    let err = gate.resolve("stolen").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotAuthenticated);
    assert_eq!(err.message, "Invalid user token");
}

#[tokio::test]
async fn reply_without_client_id_is_bad_gateway() {
    let gate = spawn_gate().await;

    let err = gate.resolve("t-empty").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadGateway);
}

#[tokio::test]
async fn malformed_client_id_in_reply_is_bad_gateway() {
    let gate = spawn_gate().await;

    let err = gate.resolve("t-path").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadGateway);
    assert_eq!(err.code(), 502);

    let err = gate.authorize(Some("t-path"), &client("c1")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadGateway);
}

#[tokio::test]
async fn authorize_checks_ownership() {
    let gate = spawn_gate().await;

    gate.authorize(Some("t-c1"), &client("c1")).await.unwrap();

    let err = gate.authorize(Some("t-c1"), &client("c2")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = gate.authorize(None, &client("c1")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotAuthenticated);
}

#[tokio::test]
async fn unreachable_gate_is_bad_gateway() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gate = HttpAccessGate::new(format!("http://{addr}/whoami"));
    let err = gate.resolve("t-c1").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadGateway);
    assert_eq!(err.code(), 502);
}

#[tokio::test]
async fn open_gate_accepts_everyone() {
    OpenAccessGate.authorize(None, &client("anyone")).await.unwrap();
}

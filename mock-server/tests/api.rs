use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Post, User};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- health ---

#[tokio::test]
async fn health_reports_healthy() {
    let resp = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn root_reports_running() {
    let resp = app().oneshot(get("/")).await.unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "FastAPI Backend is running!");
}

#[tokio::test]
async fn slow_data_reports_its_delay() {
    let resp = app().oneshot(get("/slow-data?delay=0")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "This response was delayed by 0 seconds");
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

// --- users ---

#[tokio::test]
async fn list_users_returns_seed() {
    let resp = app().oneshot(get("/users")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    assert_eq!(users.len(), 3);
}

#[tokio::test]
async fn list_users_honors_skip_and_limit() {
    let resp = app().oneshot(get("/users?skip=1&limit=1")).await.unwrap();
    let users: Vec<User> = body_json(resp).await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Jane Smith");
}

#[tokio::test]
async fn get_user_not_found() {
    let resp = app().oneshot(get("/users/999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "User not found");
}

#[tokio::test]
async fn create_user_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/users", r#"{"name":"No email"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- search ---

#[tokio::test]
async fn search_matches_title_and_content_case_insensitively() {
    let resp = app().oneshot(get("/search?q=SECOND")).await.unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["query"], "SECOND");
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["id"], "2");
}

#[tokio::test]
async fn search_without_query_is_empty() {
    let resp = app().oneshot(get("/search")).await.unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 0);
    assert!(body.get("count").is_none());
}

// --- errors and auth ---

#[tokio::test]
async fn simulate_error_returns_500() {
    let resp = app().oneshot(get("/simulate-error")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn whoami_requires_bearer() {
    let resp = app().oneshot(get("/whoami")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn whoami_echoes_token() {
    let req = Request::builder()
        .uri("/whoami")
        .header(http::header::AUTHORIZATION, "Bearer abc123")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["token"], "abc123");
}

// --- create then read back ---

#[tokio::test]
async fn post_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/posts",
            r#"{"title":"Villa in Bali","content":"Sea view","author":"2"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Post = body_json(resp).await;
    assert_eq!(created.title, "Villa in Bali");
    let id = created.id.clone();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/posts/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Post = body_json(resp).await;
    assert_eq!(fetched, created);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/search?q=villa"))
        .await
        .unwrap();
    let body: Value = body_json(resp).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["id"], id.as_str());
}

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub author: String,
}

#[derive(Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct Delay {
    #[serde(default = "default_delay")]
    pub delay: u64,
}

fn default_delay() -> u64 {
    2
}

#[derive(Default)]
pub struct Store {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

fn not_found(what: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": format!("{what} not found") })),
    )
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Three users and three posts, matching the backend's startup data.
pub fn seed() -> Store {
    let user = |id: &str, name: &str, email: &str, created_at: &str| User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        created_at: created_at.to_string(),
    };
    let post = |id: &str, title: &str, content: &str, author: &str, created_at: &str| Post {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        author: author.to_string(),
        created_at: created_at.to_string(),
    };
    Store {
        users: vec![
            user("1", "John Doe", "john@example.com", "2024-01-15T10:30:00"),
            user("2", "Jane Smith", "jane@example.com", "2024-01-16T14:20:00"),
            user("3", "Bob Johnson", "bob@example.com", "2024-01-17T09:15:00"),
        ],
        posts: vec![
            post("1", "First Post", "This is the first post content", "1", "2024-01-18T10:00:00"),
            post("2", "Second Post", "This is the second post content", "2", "2024-01-18T11:30:00"),
            post("3", "Third Post", "This is the third post content", "1", "2024-01-18T12:45:00"),
        ],
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(seed()));
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post))
        .route("/search", get(search_posts))
        .route("/simulate-error", get(simulate_error))
        .route("/slow-data", get(slow_data))
        .route("/whoami", get(whoami))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "FastAPI Backend is running!", "timestamp": now() }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "timestamp": now() }))
}

async fn list_users(State(db): State<Db>, Query(page): Query<Page>) -> Json<Vec<User>> {
    let store = db.read().await;
    Json(store.users.iter().skip(page.skip).take(page.limit).cloned().collect())
}

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<User> {
    let store = db.read().await;
    store
        .users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("User"))
}

async fn create_user(State(db): State<Db>, Json(input): Json<CreateUser>) -> Json<User> {
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        email: input.email,
        created_at: now(),
    };
    db.write().await.users.push(user.clone());
    Json(user)
}

async fn list_posts(State(db): State<Db>, Query(page): Query<Page>) -> Json<Vec<Post>> {
    let store = db.read().await;
    Json(store.posts.iter().skip(page.skip).take(page.limit).cloned().collect())
}

async fn get_post(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Post> {
    let store = db.read().await;
    store
        .posts
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Post"))
}

async fn create_post(State(db): State<Db>, Json(input): Json<CreatePost>) -> Json<Post> {
    let post = Post {
        id: Uuid::new_v4().to_string(),
        title: input.title,
        content: input.content,
        author: input.author,
        created_at: now(),
    };
    db.write().await.posts.push(post.clone());
    Json(post)
}

async fn search_posts(State(db): State<Db>, Query(query): Query<SearchQuery>) -> Json<Value> {
    let q = match query.q.filter(|q| !q.is_empty()) {
        Some(q) => q,
        None => return Json(json!({ "results": [] })),
    };
    let needle = q.to_lowercase();
    let store = db.read().await;
    let results: Vec<&Post> = store
        .posts
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&needle) || p.content.to_lowercase().contains(&needle)
        })
        .collect();
    Json(json!({ "query": q, "count": results.len(), "results": results }))
}

async fn simulate_error() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "detail": "This is a simulated server error" })),
    )
}

/// Sleeps `delay` seconds before answering.
async fn slow_data(Query(query): Query<Delay>) -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(query.delay)).await;
    Json(json!({
        "message": format!("This response was delayed by {} seconds", query.delay),
        "data": ["item1", "item2", "item3"],
        "timestamp": now(),
    }))
}

/// Echo the bearer token the request carried, or 401 without one.
async fn whoami(
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<Value>, StatusCode> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Json(json!({ "token": bearer.token() })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_matches_backend_sample_data() {
        let store = seed();
        assert_eq!(store.users.len(), 3);
        assert_eq!(store.posts.len(), 3);
        assert_eq!(store.users[0].name, "John Doe");
        assert_eq!(store.posts[2].author, "1");
    }

    #[test]
    fn user_serializes_to_json() {
        let json = serde_json::to_value(&seed().users[1]).unwrap();
        assert_eq!(json["id"], "2");
        assert_eq!(json["email"], "jane@example.com");
        assert_eq!(json["created_at"], "2024-01-16T14:20:00");
    }

    #[test]
    fn create_post_rejects_missing_author() {
        let result: Result<CreatePost, _> =
            serde_json::from_str(r#"{"title":"t","content":"c"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn delay_defaults_to_two_seconds() {
        let delay: Delay = serde_json::from_str("{}").unwrap();
        assert_eq!(delay.delay, 2);
    }

    #[test]
    fn page_defaults() {
        let page: Page = serde_json::from_str("{}").unwrap();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 10);
    }
}

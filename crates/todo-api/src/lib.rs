//! Todo サービスの HTTP API（axum）
//!
//! `/todo` 配下に一覧・作成・更新・削除を提供します。
//! ストアは起動時に一度だけ生成し、`AppState` 経由で注入します。

use axum::{
    middleware::from_fn,
    routing::{get, put},
    Router,
};
use infrastructure::{InMemoryTodoRepository, TodoRepository};
use std::{sync::Arc, time::Duration};
use tower_http::timeout::RequestBodyTimeoutLayer;

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod service;

pub use error::{ApiError, StoreOperation};
pub use service::TodoService;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_BODY_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    service: TodoService,
    body_read_timeout: Duration,
}

impl AppState {
    pub fn new(repository: Arc<dyn TodoRepository>, request_timeout: Duration) -> Self {
        Self {
            service: TodoService::new(repository, request_timeout),
            body_read_timeout: DEFAULT_BODY_READ_TIMEOUT,
        }
    }

    /// ボディ受信が止まったリクエストを打ち切るまでの時間
    pub fn with_body_read_timeout(mut self, timeout: Duration) -> Self {
        self.body_read_timeout = timeout;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryTodoRepository::new()), DEFAULT_REQUEST_TIMEOUT)
    }
}

/// InMemory ストアでルータを構築して返します。
pub fn app() -> Router {
    app_with_state(AppState::default())
}

/// 外部から状態を注入できる版
pub fn app_with_state(state: AppState) -> Router {
    let body_read_timeout = state.body_read_timeout;

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/todo", todo_routes())
        .layer(RequestBodyTimeoutLayer::new(body_read_timeout))
        .layer(from_fn(middleware::log_requests))
        .with_state(state)
}

fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_todos).post(handlers::create_todo))
        .route("/:id", put(handlers::update_todo).delete(handlers::delete_todo))
}

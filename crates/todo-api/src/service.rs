use domain::{Title, TodoId, TodoItem, TodoUpdate};
use infrastructure::{StoreError, TodoRepository};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::error::{ApiError, StoreOperation};

/// Todo の一覧・作成・更新・削除
///
/// 引数は検証済みのドメイン型のみ受け取る。
/// ストア呼び出しはリクエストごとの期限で打ち切る。
#[derive(Clone)]
pub struct TodoService {
    repository: Arc<dyn TodoRepository>,
    request_timeout: Duration,
}

impl TodoService {
    pub fn new(repository: Arc<dyn TodoRepository>, request_timeout: Duration) -> Self {
        Self {
            repository,
            request_timeout,
        }
    }

    pub async fn list(&self) -> Result<Vec<TodoItem>, ApiError> {
        self.bounded(StoreOperation::Fetch, self.repository.list())
            .await
    }

    pub async fn create(&self, title: Title) -> Result<TodoId, ApiError> {
        let item = TodoItem::new(title);

        self.bounded(StoreOperation::Create, self.repository.insert(&item))
            .await?;

        info!(todo_id = %item.id, "todo created");
        Ok(item.id)
    }

    pub async fn update(&self, id: TodoId, update: TodoUpdate) -> Result<u64, ApiError> {
        let modified = self
            .bounded(StoreOperation::Update, self.repository.update(&id, &update))
            .await?;

        info!(todo_id = %id, modified, "todo updated");
        Ok(modified)
    }

    pub async fn delete(&self, id: TodoId) -> Result<u64, ApiError> {
        let deleted = self
            .bounded(StoreOperation::Delete, self.repository.delete(&id))
            .await?;

        info!(todo_id = %id, deleted, "todo deleted");
        Ok(deleted)
    }

    async fn bounded<T>(
        &self,
        op: StoreOperation,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, ApiError> {
        tokio::time::timeout(self.request_timeout, call)
            .await
            .unwrap_or(Err(StoreError::Timeout(self.request_timeout)))
            .map_err(ApiError::store(op))
    }
}

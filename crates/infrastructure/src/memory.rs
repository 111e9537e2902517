use crate::error::StoreError;
use crate::repositories::TodoRepository;
use async_trait::async_trait;
use domain::{TodoId, TodoItem, TodoUpdate};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// 簡易な InMemory 実装（開発/テスト用）
///
/// ULID をキーにした BTreeMap なので、一覧は DynamoDB 実装と同じく作成順になる。
#[derive(Default)]
pub struct InMemoryTodoRepository {
    items: RwLock<BTreeMap<TodoId, TodoItem>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    pub async fn get(&self, id: &TodoId) -> Option<TodoItem> {
        self.items.read().await.get(id).cloned()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn insert(&self, item: &TodoItem) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            return Err(StoreError::Duplicate(item.id.to_string()));
        }
        items.insert(item.id, item.clone());
        Ok(())
    }

    async fn update(&self, id: &TodoId, update: &TodoUpdate) -> Result<u64, StoreError> {
        let mut items = self.items.write().await;
        let modified = items.get_mut(id).is_some_and(|item| item.apply(update));
        Ok(u64::from(modified))
    }

    async fn delete(&self, id: &TodoId) -> Result<u64, StoreError> {
        let removed = self.items.write().await.remove(id).is_some();
        Ok(u64::from(removed))
    }
}

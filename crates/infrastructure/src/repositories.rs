use crate::error::{is_conditional_check_failed, StoreError};
use crate::models::{todo_from_attribute_map, todo_to_attribute_map, TodoKeys, TODO_SK_PREFIX};
use crate::retry::{retry_store_operation, retry_write_operation, RetryConfig};
use crate::DynamoDbClient;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use domain::{TodoId, TodoItem, TodoUpdate};
use tracing::debug;

/// Todo コレクションに対するストアの契約
///
/// 一覧・追加・更新・削除のみ。更新件数と削除件数は「一致しなかった」場合に 0 を返し、
/// エラーにはしない。
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// コレクション全件（作成順）
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError>;

    /// 新規追加。同じ id が既に存在する場合は上書きしない
    async fn insert(&self, item: &TodoItem) -> Result<(), StoreError>;

    /// タイトルと完了フラグを置き換え、変更された件数を返す
    async fn update(&self, id: &TodoId, update: &TodoUpdate) -> Result<u64, StoreError>;

    /// 削除した件数を返す
    async fn delete(&self, id: &TodoId) -> Result<u64, StoreError>;
}

/// DynamoDB 上の Todo リポジトリ
#[derive(Clone)]
pub struct DynamoTodoRepository {
    db: DynamoDbClient,
    collection: String,
    retry: RetryConfig,
}

impl DynamoTodoRepository {
    pub fn new(db: DynamoDbClient, collection: impl Into<String>, retry: RetryConfig) -> Self {
        Self {
            db,
            collection: collection.into(),
            retry,
        }
    }
}

#[async_trait]
impl TodoRepository for DynamoTodoRepository {
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        let pk = TodoKeys::collection_pk(&self.collection);
        let pk = pk.as_str();

        let items = retry_store_operation(
            || async move {
                self.db
                    .client()
                    .query()
                    .table_name(self.db.table_name())
                    .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
                    .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()))
                    .expression_attribute_values(
                        ":sk_prefix",
                        AttributeValue::S(TODO_SK_PREFIX.to_string()),
                    )
                    .into_paginator()
                    .items()
                    .send()
                    .try_collect()
                    .await
                    .map_err(StoreError::from_sdk)
            },
            &self.retry,
        )
        .await?;

        debug!(count = items.len(), "queried todo collection");
        items.iter().map(todo_from_attribute_map).collect()
    }

    async fn insert(&self, item: &TodoItem) -> Result<(), StoreError> {
        let attributes = todo_to_attribute_map(&self.collection, item);
        let attributes = &attributes;

        retry_write_operation(
            || async move {
                let result = self
                    .db
                    .client()
                    .put_item()
                    .table_name(self.db.table_name())
                    .set_item(Some(attributes.clone()))
                    .condition_expression("attribute_not_exists(SK)")
                    .send()
                    .await;

                match result {
                    Ok(_) => Ok(()),
                    Err(err) if is_conditional_check_failed(&err) => {
                        Err(StoreError::Duplicate(item.id.to_string()))
                    }
                    Err(err) => Err(StoreError::from_sdk(err)),
                }
            },
            &self.retry,
        )
        .await
    }

    async fn update(&self, id: &TodoId, update: &TodoUpdate) -> Result<u64, StoreError> {
        let keys = TodoKeys::for_todo(&self.collection, id).to_key_map();
        let keys = &keys;

        retry_write_operation(
            || async move {
                // 既存アイテムが無い、または値が変わらない場合は条件不成立 → 0 件
                let result = self
                    .db
                    .client()
                    .update_item()
                    .table_name(self.db.table_name())
                    .set_key(Some(keys.clone()))
                    .update_expression("SET #title = :title, #completed = :completed")
                    .condition_expression(
                        "attribute_exists(SK) AND (#title <> :title OR #completed <> :completed)",
                    )
                    .expression_attribute_names("#title", "title")
                    .expression_attribute_names("#completed", "completed")
                    .expression_attribute_values(
                        ":title",
                        AttributeValue::S(update.title.as_str().to_string()),
                    )
                    .expression_attribute_values(":completed", AttributeValue::Bool(update.completed))
                    .send()
                    .await;

                match result {
                    Ok(_) => Ok(1),
                    Err(err) if is_conditional_check_failed(&err) => Ok(0),
                    Err(err) => Err(StoreError::from_sdk(err)),
                }
            },
            &self.retry,
        )
        .await
    }

    async fn delete(&self, id: &TodoId) -> Result<u64, StoreError> {
        let keys = TodoKeys::for_todo(&self.collection, id).to_key_map();
        let keys = &keys;

        let output = retry_write_operation(
            || async move {
                self.db
                    .client()
                    .delete_item()
                    .table_name(self.db.table_name())
                    .set_key(Some(keys.clone()))
                    .return_values(ReturnValue::AllOld)
                    .send()
                    .await
                    .map_err(StoreError::from_sdk)
            },
            &self.retry,
        )
        .await?;

        let deleted = output.attributes().is_some_and(|old| !old.is_empty());
        Ok(u64::from(deleted))
    }
}

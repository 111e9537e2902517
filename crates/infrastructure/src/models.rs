use crate::error::StoreError;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use domain::{Title, TodoId, TodoItem};
use std::collections::HashMap;

pub const ENTITY_TYPE_TODO: &str = "Todo";
pub const TODO_SK_PREFIX: &str = "TODO#";

/// DynamoDB Single Table Design のキー構造
///
/// コレクションごとに 1 パーティション、Todo ごとに 1 ソートキー。
/// ソートキーの ULID 順がそのまま作成順になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoKeys {
    pub pk: String,
    pub sk: String,
}

impl TodoKeys {
    pub fn collection_pk(collection: &str) -> String {
        format!("COLLECTION#{collection}")
    }

    pub fn for_todo(collection: &str, id: &TodoId) -> Self {
        Self {
            pk: Self::collection_pk(collection),
            sk: format!("{TODO_SK_PREFIX}{id}"),
        }
    }

    pub fn to_key_map(&self) -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("PK".to_string(), AttributeValue::S(self.pk.clone())),
            ("SK".to_string(), AttributeValue::S(self.sk.clone())),
        ])
    }
}

/// TodoItem を DynamoDB の AttributeValue マップに変換
pub fn todo_to_attribute_map(collection: &str, item: &TodoItem) -> HashMap<String, AttributeValue> {
    let mut map = TodoKeys::for_todo(collection, &item.id).to_key_map();

    map.insert("EntityType".to_string(), AttributeValue::S(ENTITY_TYPE_TODO.to_string()));
    map.insert("id".to_string(), AttributeValue::S(item.id.to_string()));
    map.insert("title".to_string(), AttributeValue::S(item.title.as_str().to_string()));
    map.insert("completed".to_string(), AttributeValue::Bool(item.completed));
    map.insert("created_at".to_string(), AttributeValue::S(item.created_at.to_rfc3339()));

    map
}

/// DynamoDB AttributeValue マップから復元
pub fn todo_from_attribute_map(map: &HashMap<String, AttributeValue>) -> Result<TodoItem, StoreError> {
    let string = |name: &str| {
        map.get(name)
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| StoreError::Decode(format!("missing {name}")))
    };

    let id = TodoId::parse(string("id")?).map_err(|e| StoreError::Decode(e.to_string()))?;
    let title = Title::new(string("title")?.clone())
        .map_err(|e| StoreError::Decode(format!("{id}: {e}")))?;
    let completed = *map
        .get("completed")
        .and_then(|v| v.as_bool().ok())
        .ok_or_else(|| StoreError::Decode(format!("{id}: missing completed")))?;
    let created_at = DateTime::parse_from_rfc3339(string("created_at")?)
        .map_err(|e| StoreError::Decode(format!("{id}: created_at: {e}")))?
        .with_timezone(&Utc);

    Ok(TodoItem {
        id,
        title,
        completed,
        created_at,
    })
}

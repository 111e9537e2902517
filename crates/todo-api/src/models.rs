use domain::{TodoId, TodoItem};
use serde::{Deserialize, Serialize};

/// POST /todo リクエスト
///
/// 欠落と空文字を区別するため Option で受ける。
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
}

/// PUT /todo/{id} リクエスト（タイトルと完了フラグの両方が必須）
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// GET /todo レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ListTodosResponse {
    pub message: String,
    pub data: Vec<TodoItem>,
}

/// POST /todo レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTodoResponse {
    pub message: String,
    pub id: TodoId,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoResponse {
    pub message: String,
    pub modified_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTodoResponse {
    pub message: String,
    pub deleted_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    /// サービスの簡易ステータス
    pub status: &'static str,
}

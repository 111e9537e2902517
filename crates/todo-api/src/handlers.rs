use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::{Title, TodoId, TodoUpdate};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{
    CreateTodoRequest, CreateTodoResponse, DeleteTodoResponse, HealthBody, ListTodosResponse,
    UpdateTodoRequest, UpdateTodoResponse,
};
use crate::AppState;

/// ヘルスチェック用ハンドラ
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthBody { status: "ok" }))
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<ListTodosResponse>, ApiError> {
    let data = state.service.list().await?;

    Ok(Json(ListTodosResponse {
        message: "Todo list fetched successfully".to_string(),
        data,
    }))
}

pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<CreateTodoResponse>), ApiError> {
    let req: CreateTodoRequest = decode_body(body)?;
    let title = Title::new(req.title.ok_or(ApiError::TitleRequired)?)?;

    let id = state.service.create(title).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTodoResponse {
            message: "Todo created successfully".to_string(),
            id,
        }),
    ))
}

/// id → ボディ → タイトル → 完了フラグの順に検証する
pub async fn update_todo(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<UpdateTodoResponse>, ApiError> {
    let id = parse_id(raw_id)?;
    let req: UpdateTodoRequest = decode_body(body)?;
    let update = TodoUpdate::from_parts(req.title, req.completed)?;

    let modified_count = state.service.update(id, update).await?;

    Ok(Json(UpdateTodoResponse {
        message: "Todo updated successfully".to_string(),
        modified_count,
    }))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteTodoResponse>, ApiError> {
    let id = parse_id(raw_id)?;

    let deleted_count = state.service.delete(id).await?;

    Ok(Json(DeleteTodoResponse {
        message: "Todo deleted successfully".to_string(),
        deleted_count,
    }))
}

/// パスの id を解釈する。デコードできないパスも "Invalid id" として返す
fn parse_id(raw_id: Result<Path<String>, PathRejection>) -> Result<TodoId, ApiError> {
    let Path(raw_id) = raw_id.map_err(|e| ApiError::InvalidId(e.body_text()))?;
    Ok(TodoId::parse(&raw_id)?)
}

/// Content-Type に関係なく、ボディを JSON として読む
fn decode_body<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> Result<T, ApiError> {
    let bytes = body.map_err(|e| ApiError::InvalidPayload(e.body_text()))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidPayload(e.to_string()))
}

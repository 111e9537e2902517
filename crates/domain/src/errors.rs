use thiserror::Error;

/// 入力値の検証で発生するドメインエラー
///
/// いずれもクライアント起因のエラーで、ストアへの操作は行われない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid TodoId: {0}")]
    InvalidTodoId(String),

    #[error("Title is required")]
    TitleRequired,

    #[error("Completed is required")]
    CompletedRequired,
}

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::time::Duration;
use thiserror::Error;

/// リクエストを処理せずに拒否したことを示す DynamoDB のエラーコード
const THROTTLING_CODES: &[&str] = &[
    "ProvisionedThroughputExceededException",
    "ThrottlingException",
    "RequestLimitExceeded",
];

/// サーバ側の一時障害（書き込みが適用されたかは不明）
const TRANSIENT_CODES: &[&str] = &["InternalServerError", "ServiceUnavailable"];

const CONDITIONAL_CHECK_FAILED: &str = "ConditionalCheckFailedException";

/// ストア層のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    #[error("DynamoDB throttled the request: {0}")]
    Throttled(String),

    #[error("DynamoDB unreachable: {0}")]
    Unavailable(String),

    #[error("Failed to decode stored todo: {0}")]
    Decode(String),

    #[error("Todo already exists: {0}")]
    Duplicate(String),

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// バックオフ付きで再試行してよいエラーか
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Throttled(_) | StoreError::Unavailable(_))
    }

    /// リクエストが確実に適用されていない（スロットリングで拒否された）エラーか
    pub fn is_throttled(&self) -> bool {
        matches!(self, StoreError::Throttled(_))
    }

    /// SDK のエラーを分類して変換する
    pub fn from_sdk<E, R>(err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        let code = err.as_service_error().and_then(|e| e.code()).map(str::to_string);
        let message = DisplayErrorContext(&err).to_string();

        match code.as_deref() {
            Some(code) if THROTTLING_CODES.contains(&code) => StoreError::Throttled(message),
            Some(code) if TRANSIENT_CODES.contains(&code) => StoreError::Unavailable(message),
            _ if matches!(err, SdkError::TimeoutError(_) | SdkError::DispatchFailure(_)) => {
                StoreError::Unavailable(message)
            }
            _ => StoreError::DynamoDb(message),
        }
    }
}

/// 条件付き書き込みの条件が満たされなかったか
pub fn is_conditional_check_failed<E, R>(err: &SdkError<E, R>) -> bool
where
    E: ProvideErrorMetadata,
{
    err.as_service_error().and_then(|e| e.code()) == Some(CONDITIONAL_CHECK_FAILED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(StoreError::Throttled("slow down".into()).is_retryable());
        assert!(StoreError::Unavailable("connection refused".into()).is_retryable());
        assert!(!StoreError::DynamoDb("ValidationException".into()).is_retryable());
        assert!(!StoreError::Decode("missing title".into()).is_retryable());
        assert!(!StoreError::Timeout(Duration::from_secs(5)).is_retryable());
    }

    #[test]
    fn test_only_throttling_is_known_unapplied() {
        assert!(StoreError::Throttled("slow down".into()).is_throttled());
        assert!(!StoreError::Unavailable("response lost".into()).is_throttled());
    }
}

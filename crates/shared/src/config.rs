use std::env;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Todo の保存先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    /// プロセス内メモリ（ローカル開発用、再起動で消える）
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(Self::DynamoDb),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub environment: String,
    pub aws_region: String,
    pub dynamodb_table: String,
    pub dynamodb_endpoint: Option<String>,
    pub collection: String,
    pub store_backend: StoreBackend,
    pub request_timeout: Duration,
    /// リクエストボディ受信の上限時間
    pub body_read_timeout: Duration,
    pub store_connect_timeout: Duration,
    pub shutdown_timeout: Duration,
    pub retry_max_attempts: u32,
    pub retry_initial_delay_ms: u64,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を組み立てる（テストではマップを渡す）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            host: parse_or(&lookup, "HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(&lookup, "PORT", 9000)?,
            environment: string("ENVIRONMENT", "dev"),
            aws_region: string("AWS_REGION", "ap-northeast-1"),
            dynamodb_table: string("DYNAMODB_TABLE", "todo-service-dev"),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|s| !s.trim().is_empty()),
            collection: string("TODO_COLLECTION", "todo"),
            store_backend: parse_or(&lookup, "STORE_BACKEND", StoreBackend::DynamoDb)?,
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 5)?),
            body_read_timeout: Duration::from_secs(parse_or(&lookup, "BODY_READ_TIMEOUT_SECS", 60)?),
            store_connect_timeout: Duration::from_secs(parse_or(
                &lookup,
                "STORE_CONNECT_TIMEOUT_SECS",
                10,
            )?),
            shutdown_timeout: Duration::from_secs(parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30)?),
            retry_max_attempts: parse_or(&lookup, "RETRY_MAX_ATTEMPTS", 3)?,
            retry_initial_delay_ms: parse_or(&lookup, "RETRY_INITIAL_DELAY_MS", 100)?,
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Json)?,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

use crate::error::StoreError;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::config::{Credentials, SharedCredentialsProvider};
use aws_sdk_dynamodb::Client;
use shared::Config;
use tracing::info;

/// プロセス全体で共有する DynamoDB クライアント
///
/// 内部の `Client` は接続プールを共有するため、clone は安価。
#[derive(Clone)]
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
}

impl DynamoDbClient {
    /// クライアントを構築し、テーブルに到達できることを確認する
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()));

        // DynamoDB Local にはダミーの認証情報で接続する
        if let Some(endpoint) = &config.dynamodb_endpoint {
            loader = loader
                .endpoint_url(endpoint)
                .credentials_provider(SharedCredentialsProvider::new(Credentials::new(
                    "local", "local", None, None, "local",
                )));
        }

        let aws_config = loader.load().await;
        let db = Self::from_client(Client::new(&aws_config), &config.dynamodb_table);

        tokio::time::timeout(config.store_connect_timeout, db.ping())
            .await
            .map_err(|_| StoreError::Timeout(config.store_connect_timeout))??;

        info!(table = %db.table_name, endpoint = ?config.dynamodb_endpoint, "connected to DynamoDB");
        Ok(db)
    }

    pub fn from_client(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }

    /// テーブルの存在確認（起動時の疎通確認に使う）
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(StoreError::from_sdk)?;
        Ok(())
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

//! todo-api バイナリのエントリポイント
//! ストアに接続できない場合は起動しない。

use anyhow::{anyhow, Context};
use infrastructure::{
    DynamoDbClient, DynamoTodoRepository, InMemoryTodoRepository, RetryConfig, TodoRepository,
};
use shared::{init_tracing, Config, StoreBackend};
use std::{net::SocketAddr, sync::Arc};
use todo_api::{app_with_state, AppState};
use tokio::{net::TcpListener, signal, sync::oneshot};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(config.log_format).map_err(|e| anyhow!("failed to initialise tracing: {e}"))?;

    info!(environment = %config.environment, backend = ?config.store_backend, "starting the application");

    let repository: Arc<dyn TodoRepository> = match config.store_backend {
        StoreBackend::DynamoDb => {
            let db = DynamoDbClient::connect(&config)
                .await
                .context("DynamoDB is not reachable")?;
            Arc::new(DynamoTodoRepository::new(
                db,
                config.collection.clone(),
                RetryConfig::from_config(&config),
            ))
        }
        StoreBackend::Memory => {
            warn!("using the in-memory store, todos are lost on restart");
            Arc::new(InMemoryTodoRepository::new())
        }
    };

    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "server starting");

    let state = AppState::new(repository.clone(), config.request_timeout)
        .with_body_read_timeout(config.body_read_timeout);
    let router = app_with_state(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        () = shutdown_signal() => {}
        result = &mut server => {
            // シグナル前にサーバが終了した
            result.context("server task failed")?.context("server error")?;
            return Ok(());
        }
    }

    info!("shutting down, new connections are refused");
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(config.shutdown_timeout, &mut server).await {
        Ok(Ok(Ok(()))) => info!("in-flight requests drained"),
        Ok(Ok(Err(e))) => error!(error = %e, "server error during shutdown"),
        Ok(Err(e)) => error!(error = %e, "server task failed during shutdown"),
        Err(_) => {
            warn!(timeout = ?config.shutdown_timeout, "graceful shutdown timed out, aborting in-flight requests");
            server.abort();
        }
    }

    drop(repository);
    info!("store handle released, server shutdown gracefully");
    Ok(())
}

/// Ctrl+C または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C"),
        () = terminate => info!("received SIGTERM"),
    }
}

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// すべてのリクエストをメソッド・パス・ステータス・所要時間付きで記録する
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );
    response
}

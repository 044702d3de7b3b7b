use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::time::Duration;
use tokio::time::timeout;

use super::data_source::*;

/// How long the store gets to answer its probe
const STORE_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Ready once the secret store answers a probe within the deadline
#[tracing::instrument]
pub async fn handler(data_src: StateDataSource) -> Response {
    let (status, body) = match timeout(STORE_PROBE_TIMEOUT, data_src.is_ready()).await {
        Ok(Ok(())) => (StatusCode::OK, serde_json::json!({"status": "ok"})),
        Ok(Err(e)) => {
            tracing::warn!("readiness: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({"status": "failure", "message": e.to_string()}),
            )
        }
        Err(_) => {
            tracing::warn!(
                "readiness: secret store probe exceeded {:?}",
                STORE_PROBE_TIMEOUT
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({"status": "failure", "message": "secret store probe timed out"}),
            )
        }
    };

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;

    use super::*;

    use crate::http_server::health::data_source::tests::*;

    async fn probe(mock: MockReadiness) -> (StatusCode, serde_json::Value) {
        let response = handler(StateDataSource::new(Arc::new(mock))).await;
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_ready_store() {
        let (status, body) = probe(MockReadiness::Ready).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let (status, body) = probe(MockReadiness::StoreUnavailable).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "the secret store is unavailable");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_store_times_out() {
        let started = tokio::time::Instant::now();
        let (status, body) = probe(MockReadiness::Stalled).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "secret store probe timed out");
        assert!(started.elapsed() >= STORE_PROBE_TIMEOUT);
    }
}

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::ciphertext::Ciphertext;
use common::secret_id::SecretId;
use common::secret_store::SecretStoreError;

use super::error_response;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::Config;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    /// Ciphertext produced client-side. Stored verbatim, never inspected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub id: SecretId,
}

/// Store a ciphertext and hand back its id
/// POST /api/secrets
pub async fn handler(
    State(state): State<ServiceState>,
    Extension(config): Extension<Config>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CreateError> {
    let Json(req) = payload?;

    let data = req
        .encrypted_data
        .filter(|data| !data.is_empty())
        .ok_or(CreateError::MissingData)?;

    let size = data.len();
    if size > config.max_secret_bytes {
        tracing::warn!(
            size,
            limit = config.max_secret_bytes,
            "CREATE SECRET: rejected oversized payload"
        );
        return Err(CreateError::TooLarge(config.max_secret_bytes));
    }

    let ciphertext = Ciphertext::new(data).map_err(|_| CreateError::MissingData)?;
    let id = state.store().put(ciphertext).await?;

    // Unread ids grant access, so they stay out of info logs
    tracing::info!(size, "CREATE SECRET: stored");
    tracing::debug!(%id, "CREATE SECRET: allocated id");

    Ok((StatusCode::CREATED, Json(CreateResponse { id })))
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("no encrypted data provided")]
    MissingData,
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("secret exceeds the {0} byte limit")]
    TooLarge(usize),
    #[error("request body too large")]
    BodyTooLarge,
    #[error("store error: {0}")]
    Store(#[from] SecretStoreError),
}

impl From<JsonRejection> for CreateError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return CreateError::BodyTooLarge;
        }
        CreateError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for CreateError {
    fn into_response(self) -> Response {
        match self {
            CreateError::MissingData => {
                error_response(StatusCode::BAD_REQUEST, "no encrypted data provided")
            }
            CreateError::InvalidBody(msg) => error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {}", msg),
            ),
            CreateError::BodyTooLarge => {
                error_response(StatusCode::PAYLOAD_TOO_LARGE, "request body too large")
            }
            CreateError::TooLarge(limit) => error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("secret exceeds the {} byte limit", limit),
            ),
            CreateError::Store(SecretStoreError::Capacity(_)) => {
                tracing::warn!("CREATE SECRET: store is at capacity");
                error_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "secret store is full, try again later",
                )
            }
            CreateError::Store(e) => {
                tracing::error!("CREATE SECRET: failed to store secret: {}", e);
                error_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "could not allocate a secret id",
                )
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for CreateRequest {
    type Response = CreateResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/secrets")?;
        Ok(client.post(full_url).json(&self))
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::body::to_bytes;

    use super::*;
    use common::secret_store::MemorySecretStore;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_info_logs_omit_live_id() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let state = ServiceState::new(Arc::new(MemorySecretStore::new()));
        let config = Config::new(SocketAddr::from(([127, 0, 0, 1], 0)), 1024, vec![]);
        let request = CreateRequest {
            encrypted_data: Some("sealed".to_string()),
        };

        let response = handler(State(state), Extension(config), Ok(Json(request)))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let created: CreateResponse = serde_json::from_slice(&body).unwrap();

        let logs = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("CREATE SECRET: stored"));
        assert!(!logs.contains(&created.id.to_string()));
    }
}

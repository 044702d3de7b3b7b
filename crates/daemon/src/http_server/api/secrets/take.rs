use axum::extract::rejection::PathRejection;
use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use http::header::CACHE_CONTROL;
use http::{HeaderValue, StatusCode};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::secret_id::SecretId;
use common::secret_store::SecretStoreError;

use super::error_response;
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

/// Message for every miss, whatever the cause
pub const NOT_FOUND_MESSAGE: &str = "secret not found";

/// Request for a stored secret. Carries the id and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeRequest {
    pub id: SecretId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeResponse {
    pub encrypted_data: String,
}

/// Return a stored ciphertext and destroy it in the same step
/// GET /api/secrets/:id
pub async fn handler(
    State(state): State<ServiceState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, TakeError> {
    // A malformed id, including one that is not even UTF-8, is answered
    //  exactly like an unknown one
    let Path(raw) = path.map_err(|_| TakeError::NotFound)?;
    let id = raw.parse::<SecretId>().map_err(|_| TakeError::NotFound)?;

    let ciphertext = state.store().take_once(&id).await?;
    tracing::info!(size = ciphertext.len(), "TAKE SECRET: delivered and destroyed");
    tracing::debug!(%id, "TAKE SECRET: id consumed");

    let mut response = (
        StatusCode::OK,
        Json(TakeResponse {
            encrypted_data: ciphertext.into_inner(),
        }),
    )
        .into_response();
    no_store(&mut response);
    Ok(response)
}

fn no_store(response: &mut Response) {
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
}

#[derive(Debug, thiserror::Error)]
pub enum TakeError {
    #[error("secret not found")]
    NotFound,
    #[error("store error: {0}")]
    Store(SecretStoreError),
}

impl From<SecretStoreError> for TakeError {
    fn from(e: SecretStoreError) -> Self {
        match e {
            SecretStoreError::NotFound => TakeError::NotFound,
            other => TakeError::Store(other),
        }
    }
}

impl IntoResponse for TakeError {
    fn into_response(self) -> Response {
        let mut response = match self {
            // Losing a race for a secret lands here too; that is expected, not an error
            TakeError::NotFound => error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            TakeError::Store(e) => {
                tracing::error!("TAKE SECRET: store failure: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "unexpected error")
            }
        };
        no_store(&mut response);
        response
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for TakeRequest {
    type Response = TakeResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join(&format!("/api/secrets/{}", self.id))?;
        Ok(client.get(full_url))
    }
}

use axum::Router;
use http::header::{ACCEPT, CONTENT_TYPE, ORIGIN};
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub mod client;
pub mod secrets;

use crate::ServiceState;

pub fn router(state: ServiceState, cors_origins: &[String]) -> Router<ServiceState> {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST])
        .allow_headers(vec![ACCEPT, CONTENT_TYPE, ORIGIN])
        .allow_origin(allow_origin(cors_origins))
        .allow_credentials(false);

    Router::new()
        .nest("/secrets", secrets::router(state.clone()))
        .with_state(state)
        .layer(cors_layer)
}

/// `*` (or nothing configured) allows any origin, otherwise only the listed ones
fn allow_origin(origins: &[String]) -> AllowOrigin {
    if origins.is_empty() || origins.iter().any(|o| o.trim() == "*") {
        return AllowOrigin::from(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    AllowOrigin::list(allowed)
}

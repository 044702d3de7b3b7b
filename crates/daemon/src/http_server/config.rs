use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // log level for http tracing
    pub log_level: tracing::Level,
    // Largest ciphertext accepted by POST /api/secrets
    pub max_secret_bytes: usize,
    // Origins the CORS layer lets through, `*` for any
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, max_secret_bytes: usize, cors_origins: Vec<String>) -> Self {
        tracing::info!(
            "Creating HTTP server Config: listen_addr={}, max_secret_bytes={}, cors_origins={:?}",
            listen_addr,
            max_secret_bytes,
            cors_origins
        );
        Self {
            listen_addr,
            log_level: tracing::Level::INFO,
            max_secret_bytes,
            cors_origins,
        }
    }

    /// Request bodies may exceed the ciphertext limit by the JSON envelope around it
    pub fn body_limit(&self) -> usize {
        self.max_secret_bytes.saturating_add(BODY_ENVELOPE_SLACK)
    }
}

const BODY_ENVELOPE_SLACK: usize = 64 * 1024;

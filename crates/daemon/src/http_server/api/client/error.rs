use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

impl ApiError {
    /// True when the server answered that the requested secret does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::HttpStatus(status, _) if *status == StatusCode::NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(ApiError::HttpStatus(StatusCode::NOT_FOUND, String::new()).is_not_found());
        assert!(!ApiError::HttpStatus(StatusCode::SERVICE_UNAVAILABLE, String::new()).is_not_found());
        assert!(!ApiError::UrlParse(url::ParseError::EmptyHost).is_not_found());
    }
}

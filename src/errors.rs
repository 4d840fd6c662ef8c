use axum::http::StatusCode;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RackError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("invalid week window: {0}")]
    InvalidWindow(String),

    #[error("invalid time block: {0}")]
    InvalidBlock(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for RackError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.to_string())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<RackError> for AppError {
    fn from(err: RackError) -> Self {
        let status = match err {
            RackError::InvalidBlock(_) => StatusCode::BAD_REQUEST,
            RackError::Fetch(_) => StatusCode::BAD_GATEWAY,
            RackError::InvalidWindow(_) | RackError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

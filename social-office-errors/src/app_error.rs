use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Item not found")]
    NotFound,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidInput(msg) => msg,
            Self::NotFound => "That item no longer exists.",
            Self::RateLimited(msg) => msg,
            Self::Database(_) => "Could not reach storage. Try again later.",
            Self::Config(_) => "The server is misconfigured.",
            Self::Internal(_) => "Something went wrong on our side. Try again later.",
        }
    }
}

#[cfg(feature = "server")]
mod server_impl {
    use super::AppError;
    use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        message: String,
    }

    impl AppError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                AppError::NotFound => StatusCode::NOT_FOUND,
                AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let message = self.user_message().to_string();
            (self.status_code(), Json(ErrorResponse { message })).into_response()
        }
    }

    impl From<JsonRejection> for AppError {
        fn from(rejection: JsonRejection) -> Self {
            AppError::InvalidInput(rejection.body_text())
        }
    }

    impl From<QueryRejection> for AppError {
        fn from(rejection: QueryRejection) -> Self {
            AppError::InvalidInput(rejection.body_text())
        }
    }

    impl From<PathRejection> for AppError {
        fn from(rejection: PathRejection) -> Self {
            AppError::InvalidInput(rejection.body_text())
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_internal_detail() {
        let err = AppError::Database("connection refused on 10.0.0.4".to_string());
        assert!(!err.user_message().contains("10.0.0.4"));
        assert!(err.to_string().contains("10.0.0.4"));
    }

    #[test]
    fn test_user_message_passes_validation_text() {
        let err = AppError::InvalidInput("Title must not be empty".to_string());
        assert_eq!(err.user_message(), "Title must not be empty");
    }

    #[test]
    fn test_serde_roundtrip_keeps_variant() {
        let json = serde_json::to_string(&AppError::NotFound).unwrap();
        let back: AppError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AppError::NotFound);
    }
}

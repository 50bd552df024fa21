use crate::user::UserServiceError;
use axum::{
    Json,
    extract::{
        FromRequest, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

/// JSON response for API errors
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine readable error code
    pub error: String,
    /// Human readable description of the error
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: String) -> Self {
        Self {
            error: error.to_string(),
            message,
        }
    }
}

/// Custom error type for JSON API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body is not valid JSON for the expected shape.
    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),
    /// A path parameter could not be parsed.
    #[error("Invalid path parameter: {0}")]
    InvalidPath(#[from] PathRejection),
    /// The query string is missing a parameter or could not be parsed.
    #[error("Invalid query string: {0}")]
    InvalidQuery(#[from] QueryRejection),
    /// The request body was parsed but breaks a field constraint.
    #[error("Invalid request body: {0}")]
    Validation(#[from] ValidationErrors),
    /// The service layer failed.
    #[error(transparent)]
    Service(#[from] UserServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_response) = match &self {
            ApiError::MalformedBody(_)
            | ApiError::InvalidPath(_)
            | ApiError::InvalidQuery(_)
            | ApiError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("BAD_REQUEST", self.to_string()),
            ),
            ApiError::Service(UserServiceError::UserNotFound(_)) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("USER_NOT_FOUND", self.to_string()),
            ),
            ApiError::Service(UserServiceError::Database(err)) => {
                tracing::error!("Request failed with database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "INTERNAL_SERVER_ERROR",
                        "An unexpected error occurred while processing your request. Please try again later."
                            .to_string(),
                    ),
                )
            }
        };

        (status_code, Json(error_response)).into_response()
    }
}

/// JSON extractor that runs `validator` constraints before the handler sees the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

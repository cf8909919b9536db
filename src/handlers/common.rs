use crate::errors::ServiceError;
use crate::services::Page;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input
        .validate()
        .map_err(|e| ServiceError::ValidationError(format!("Validation failed: {}", e)))
}

/// JSON body extractor that surfaces deserialization failures (missing
/// fields, unknown enum values, type mismatches) as `ValidationError`
/// instead of axum's default rejection.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ServiceError::ValidationError(rejection.body_text())),
        }
    }
}

/// Window parameters for list operations
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 200, message = "limit must be between 1 and 200"))]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

pub fn default_limit() -> u64 {
    50
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl ListParams {
    pub fn page(&self) -> Page {
        Page {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_default_window() {
        let params = ListParams::default();
        assert_eq!(params.limit, 50);
        assert_eq!(params.offset, 0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn list_params_rejects_out_of_range_limit() {
        let params = ListParams {
            limit: 0,
            offset: 0,
        };
        assert!(params.validate().is_err());

        let params = ListParams {
            limit: 201,
            offset: 0,
        };
        assert!(params.validate().is_err());

        let params = ListParams {
            limit: 200,
            offset: 10,
        };
        assert!(params.validate().is_ok());
    }
}

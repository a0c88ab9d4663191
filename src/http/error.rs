use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::domain::order::OrderError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing or empty {0} header")]
    Unauthenticated(&'static str),

    #[error(transparent)]
    Order(#[from] OrderError),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "unauthenticated",
            ApiError::Order(error) => error.kind(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Order(error) => match error {
                OrderError::UserNotFound(_)
                | OrderError::CoffeeNotFound(_)
                | OrderError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                OrderError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                OrderError::Validation(_) => StatusCode::BAD_REQUEST,
                OrderError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::Unauthenticated("X-Authenticated-User"), StatusCode::UNAUTHORIZED),
            (OrderError::CoffeeNotFound(1).into(), StatusCode::NOT_FOUND),
            (OrderError::OrderNotFound(5).into(), StatusCode::NOT_FOUND),
            (OrderError::UserNotFound("x".into()).into(), StatusCode::NOT_FOUND),
            (OrderError::PermissionDenied("no".into()).into(), StatusCode::FORBIDDEN),
            (OrderError::Validation("bad".into()).into(), StatusCode::BAD_REQUEST),
            (
                OrderError::Store(StoreError::LockPoisoned("find_order")).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code(), status, "{error}");
        }
    }

    #[test]
    fn test_error_kind_passthrough() {
        let error: ApiError = OrderError::PermissionDenied("no".into()).into();
        assert_eq!(error.kind(), "permission_denied");
    }
}

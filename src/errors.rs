use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Please log in to complete your purchase")]
    Unauthorized,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::AuthenticationRequired => AppError::Unauthorized,
            DomainError::Upstream(msg) => AppError::Upstream(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": msg
            })),
            AppError::Unauthorized => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Upstream(msg) => {
                log::warn!("Upstream call failed: {}", msg);
                HttpResponse::BadGateway().json(serde_json::json!({
                    "error": "The request could not be completed. Please try again."
                }))
            }
            AppError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_returns_400() {
        let err = AppError::BadRequest("cart is empty".to_string());
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_returns_401_with_login_message() {
        let err = AppError::Unauthorized;
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Please log in to complete your purchase");
    }

    #[test]
    fn upstream_returns_502() {
        let err = AppError::Upstream("timeout".to_string());
        assert_eq!(err.error_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_errors_map_to_app_errors() {
        assert!(matches!(
            AppError::from(DomainError::NotFound),
            AppError::NotFound
        ));
        assert!(matches!(
            AppError::from(DomainError::InvalidInput("bad".into())),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::AuthenticationRequired),
            AppError::Unauthorized
        ));
        assert!(matches!(
            AppError::from(DomainError::Upstream("down".into())),
            AppError::Upstream(_)
        ));
        assert!(matches!(
            AppError::from(DomainError::Internal("oops".into())),
            AppError::Internal(_)
        ));
    }
}

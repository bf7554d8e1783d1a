//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse` impl for `AppError` lives in `sitehost-core`
//! alongside the type (orphan rule); this module re-exports the
//! response body type so API consumers keep a single import path.

pub use sitehost_core::error::ApiErrorResponse;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use sitehost_core::error::{AppError, ErrorKind};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ErrorKind::NotFound, StatusCode::NOT_FOUND),
            (ErrorKind::Validation, StatusCode::BAD_REQUEST),
            (ErrorKind::MalformedArchive, StatusCode::BAD_REQUEST),
            (ErrorKind::Conflict, StatusCode::CONFLICT),
            (ErrorKind::Extraction, StatusCode::INTERNAL_SERVER_ERROR),
            (ErrorKind::Database, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (kind, expected) in cases {
            let response = AppError::new(kind, "boom").into_response();
            assert_eq!(response.status(), expected, "kind {kind}");
        }
    }
}

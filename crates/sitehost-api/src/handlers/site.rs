//! Public static file handler for deployed sites.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio_util::io::ReaderStream;

use sitehost_core::error::AppError;
use sitehost_storage::resolver::mime_from_path;

use crate::state::AppState;

/// GET /{id}/{*path}
///
/// Streams a file from a deployed site. Anything that does not resolve
/// to an existing regular file inside the deployment's own directory is
/// a plain 404, including traversal attempts.
pub async fn serve_file(
    State(state): State<AppState>,
    Path((id, path)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let resolved = state.resolver.resolve(&id, &path).await?;

    let file = tokio::fs::File::open(&resolved.path)
        .await
        .map_err(|_| AppError::not_found("File not found"))?;
    let stream = ReaderStream::new(file);

    let content_type = mime_from_path(&resolved.path).unwrap_or("application/octet-stream");
    let last_modified = resolved
        .modified
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, resolved.size)
        .header(header::LAST_MODIFIED, last_modified)
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

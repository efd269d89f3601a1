use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/media/{filename}",
    tag = "Media",
    operation_id = "serveMedia",
    summary = "Stream a stored media file",
    description = "Streams an uploaded image or video for inline playback. Only flat, \
        sanitized filenames resolve; path-like names are rejected.",
    params(("filename" = String, Path, description = "Stored media filename")),
    responses(
        (status = 200, description = "Media content"),
        (status = 400, description = "Unsafe filename (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Unknown media file (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn serve_media(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let (file, len) = state.media.open(&filename).await?;

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    let stream = ReaderStream::new(file);

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CONTENT_LENGTH, len.to_string())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

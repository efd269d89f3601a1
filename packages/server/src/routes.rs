use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::get};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

/// Headroom above the media cap for the non-file form fields, so the body
/// limit never fires before the media store's own size check.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn routes(config: &AppConfig) -> Router<AppState> {
    let create = Router::new()
        .route(
            "/new",
            get(handlers::post::new_post_form).post(handlers::post::create_post),
        )
        .layer(DefaultBodyLimit::max(
            (config.media.max_upload_bytes as usize).saturating_add(FORM_OVERHEAD_BYTES),
        ));

    Router::new()
        .route("/", get(handlers::post::list_posts))
        .route("/post/{id}", get(handlers::post::post_detail))
        .route("/media/{filename}", get(handlers::media::serve_media))
        .merge(create)
}

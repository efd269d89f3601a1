use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::response::Redirect;
use common::media::{MediaError, MediaKind, StagedMedia, StoredMedia};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use tracing::instrument;

use crate::entity::post;
use crate::error::{AppError, ErrorBody};
use crate::markdown::render_markdown;
use crate::models::post::{
    DEFAULT_TOPIC, NewPostFormResponse, PostDetailResponse, PostListResponse, PostResponse,
    TITLE_MAX_CHARS, TOPIC_MAX_CHARS, normalize_topic, validate_title,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Posts",
    operation_id = "listPosts",
    summary = "List all posts, newest first",
    description = "Returns every post ordered by publication time, descending. \
        There is no pagination; the blog is single-author and small by design.",
    responses(
        (status = 200, description = "Post listing", body = PostListResponse),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<PostListResponse>, AppError> {
    let posts = post::Entity::find()
        .order_by_desc(post::Column::DatePosted)
        .all(&state.db)
        .await?;

    let total = posts.len() as u64;
    Ok(Json(PostListResponse {
        data: posts.into_iter().map(PostResponse::from).collect(),
        total,
    }))
}

#[utoipa::path(
    get,
    path = "/new",
    tag = "Posts",
    operation_id = "newPostForm",
    summary = "Creation form metadata",
    description = "Returns the constraints the creation form needs: default topic, \
        field length caps, allowed media extensions and the upload size limit.",
    responses(
        (status = 200, description = "Form metadata", body = NewPostFormResponse),
    ),
)]
pub async fn new_post_form(State(state): State<AppState>) -> Json<NewPostFormResponse> {
    Json(NewPostFormResponse {
        default_topic: DEFAULT_TOPIC,
        title_max_chars: TITLE_MAX_CHARS as u64,
        topic_max_chars: TOPIC_MAX_CHARS as u64,
        image_extensions: MediaKind::IMAGE_EXTENSIONS.to_vec(),
        video_extensions: MediaKind::VIDEO_EXTENSIONS.to_vec(),
        max_upload_bytes: state.media.max_bytes(),
    })
}

#[utoipa::path(
    post,
    path = "/new",
    tag = "Posts",
    operation_id = "createPost",
    summary = "Create a post",
    description = "Accepts a multipart form with `title`, `topic`, `content` and an \
        optional `media_file` attachment. A post needs a title plus text content or \
        a supported image/video file. A file with a disallowed extension is treated \
        as if no file was attached. On success redirects to the listing.",
    request_body(content_type = "multipart/form-data", description = "Post fields and optional media file"),
    responses(
        (status = 303, description = "Post created; redirects to the listing"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 413, description = "Upload too large (SIZE_EXCEEDED)", body = ErrorBody),
        (status = 500, description = "Upload or storage failure (UPLOAD_ERROR, INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn create_post(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut title = String::new();
    let mut topic = String::new();
    let mut content = String::new();
    let mut staged: Option<StagedMedia> = None;
    let mut media_rejected = false;

    let outcome = async {
        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("title") => title = read_text(field).await?,
                Some("topic") => topic = read_text(field).await?,
                Some("content") => content = read_text(field).await?,
                Some("media_file") => {
                    let Some(raw_name) = field.file_name().map(str::to_owned) else {
                        continue;
                    };
                    if raw_name.is_empty() {
                        continue;
                    }

                    let mut upload = match state.media.stage(&raw_name).await {
                        Ok(upload) => upload,
                        Err(MediaError::InvalidFilename | MediaError::UnsupportedType(_)) => {
                            // A disallowed file is "no media", not a hard
                            // failure; only matters later if content is also
                            // missing.
                            tracing::warn!(filename = %raw_name, "ignoring disallowed media file");
                            media_rejected = true;
                            continue;
                        }
                        Err(e) => return Err(e.into()),
                    };

                    loop {
                        match field.chunk().await {
                            Ok(Some(chunk)) => upload.write_chunk(&chunk).await?,
                            Ok(None) => break,
                            Err(e) => {
                                upload.cancel().await;
                                return Err(AppError::Validation(format!(
                                    "Upload read error: {e}"
                                )));
                            }
                        }
                    }

                    // Last file field wins if the form repeats it.
                    if let Some(previous) = staged.take() {
                        state.media.discard(previous).await;
                    }
                    staged = Some(upload.finish().await?);
                }
                _ => {} // Ignore unknown fields.
            }
        }

        validate_title(&title)?;
        let topic = normalize_topic(&topic)?;

        if content.trim().is_empty() && staged.is_none() {
            let msg = if media_rejected {
                "The uploaded file type is not allowed; add text content or attach a \
                 supported image/video"
            } else {
                "A post needs text content or a media attachment"
            };
            return Err(AppError::Validation(msg.into()));
        }

        Ok(topic)
    }
    .await;

    let topic = match outcome {
        Ok(topic) => topic,
        Err(e) => {
            if let Some(staged) = staged.take() {
                state.media.discard(staged).await;
            }
            return Err(e);
        }
    };

    let stored: Option<StoredMedia> = match staged {
        Some(staged) => Some(state.media.commit(staged).await?),
        None => None,
    };

    let new_post = post::ActiveModel {
        title: Set(title.trim().to_string()),
        topic: Set(topic),
        content_markdown: Set(if content.trim().is_empty() {
            None
        } else {
            Some(content)
        }),
        media_type: Set(stored.as_ref().map(|s| s.kind)),
        media_filename: Set(stored.as_ref().map(|s| s.filename.clone())),
        date_posted: Set(chrono::Utc::now()),
        ..Default::default()
    };

    match new_post.insert(&state.db).await {
        Ok(model) => {
            tracing::info!(post_id = model.id, "post created");
            Ok(Redirect::to("/"))
        }
        Err(e) => {
            // The insert failed, so nothing may keep referencing the file.
            if let Some(stored) = stored {
                state.media.remove(&stored.filename).await;
            }
            Err(e.into())
        }
    }
}

#[utoipa::path(
    get,
    path = "/post/{id}",
    tag = "Posts",
    operation_id = "postDetail",
    summary = "Post detail with rendered markdown",
    params(("id" = i32, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post detail", body = PostDetailResponse),
        (status = 404, description = "Unknown post id (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Storage failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn post_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PostDetailResponse>, AppError> {
    let model = post::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {id} not found")))?;

    let content_html = model
        .content_markdown
        .as_deref()
        .map(render_markdown)
        .unwrap_or_default();

    Ok(Json(PostDetailResponse {
        post: PostResponse::from(model),
        content_html,
    }))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))
}

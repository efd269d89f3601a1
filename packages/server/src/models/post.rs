use chrono::{DateTime, Utc};
use common::media::MediaKind;
use serde::Serialize;

use crate::entity::post;
use crate::error::AppError;

pub const TITLE_MAX_CHARS: usize = 100;
pub const TOPIC_MAX_CHARS: usize = 50;

/// Category label used when the client leaves the topic blank.
pub const DEFAULT_TOPIC: &str = "general";

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub topic: String,
    pub content_markdown: Option<String>,
    pub media_type: Option<MediaKind>,
    /// Stored filename, servable under `/media/{filename}`.
    pub media_filename: Option<String>,
    pub date_posted: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostListResponse {
    /// All posts, newest first.
    pub data: Vec<PostResponse>,
    pub total: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    /// Markdown content rendered to an HTML fragment (empty when the post
    /// has no text).
    pub content_html: String,
}

/// Constraints the creation form needs to render itself.
#[derive(Serialize, utoipa::ToSchema)]
pub struct NewPostFormResponse {
    pub default_topic: &'static str,
    pub title_max_chars: u64,
    pub topic_max_chars: u64,
    pub image_extensions: Vec<&'static str>,
    pub video_extensions: Vec<&'static str>,
    pub max_upload_bytes: u64,
}

impl From<post::Model> for PostResponse {
    fn from(m: post::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            topic: m.topic,
            content_markdown: m.content_markdown,
            media_type: m.media_type,
            media_filename: m.media_filename,
            date_posted: m.date_posted,
        }
    }
}

/// Validate a trimmed title (1-100 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > TITLE_MAX_CHARS {
        return Err(AppError::Validation(
            "Title must be 1-100 characters".into(),
        ));
    }
    Ok(())
}

/// Normalize the topic: blank falls back to the default label.
pub fn normalize_topic(topic: &str) -> Result<String, AppError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Ok(DEFAULT_TOPIC.to_string());
    }
    if topic.chars().count() > TOPIC_MAX_CHARS {
        return Err(AppError::Validation(
            "Topic must be at most 50 characters".into(),
        ));
    }
    Ok(topic.to_string())
}

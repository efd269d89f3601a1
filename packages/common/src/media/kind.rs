#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of an uploaded media file.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly as an
/// entity column (stored as a string).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A still image, rendered with an `<img>` tag.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "image"))]
    Image,
    /// A video, rendered with a `<video>` player.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "video"))]
    Video,
}

impl MediaKind {
    /// Extensions accepted as images.
    pub const IMAGE_EXTENSIONS: &'static [&'static str] = &["png", "jpg", "jpeg", "gif", "webp"];

    /// Extensions accepted as videos.
    pub const VIDEO_EXTENSIONS: &'static [&'static str] = &["mp4", "mov", "avi", "webm"];

    /// Classify a file extension. Case-insensitive; anything outside the two
    /// allowed sets is rejected with `None`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        if Self::IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else if Self::VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }

    /// Returns the string representation (lowercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid media kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMediaKindError {
    invalid: String,
}

impl fmt::Display for ParseMediaKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid media kind '{}'. Valid values: image, video",
            self.invalid
        )
    }
}

impl std::error::Error for ParseMediaKindError {}

impl FromStr for MediaKind {
    type Err = ParseMediaKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            _ => Err(ParseMediaKindError {
                invalid: s.to_string(),
            }),
        }
    }
}

use common::media::MediaKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A blog post. Immutable after creation; there is no update or delete path.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub topic: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub content_markdown: Option<String>,

    // Both present or both absent; enforced by the create handler.
    pub media_type: Option<MediaKind>,
    pub media_filename: Option<String>,

    /// Set once at creation from the server clock; the sole listing order key.
    pub date_posted: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

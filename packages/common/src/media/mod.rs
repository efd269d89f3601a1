//! Media store: validation, naming and on-disk persistence of uploaded files.

mod error;
mod filename;
mod kind;
mod store;

pub use error::MediaError;
pub use filename::{sanitize_filename, split_extension};
pub use kind::MediaKind;
pub use store::{MediaStore, StagedMedia, StagedUpload, StoredMedia};

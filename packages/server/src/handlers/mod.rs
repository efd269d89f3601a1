pub mod media;
pub mod post;

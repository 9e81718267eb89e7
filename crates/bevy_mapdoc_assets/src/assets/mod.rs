pub mod animation;
pub mod image;
